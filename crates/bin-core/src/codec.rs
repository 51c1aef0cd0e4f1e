//! Wire map encoding and decoding.
//!
//! Write direction: every text or byte field is encrypted with the
//! [`Cipher`], then base64-encoded (standard alphabet, padded). Read
//! direction reverses this exactly: base64-decode, then decrypt.
//!
//! Fields are sealed independently under the same key. The wire map carries
//! no binding between them, so integrity is per field and only as strong as
//! the cipher's.
//!
//! ## Wire format
//!
//! | key           | value                                      |
//! |---------------|--------------------------------------------|
//! | `id`          | plain UUID string (only in [`ArtifactCodec::wire_map`]) |
//! | `name`        | base64(encrypt(name))                      |
//! | `content`     | base64(encrypt(content))                   |
//! | `type`        | base64(encrypt(content type))              |
//! | `description` | base64(encrypt(description)), omitted when empty |

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::cipher::{AgeCipher, Cipher};
use crate::error::{BinError, Result};
use crate::sniff::{infer_content_type, ContentSniffer, MagicSniffer};

/// String-keyed map of wire fields.
pub type WireMap = BTreeMap<String, String>;

/// Wire map keys.
pub mod keys {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const CONTENT: &str = "content";
    pub const TYPE: &str = "type";
    pub const DESCRIPTION: &str = "description";
}

/// The four sealed fields of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFields {
    pub name: String,
    pub content: String,
    pub content_type: String,
    /// `None` when the artifact has no description.
    pub description: Option<String>,
}

/// Converts artifacts to and from wire maps.
#[derive(Debug, Clone)]
pub struct ArtifactCodec<C = AgeCipher, S = MagicSniffer> {
    cipher: C,
    sniffer: S,
}

impl ArtifactCodec {
    /// Codec with the default age cipher and signature sniffer.
    pub fn new() -> Self {
        Self::with_parts(AgeCipher::default(), MagicSniffer)
    }
}

impl Default for ArtifactCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cipher> ArtifactCodec<C, MagicSniffer> {
    pub fn with_cipher(cipher: C) -> Self {
        Self::with_parts(cipher, MagicSniffer)
    }
}

impl<C: Cipher, S: ContentSniffer> ArtifactCodec<C, S> {
    pub fn with_parts(cipher: C, sniffer: S) -> Self {
        Self { cipher, sniffer }
    }

    /// Content type of `artifact` as this codec's sniffer sees it.
    pub fn content_type(&self, artifact: &Artifact) -> String {
        infer_content_type(artifact.name(), artifact.content(), &self.sniffer)
    }

    /// Encrypt and base64-encode each field of `artifact`.
    ///
    /// The content type is computed here, not read from anywhere, so it
    /// always matches the current name and content.
    ///
    /// # Errors
    ///
    /// Returns `BinError::Crypto` if any field fails to encrypt.
    pub fn encrypt_and_encode(&self, key: &[u8], artifact: &Artifact) -> Result<EncodedFields> {
        let content_type = self.content_type(artifact);

        let fields = EncodedFields {
            name: self.seal(key, artifact.name().as_bytes())?,
            content: self.seal(key, artifact.content())?,
            content_type: self.seal(key, content_type.as_bytes())?,
            description: if artifact.has_description() {
                Some(self.seal(key, artifact.description().as_bytes())?)
            } else {
                None
            },
        };

        debug!(
            id = %artifact.id(),
            content_type = %content_type,
            content_len = artifact.content().len(),
            has_description = fields.description.is_some(),
            "encoded artifact fields"
        );
        Ok(fields)
    }

    /// Build the `name`/`content`/`type`[/`description`] map for `artifact`.
    ///
    /// # Errors
    ///
    /// Returns `BinError::Crypto` if any field fails to encrypt.
    pub fn serialize_map(&self, key: &[u8], artifact: &Artifact) -> Result<WireMap> {
        let fields = self.encrypt_and_encode(key, artifact)?;

        let mut map = WireMap::new();
        map.insert(keys::NAME.to_string(), fields.name);
        map.insert(keys::CONTENT.to_string(), fields.content);
        map.insert(keys::TYPE.to_string(), fields.content_type);
        if let Some(description) = fields.description {
            map.insert(keys::DESCRIPTION.to_string(), description);
        }
        Ok(map)
    }

    /// [`serialize_map`](Self::serialize_map) plus the plain `id`, the form
    /// accepted by [`decode_map`](Self::decode_map).
    ///
    /// # Errors
    ///
    /// Returns `BinError::Crypto` if any field fails to encrypt.
    pub fn wire_map(&self, key: &[u8], artifact: &Artifact) -> Result<WireMap> {
        let mut map = self.serialize_map(key, artifact)?;
        map.insert(keys::ID.to_string(), artifact.id().to_string());
        Ok(map)
    }

    /// Rebuild an artifact from a wire map.
    ///
    /// `type` is ignored; the content type is always derived. A missing or
    /// empty `description` yields an empty description without touching the
    /// cipher. Nothing is returned unless every field decodes.
    ///
    /// # Errors
    ///
    /// - `BinError::Parse` if `id` is missing or not a UUID
    /// - `BinError::Decode` if `name` or `content` is missing, any field is
    ///   not valid base64, or `name`/`description` is not UTF-8
    /// - `BinError::Crypto` if any field fails to decrypt (wrong key,
    ///   corrupted ciphertext)
    pub fn decode_map(&self, map: &WireMap, key: &[u8]) -> Result<Artifact> {
        let raw_id = map
            .get(keys::ID)
            .ok_or_else(|| BinError::Parse("missing id".to_string()))?;
        let id = Uuid::parse_str(raw_id)?;

        let name = self.open_text(key, keys::NAME, required(map, keys::NAME)?)?;
        let content = self.open(key, keys::CONTENT, required(map, keys::CONTENT)?)?;
        let description = match map.get(keys::DESCRIPTION) {
            Some(encoded) if !encoded.is_empty() => {
                self.open_text(key, keys::DESCRIPTION, encoded)?
            }
            _ => String::new(),
        };

        debug!(%id, content_len = content.len(), "decoded artifact from wire map");
        Ok(Artifact::from_parts(id, name, content, description))
    }

    fn seal(&self, key: &[u8], plaintext: &[u8]) -> Result<String> {
        let ciphertext = self.cipher.encrypt(key, plaintext)?;
        Ok(STANDARD.encode(ciphertext))
    }

    fn open(&self, key: &[u8], field: &str, encoded: &str) -> Result<Vec<u8>> {
        let ciphertext = STANDARD
            .decode(encoded)
            .map_err(|e| BinError::Decode(format!("{} is not valid base64: {}", field, e)))?;
        self.cipher.decrypt(key, &ciphertext)
    }

    fn open_text(&self, key: &[u8], field: &str, encoded: &str) -> Result<String> {
        let bytes = self.open(key, field, encoded)?;
        String::from_utf8(bytes)
            .map_err(|e| BinError::Decode(format!("{} is not valid UTF-8: {}", field, e)))
    }
}

fn required<'a>(map: &'a WireMap, field: &str) -> Result<&'a str> {
    map.get(field)
        .map(String::as_str)
        .ok_or_else(|| BinError::Decode(format!("missing field: {}", field)))
}

/// Parse a wire map from a JSON object of string values.
///
/// # Errors
///
/// Returns `BinError::Json` if the input is not a JSON object of strings.
pub fn parse_wire_map(json: &str) -> Result<WireMap> {
    Ok(serde_json::from_str(json)?)
}

/// Render a wire map as pretty-printed JSON.
///
/// # Errors
///
/// Returns `BinError::Json` if serialization fails.
pub fn wire_map_to_json(map: &WireMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Reversible XOR "cipher" that counts calls and fails on a tag mismatch.
    struct XorCipher {
        calls: Cell<usize>,
    }

    impl XorCipher {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }

        fn keystream(key: &[u8], data: &[u8]) -> Vec<u8> {
            data.iter()
                .enumerate()
                .map(|(i, b)| b ^ key[i % key.len()])
                .collect()
        }
    }

    impl Cipher for XorCipher {
        fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            let mut out = vec![key.len() as u8, key[0]];
            out.extend(Self::keystream(key, plaintext));
            Ok(out)
        }

        fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            match ciphertext {
                [len, first, body @ ..] if *len as usize == key.len() && *first == key[0] => {
                    Ok(Self::keystream(key, body))
                }
                _ => Err(BinError::Crypto("Incorrect key".to_string())),
            }
        }
    }

    fn codec() -> ArtifactCodec<XorCipher> {
        ArtifactCodec::with_cipher(XorCipher::new())
    }

    const KEY: &[u8] = b"unit-test-key";

    #[test]
    fn test_notes_example_map_keys() {
        let codec = codec();
        let artifact = Artifact::from_text("notes.txt", "hello", "");

        let map = codec.serialize_map(KEY, &artifact).unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["content", "name", "type"]);

        let content_type = codec.open_text(KEY, keys::TYPE, &map[keys::TYPE]).unwrap();
        assert_eq!(content_type, "text/plain");
    }

    #[test]
    fn test_description_included_when_present() {
        let codec = codec();
        let artifact = Artifact::from_text("notes.txt", "hello", "for you");

        let map = codec.serialize_map(KEY, &artifact).unwrap();
        let description = codec
            .open_text(KEY, keys::DESCRIPTION, &map[keys::DESCRIPTION])
            .unwrap();
        assert_eq!(description, "for you");
    }

    #[test]
    fn test_empty_description_is_not_encrypted() {
        let codec = codec();
        let artifact = Artifact::from_text("a.bin", "x", "");

        let fields = codec.encrypt_and_encode(KEY, &artifact).unwrap();

        assert!(fields.description.is_none());
        assert_eq!(codec.cipher.calls.get(), 3);
    }

    #[test]
    fn test_fields_are_base64_of_ciphertext() {
        let codec = codec();
        let artifact = Artifact::from_text("n", "c", "");

        let fields = codec.encrypt_and_encode(KEY, &artifact).unwrap();

        let raw = STANDARD.decode(&fields.name).unwrap();
        assert_eq!(codec.cipher.decrypt(KEY, &raw).unwrap(), b"n");
    }

    #[test]
    fn test_round_trip_through_wire_map() {
        let codec = codec();
        let artifact = Artifact::from_text("report.csv", "a,b\n1,2\n", "quarterly");

        let map = codec.wire_map(KEY, &artifact).unwrap();
        assert_eq!(map[keys::ID], artifact.id().to_string());

        let decoded = codec.decode_map(&map, KEY).unwrap();
        assert_eq!(decoded, artifact);
    }

    #[test]
    fn test_missing_description_decodes_empty_without_cipher_call() {
        let codec = codec();
        let artifact = Artifact::from_text("a", "b", "");
        let map = codec.wire_map(KEY, &artifact).unwrap();

        let before = codec.cipher.calls.get();
        let decoded = codec.decode_map(&map, KEY).unwrap();

        assert_eq!(decoded.description(), "");
        assert_eq!(codec.cipher.calls.get() - before, 2);
    }

    #[test]
    fn test_type_field_is_ignored_on_decode() {
        let codec = codec();
        let artifact = Artifact::from_text("a.txt", "b", "");
        let mut map = codec.wire_map(KEY, &artifact).unwrap();
        map.insert(keys::TYPE.to_string(), "%%% not base64 %%%".to_string());

        assert!(codec.decode_map(&map, KEY).is_ok());
    }

    #[test]
    fn test_invalid_id_is_parse_error() {
        let codec = codec();
        let mut map = codec
            .wire_map(KEY, &Artifact::from_text("a", "b", ""))
            .unwrap();
        map.insert(keys::ID.to_string(), "not-a-uuid".to_string());

        assert!(matches!(codec.decode_map(&map, KEY), Err(BinError::Parse(_))));

        map.remove(keys::ID);
        assert!(matches!(codec.decode_map(&map, KEY), Err(BinError::Parse(_))));
    }

    #[test]
    fn test_malformed_base64_is_decode_error() {
        let codec = codec();
        let mut map = codec
            .wire_map(KEY, &Artifact::from_text("a", "b", "c"))
            .unwrap();
        map.insert(keys::DESCRIPTION.to_string(), "***".to_string());

        let err = codec.decode_map(&map, KEY).unwrap_err();
        assert!(matches!(err, BinError::Decode(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_content_is_decode_error() {
        let codec = codec();
        let mut map = codec
            .wire_map(KEY, &Artifact::from_text("a", "b", ""))
            .unwrap();
        map.remove(keys::CONTENT);

        assert!(matches!(codec.decode_map(&map, KEY), Err(BinError::Decode(_))));
    }

    #[test]
    fn test_non_utf8_name_is_decode_error() {
        let codec = codec();
        let mut map = codec
            .wire_map(KEY, &Artifact::from_text("a", "b", ""))
            .unwrap();
        let sealed = codec.seal(KEY, &[0xFF, 0xFE]).unwrap();
        map.insert(keys::NAME.to_string(), sealed);

        assert!(matches!(codec.decode_map(&map, KEY), Err(BinError::Decode(_))));
    }

    #[test]
    fn test_wrong_key_is_crypto_error() {
        let codec = codec();
        let map = codec
            .wire_map(KEY, &Artifact::from_text("a", "b", ""))
            .unwrap();

        let result = codec.decode_map(&map, b"another-key");
        assert!(matches!(result, Err(BinError::Crypto(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let codec = codec();
        let artifact = Artifact::from_text("a.md", "# Title", "");
        let map = codec.wire_map(KEY, &artifact).unwrap();

        let json = wire_map_to_json(&map).unwrap();
        let parsed = parse_wire_map(&json).unwrap();

        assert_eq!(parsed, map);
    }

    #[test]
    fn test_parse_wire_map_rejects_non_string_values() {
        let result = parse_wire_map(r#"{"id": 42, "name": "x"}"#);
        assert!(matches!(result, Err(BinError::Json { .. })));
    }

    #[test]
    fn test_content_type_recomputed_per_serialization() {
        let codec = codec();
        let html = Artifact::from_text("page", "<html></html>", "");
        let text = Artifact::from_text("page", "plain words", "");

        assert_eq!(codec.content_type(&html), "text/html");
        assert_eq!(codec.content_type(&text), "text/plain");
    }
}
