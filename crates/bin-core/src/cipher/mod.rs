//! Symmetric encryption for wire fields.
//!
//! The codec treats the cipher as an opaque collaborator: bytes in, bytes
//! out, keyed by caller-supplied key material. No key derivation or key
//! management happens here beyond what the concrete cipher needs to consume
//! the raw key bytes.
//!
//! - **Age**: Modern, simple encryption (https://age-encryption.org/), used
//!   in passphrase mode with the key bytes rendered as the passphrase.

pub mod age_cipher;

use zeroize::ZeroizeOnDrop;

use crate::error::Result;

pub use age_cipher::AgeCipher;

/// Symmetric encrypt/decrypt over raw bytes.
///
/// Implementations must fail with [`BinError::Crypto`](crate::BinError::Crypto)
/// rather than return garbage when decrypting with the wrong key, whenever
/// the underlying scheme is able to detect it.
pub trait Cipher {
    /// Encrypt `plaintext` under `key`.
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` under `key`.
    fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

impl<C: Cipher + ?Sized> Cipher for &C {
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        (**self).encrypt(key, plaintext)
    }

    fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        (**self).decrypt(key, ciphertext)
    }
}

/// Opaque key material supplied by the caller.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Use the UTF-8 bytes of `passphrase` as the key.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self::from_bytes(passphrase.as_bytes().to_vec())
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
