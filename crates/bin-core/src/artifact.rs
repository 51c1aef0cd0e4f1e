//! The shareable file artifact.
//!
//! An [`Artifact`] is a plain value: it is built once (from a file, from
//! literal text, or by decoding a wire map) and never mutated. Its content
//! type is not a field; it is derived on demand by [`Artifact::content_type`].

use std::fmt;
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::fs::write_atomic;
use crate::sniff::{infer_content_type, MagicSniffer};

/// An in-memory file with a display name and optional description.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    id: Uuid,
    name: String,
    content: Vec<u8>,
    description: String,
}

impl Artifact {
    /// Load the whole file at `path`.
    ///
    /// The artifact name is `path` exactly as given (not canonicalized) and
    /// the description is empty.
    ///
    /// # Errors
    ///
    /// Returns `BinError::Io` if the file cannot be opened or fully read.
    pub fn from_path(path: &str) -> Result<Self> {
        let content = std::fs::read(path)?;
        let artifact = Self::from_parts(Uuid::new_v4(), path.to_string(), content, String::new());
        debug!(id = %artifact.id, path, len = artifact.content.len(), "loaded artifact from file");
        Ok(artifact)
    }

    /// Build an artifact from literal text.
    ///
    /// # Examples
    ///
    /// ```
    /// use bin_core::Artifact;
    ///
    /// let artifact = Artifact::from_text("notes.txt", "hello", "");
    /// assert!(artifact.available());
    /// assert_eq!(artifact.content(), b"hello");
    /// assert_eq!(artifact.content_type(), "text/plain");
    /// ```
    pub fn from_text(name: &str, text: &str, description: &str) -> Self {
        Self::from_parts(
            Uuid::new_v4(),
            name.to_string(),
            text.as_bytes().to_vec(),
            description.to_string(),
        )
    }

    /// Reassemble an artifact from already-decoded parts (wire map decoding).
    pub(crate) fn from_parts(id: Uuid, name: String, content: Vec<u8>, description: String) -> Self {
        Self {
            id,
            name,
            content,
            description,
        }
    }

    /// Same artifact under a different display name.
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self
        }
    }

    /// Same artifact with a different description (empty clears it).
    pub fn with_description(self, description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..self
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Description text; empty means "no description".
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// An artifact without a name did not load and must not be used as one.
    pub fn available(&self) -> bool {
        !self.name.is_empty()
    }

    /// Content as text, replacing invalid UTF-8 sequences.
    pub fn content_string(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Content type inferred from the name and content prefix.
    ///
    /// Recomputed on every call.
    pub fn content_type(&self) -> String {
        infer_content_type(&self.name, &self.content, &MagicSniffer)
    }

    /// Write the content to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `BinError::Io` if the file cannot be written. The destination
    /// is replaced by rename, so it never holds a partial write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, &self.content)?;
        debug!(id = %self.id, path = %path.display(), len = self.content.len(), "saved artifact");
        Ok(())
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("content_len", &self.content.len())
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BinError;
    use tempfile::tempdir;

    #[test]
    fn test_from_text() {
        let artifact = Artifact::from_text("notes.txt", "hello", "greeting");

        assert_eq!(artifact.name(), "notes.txt");
        assert_eq!(artifact.content(), b"hello");
        assert_eq!(artifact.description(), "greeting");
        assert!(artifact.has_description());
        assert!(!artifact.id().is_nil());
    }

    #[test]
    fn test_ids_are_unique_per_instance() {
        let a = Artifact::from_text("same", "same", "");
        let b = Artifact::from_text("same", "same", "");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_with_name_and_description_keep_id_and_content() {
        let original = Artifact::from_text("draft", "body", "");
        let id = original.id();

        let renamed = original.with_name("final.md").with_description("ready");

        assert_eq!(renamed.id(), id);
        assert_eq!(renamed.name(), "final.md");
        assert_eq!(renamed.content(), b"body");
        assert_eq!(renamed.description(), "ready");
        assert!(!renamed.with_description("").has_description());
    }

    #[test]
    fn test_availability() {
        assert!(!Artifact::from_text("", "content", "").available());
        assert!(Artifact::from_text("x", "", "").available());
        assert!(Artifact::from_text(" ", "", "").available());
    }

    #[test]
    fn test_content_type_example() {
        let artifact = Artifact::from_text("notes.txt", "hello", "");
        assert_eq!(artifact.content_type(), "text/plain");
        assert_eq!(artifact.content_type(), artifact.content_type());
    }

    #[test]
    fn test_content_string_is_lossy() {
        let artifact = Artifact::from_parts(
            Uuid::new_v4(),
            "blob".to_string(),
            vec![b'o', b'k', 0xFF],
            String::new(),
        );
        assert_eq!(artifact.content_string(), "ok\u{FFFD}");
    }

    #[test]
    fn test_from_path_keeps_name_as_given() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.log");
        std::fs::write(&path, b"line one\nline two\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let artifact = Artifact::from_path(&path_str).unwrap();

        assert_eq!(artifact.name(), path_str);
        assert_eq!(artifact.content(), b"line one\nline two\n");
        assert_eq!(artifact.description(), "");
        assert_eq!(artifact.content_type(), "text/plain");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let result = Artifact::from_path(&path.to_string_lossy());
        assert!(matches!(result, Err(BinError::Io { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let original = Artifact::from_parts(
            Uuid::new_v4(),
            "out.bin".to_string(),
            vec![0, 1, 2, 3, 255],
            String::new(),
        );

        original.save(&path).unwrap();
        let loaded = Artifact::from_path(&path.to_string_lossy()).unwrap();

        assert_eq!(loaded.content(), original.content());
        assert_ne!(loaded.id(), original.id());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");

        let result = Artifact::from_text("out.txt", "data", "").save(&path);
        assert!(matches!(result, Err(BinError::Io { .. })));
    }

    #[test]
    fn test_debug_omits_content() {
        let artifact = Artifact::from_text("secret.txt", "PLAINTEXT_MARKER_123", "");
        let debug_output = format!("{:?}", artifact);
        assert!(debug_output.contains("content_len: 20"));
        assert!(!debug_output.contains("PLAINTEXT_MARKER_123"));
    }
}
