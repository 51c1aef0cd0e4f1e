//! Error types for bin core operations.
//!
//! Every failure aborts the current construction or transform and is handed
//! back to the caller; nothing here retries or produces a partial artifact.
//! The CLI layer maps these to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for bin core operations.
pub type Result<T> = std::result::Result<T, BinError>;

/// Core error type for artifact operations.
#[derive(Debug, Error)]
pub enum BinError {
    /// File read or write failure
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Malformed wire field (bad base64, non UTF-8 text, missing field)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encryption or decryption error (wrong key, corrupted ciphertext)
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Malformed identifier in a wire map
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<uuid::Error> for BinError {
    fn from(err: uuid::Error) -> Self {
        BinError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BinError = io.into();
        assert!(matches!(err, BinError::Io { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_uuid_error_is_parse() {
        let err: BinError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert!(matches!(err, BinError::Parse(_)));
    }
}
