//! # Bin Core
//!
//! Core library for bincli - a small tool for sharing files as encrypted,
//! base64-encoded wire maps that can be embedded in a JSON payload.
//!
//! This crate owns the [`Artifact`] entity and both directions of the map
//! transform, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **artifact**: The in-memory file value and its constructors
//! - **codec**: Encrypt/encode into a wire map and decode/decrypt back
//! - **cipher**: Symmetric cipher seam and the age-backed implementation
//! - **sniff**: Content-type inference over a bounded content prefix
//! - **fs**: Atomic file writes used by [`Artifact::save`]
//!
//! ## Security Model
//!
//! Each wire field is encrypted independently under the same key. There is
//! no binding across fields: anyone holding the key can decrypt, drop or swap
//! individual fields, and integrity is only what the cipher provides per field.

pub mod artifact;
pub mod cipher;
pub mod codec;
pub mod error;
pub mod fs;
pub mod sniff;

pub use artifact::Artifact;
pub use cipher::{AgeCipher, Cipher, SymmetricKey};
pub use codec::{ArtifactCodec, EncodedFields, WireMap};
pub use error::{BinError, Result};
pub use sniff::{infer_content_type, ContentSniffer, MagicSniffer};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
