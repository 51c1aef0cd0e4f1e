//! Shared CLI constants.

/// Process exit statuses for `bin`. Clap owns 2 for usage errors; any failure
/// without a dedicated code exits with 1.
pub mod exit_codes {
    pub const FAILURE: u8 = 1;

    /// Input file or key file missing.
    pub const NOT_FOUND: u8 = 3;

    /// Bad arguments, or a wire map that does not decode to an artifact.
    pub const INVALID_INPUT: u8 = 4;

    /// The key could not open a ciphertext field.
    pub const AUTH_FAILED: u8 = 5;
}

/// Environment variable holding the raw key.
pub const KEY_ENV: &str = "BIN_KEY";
