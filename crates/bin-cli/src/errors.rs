//! Failures surfaced to the user, each tied to an exit status.

use std::fmt;
use std::process::ExitCode;

use bin_core::BinError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (input file, key file)
    NotFound { message: String, hint: String },

    /// Decryption failed (wrong key, corrupted ciphertext)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Anything else (I/O failures other than not-found)
    Failed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, hint) = match self {
            CliError::NotFound { message, hint } => (message, Some(hint)),
            CliError::AuthFailed { message, hint } => (message, hint.as_ref()),
            CliError::InvalidInput(message) | CliError::Failed(message) => (message, None),
        };
        match hint {
            Some(hint) => write!(f, "{}\n{}", message, hint),
            None => f.write_str(message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Failed(_) => exit_codes::FAILURE,
        }
    }

    /// Map a core error, naming the `subject` it concerns.
    pub fn from_core(err: BinError, subject: &str) -> Self {
        match err {
            BinError::Io { source } if source.kind() == std::io::ErrorKind::NotFound => {
                CliError::not_found(
                    format!("Not found: {}", subject),
                    "Hint: Check the path and try again.",
                )
            }
            BinError::Io { source } => CliError::Failed(format!("{}: {}", subject, source)),
            BinError::Crypto(message) => CliError::auth_failed_with_hint(
                format!("Could not decrypt {}: {}", subject, message),
                "Hint: Make sure you are using the same key that encoded it.",
            ),
            err @ (BinError::Decode(_) | BinError::Parse(_) | BinError::Json { .. }) => {
                CliError::invalid_input(format!("Invalid wire map {}: {}", subject, err))
            }
        }
    }
}

/// Report a failed run on stderr and pick its exit status.
pub fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<CliError>() {
        Some(cli_err) => eprintln!("Error: {}", cli_err),
        None => eprintln!("Error: {:#}", err),
    }
    ExitCode::from(exit_status(err))
}

fn exit_status(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>()
        .map_or(exit_codes::FAILURE, CliError::exit_code)
}
