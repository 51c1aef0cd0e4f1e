//! Key resolution.
//!
//! Sources, first match wins: `--key-file`, `BIN_KEY`, config `[key] path`,
//! then an interactive prompt when stdin is a terminal.

use std::io::IsTerminal;
use std::path::Path;

use dialoguer::Password;
use zeroize::Zeroizing;

use bin_core::SymmetricKey;

use crate::config::BinConfig;
use crate::constants::KEY_ENV;
use crate::errors::CliError;

pub fn resolve_key(key_file: Option<&str>, config: &BinConfig) -> anyhow::Result<SymmetricKey> {
    if let Some(path) = key_file {
        tracing::debug!(path, "using key file from command line");
        return read_key_file(Path::new(path));
    }

    if let Ok(value) = std::env::var(KEY_ENV) {
        let value = Zeroizing::new(value);
        if !value.is_empty() {
            tracing::debug!("using key from {}", KEY_ENV);
            return Ok(SymmetricKey::from_passphrase(&value));
        }
    }

    if let Some(path) = config.key.path.as_deref() {
        tracing::debug!(path, "using key file from config");
        return read_key_file(Path::new(path));
    }

    if std::io::stdin().is_terminal() {
        return prompt_key();
    }

    Err(CliError::invalid_input(format!(
        "No key provided.\nHint: Pass --key-file, set {}, or set [key] path in the config.",
        KEY_ENV
    ))
    .into())
}

pub fn read_key_file(path: &Path) -> anyhow::Result<SymmetricKey> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CliError::not_found(
                format!("Key file not found: {}", path.display()),
                "Hint: Check --key-file or the [key] path in your config.",
            )
            .into());
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to read key file {}: {}",
                path.display(),
                e
            ))
        }
    };
    let key = SymmetricKey::from_bytes(bytes);
    if key.is_empty() {
        return Err(CliError::invalid_input(format!("Key file is empty: {}", path.display())).into());
    }
    Ok(key)
}

fn prompt_key() -> anyhow::Result<SymmetricKey> {
    let input = Zeroizing::new(
        Password::new()
            .with_prompt("Key")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read key: {}", e))?,
    );
    if input.is_empty() {
        return Err(CliError::invalid_input("Key cannot be empty").into());
    }
    Ok(SymmetricKey::from_passphrase(&input))
}
