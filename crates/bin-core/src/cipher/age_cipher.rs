//! Age encryption/decryption for wire fields.
//!
//! Age's passphrase mode (scrypt recipient) is used with the raw key bytes
//! rendered as a standard base64 string, so arbitrary binary keys map to a
//! unique passphrase.
//!
//! Every call runs scrypt once. The codec encrypts up to four fields per
//! artifact, so the work factor is configurable rather than calibrated by age.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::Cipher;
use crate::error::{BinError, Result};

/// Default scrypt work factor (log2 of N) for new ciphertexts.
pub const DEFAULT_WORK_FACTOR: u8 = 18;

/// Default ceiling on the work factor accepted when decrypting.
pub const DEFAULT_MAX_WORK_FACTOR: u8 = 22;

/// Largest work factor accepted in configuration.
const WORK_FACTOR_LIMIT: u8 = 30;

/// Age passphrase-based cipher.
#[derive(Debug, Clone, Copy)]
pub struct AgeCipher {
    work_factor: u8,
    max_work_factor: u8,
}

impl AgeCipher {
    /// Create a cipher with explicit scrypt work factors.
    ///
    /// # Errors
    ///
    /// Returns `BinError::Crypto` if either value is zero or above 30, or if
    /// `work_factor` exceeds `max_work_factor` (the cipher could not read its
    /// own output).
    pub fn with_work_factor(work_factor: u8, max_work_factor: u8) -> Result<Self> {
        for (label, value) in [("work factor", work_factor), ("max work factor", max_work_factor)] {
            if value == 0 || value > WORK_FACTOR_LIMIT {
                return Err(BinError::Crypto(format!(
                    "{} must be between 1 and {} (got {})",
                    label, WORK_FACTOR_LIMIT, value
                )));
            }
        }
        if work_factor > max_work_factor {
            return Err(BinError::Crypto(format!(
                "work factor {} exceeds max work factor {}",
                work_factor, max_work_factor
            )));
        }
        Ok(Self {
            work_factor,
            max_work_factor,
        })
    }

    pub fn work_factor(&self) -> u8 {
        self.work_factor
    }

    pub fn max_work_factor(&self) -> u8 {
        self.max_work_factor
    }
}

impl Default for AgeCipher {
    fn default() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
            max_work_factor: DEFAULT_MAX_WORK_FACTOR,
        }
    }
}

/// Render raw key bytes as an age passphrase.
pub fn key_bytes_to_passphrase(key: &[u8]) -> Result<SecretString> {
    if key.is_empty() {
        return Err(BinError::Crypto("Key cannot be empty".to_string()));
    }
    Ok(SecretString::from(STANDARD.encode(key)))
}

impl Cipher for AgeCipher {
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut recipient = age::scrypt::Recipient::new(key_bytes_to_passphrase(key)?);
        recipient.set_work_factor(self.work_factor);

        let encryptor =
            age::Encryptor::with_recipients(iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| BinError::Crypto(format!("Failed to create encryptor: {}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(&mut encrypted)
            .map_err(|e| BinError::Crypto(format!("Failed to create encryptor: {}", e)))?;

        writer
            .write_all(plaintext)
            .map_err(|e| BinError::Crypto(format!("Encryption write failed: {}", e)))?;

        writer
            .finish()
            .map_err(|e| BinError::Crypto(format!("Encryption finish failed: {}", e)))?;

        Ok(encrypted)
    }

    fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let decryptor = age::Decryptor::new(ciphertext)
            .map_err(|e| BinError::Crypto(format!("Failed to create decryptor: {}", e)))?;

        let mut identity = age::scrypt::Identity::new(key_bytes_to_passphrase(key)?);
        identity.set_max_work_factor(self.max_work_factor);

        let mut reader = decryptor
            .decrypt(iter::once(&identity as &dyn age::Identity))
            .map_err(|e| match e {
                age::DecryptError::NoMatchingKeys
                | age::DecryptError::DecryptionFailed
                | age::DecryptError::KeyDecryptionFailed => {
                    BinError::Crypto("Incorrect key".to_string())
                }
                // age's Display for this variant can overflow; format it ourselves.
                age::DecryptError::ExcessiveWork { required, .. } => BinError::Crypto(format!(
                    "ciphertext work factor {} exceeds max work factor {}",
                    required, self.max_work_factor
                )),
                _ => BinError::Crypto(format!("Decryption failed: {}", e)),
            })?;

        let mut decrypted = Vec::new();
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| BinError::Crypto(format!("Failed to read decrypted data: {}", e)))?;

        Ok(decrypted)
    }
}
