use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bin_core::cipher::age_cipher::{DEFAULT_MAX_WORK_FACTOR, DEFAULT_WORK_FACTOR};
use bin_core::AgeCipher;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BinConfig {
    #[serde(default)]
    pub cipher: CipherSection,
    #[serde(default)]
    pub key: KeySection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CipherSection {
    /// scrypt work factor (log2 N) for new ciphertexts
    #[serde(default = "default_work_factor")]
    pub work_factor: u8,
    /// Highest work factor accepted when decrypting
    #[serde(default = "default_max_work_factor")]
    pub max_work_factor: u8,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KeySection {
    pub path: Option<String>,
}

impl Default for CipherSection {
    fn default() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
            max_work_factor: DEFAULT_MAX_WORK_FACTOR,
        }
    }
}

fn default_work_factor() -> u8 {
    DEFAULT_WORK_FACTOR
}

fn default_max_work_factor() -> u8 {
    DEFAULT_MAX_WORK_FACTOR
}

impl BinConfig {
    pub fn cipher(&self) -> anyhow::Result<AgeCipher> {
        AgeCipher::with_work_factor(self.cipher.work_factor, self.cipher.max_work_factor)
            .map_err(|e| anyhow::anyhow!("Invalid [cipher] config: {}", e))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

/// Load the config at `path`, or the defaults if no such file exists.
pub fn load_config(path: &Path) -> anyhow::Result<BinConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(BinConfig::default());
    }
    read_config(path)
}

pub fn read_config(path: &Path) -> anyhow::Result<BinConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("bin"));
        }
    }
    Ok(home_dir()?.join(".config").join("bin"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: BinConfig = toml::from_str("").unwrap();
        assert_eq!(config.cipher.work_factor, DEFAULT_WORK_FACTOR);
        assert_eq!(config.cipher.max_work_factor, DEFAULT_MAX_WORK_FACTOR);
        assert!(config.key.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: BinConfig =
            toml::from_str("[cipher]\nwork_factor = 12\n\n[key]\npath = \"/tmp/k\"\n").unwrap();
        assert_eq!(config.cipher.work_factor, 12);
        assert_eq!(config.cipher.max_work_factor, DEFAULT_MAX_WORK_FACTOR);
        assert_eq!(config.key.path.as_deref(), Some("/tmp/k"));
        assert_eq!(config.cipher().unwrap().work_factor(), 12);
    }

    #[test]
    fn test_invalid_work_factor_rejected() {
        let config: BinConfig = toml::from_str("[cipher]\nwork_factor = 0\n").unwrap();
        assert!(config.cipher().is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.cipher.work_factor, DEFAULT_WORK_FACTOR);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cipher\nwork_factor = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
