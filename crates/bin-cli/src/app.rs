//! Per-invocation context shared by commands.

use std::path::PathBuf;

use bin_core::{AgeCipher, ArtifactCodec, SymmetricKey};

use crate::cli::Cli;
use crate::config::{default_config_path, load_config, BinConfig};
use crate::key::resolve_key;

pub struct AppContext {
    key_file: Option<String>,
    config: BinConfig,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = match cli.config.as_deref() {
            Some(path) => PathBuf::from(path),
            None => default_config_path()?,
        };
        let config = load_config(&config_path)?;
        Ok(Self {
            key_file: cli.key_file.clone(),
            config,
        })
    }

    pub fn codec(&self) -> anyhow::Result<ArtifactCodec<AgeCipher>> {
        Ok(ArtifactCodec::with_cipher(self.config.cipher()?))
    }

    pub fn key(&self) -> anyhow::Result<SymmetricKey> {
        resolve_key(self.key_file.as_deref(), &self.config)
    }
}
