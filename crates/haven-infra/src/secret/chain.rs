//! Secret chain builder -- wires concrete sources in priority order.
//!
//! Default chain order: `[EnvSecretSource, FileSecretSource]`.

use std::path::Path;

use super::env::EnvSecretSource;
use super::file::FileSecretSource;
use super::SecretSource;

/// Ordered list of secret sources; first match wins.
pub struct SecretChain {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretChain {
    pub fn new(sources: Vec<Box<dyn SecretSource>>) -> Self {
        Self { sources }
    }

    /// Resolve a key through the chain.
    pub fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get(key))
    }
}

/// Build the default resolution chain:
/// 1. Environment variables (highest priority)
/// 2. `secrets.toml` in the data directory
pub fn build_secret_chain(data_dir: &Path) -> SecretChain {
    SecretChain::new(vec![
        Box::new(EnvSecretSource::new()),
        Box::new(FileSecretSource::load(data_dir)),
    ])
}
