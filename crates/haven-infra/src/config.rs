//! Startup settings resolved through the secrets chain.
//!
//! Credentials are required; region and table name fall back to fixed
//! defaults. Values are read once at process start and injected into the
//! clients -- nothing re-reads configuration at runtime.

use std::path::PathBuf;

use secrecy::SecretString;

use haven_types::error::ConfigError;

use crate::aws::AwsCredentials;
use crate::secret::SecretChain;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TABLE: &str = "haven-support-logs";

/// Resolved process-wide settings.
#[derive(Clone)]
pub struct Settings {
    pub region: String,
    pub table_name: String,
    pub credentials: AwsCredentials,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("region", &self.region)
            .field("table_name", &self.table_name)
            .field("credentials", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Resolve settings from the given chain.
    ///
    /// `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` are required;
    /// `AWS_SESSION_TOKEN` is optional; `AWS_DEFAULT_REGION` and
    /// `HAVEN_TABLE` fall back to defaults.
    pub fn from_chain(chain: &SecretChain) -> Result<Self, ConfigError> {
        let access_key_id = chain
            .get("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| ConfigError::MissingCredential("AWS_ACCESS_KEY_ID".to_string()))?;
        let secret_access_key = chain
            .get("AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| ConfigError::MissingCredential("AWS_SECRET_ACCESS_KEY".to_string()))?;

        let mut credentials =
            AwsCredentials::new(access_key_id, SecretString::from(secret_access_key));
        if let Some(token) = chain.get("AWS_SESSION_TOKEN") {
            credentials = credentials.with_session_token(SecretString::from(token));
        }

        let region = chain
            .get("AWS_DEFAULT_REGION")
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let table_name = chain
            .get("HAVEN_TABLE")
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            region,
            table_name,
            credentials,
        })
    }
}

/// The data directory holding `secrets.toml` (`~/.haven` by default,
/// overridable with `HAVEN_DATA_DIR`).
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HAVEN_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".haven")
}
