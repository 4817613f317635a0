//! Secrets-file source.
//!
//! Reads `secrets.toml` from the data directory once at construction: a
//! flat table of string values (`AWS_ACCESS_KEY_ID = "..."`). A missing
//! file is normal (env-only deployments); a malformed file is reported
//! and treated as empty rather than aborting startup.

use std::path::Path;

use super::SecretSource;

pub struct FileSecretSource {
    values: toml::Table,
}

impl FileSecretSource {
    /// Load `secrets.toml` from `data_dir`.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("secrets.toml");

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No secrets.toml at {}", path.display());
                return Self {
                    values: toml::Table::new(),
                };
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", path.display());
                return Self {
                    values: toml::Table::new(),
                };
            }
        };

        match content.parse::<toml::Table>() {
            Ok(values) => Self { values },
            Err(err) => {
                tracing::warn!("Failed to parse {}: {err}", path.display());
                Self {
                    values: toml::Table::new(),
                }
            }
        }
    }
}

impl SecretSource for FileSecretSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|value| value.as_str())
            .map(|value| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_get() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("secrets.toml"),
            r#"
AWS_ACCESS_KEY_ID = "AKIDEXAMPLE"
AWS_DEFAULT_REGION = "ap-southeast-2"
"#,
        )
        .unwrap();

        let source = FileSecretSource::load(tmp.path());
        assert_eq!(
            source.get("AWS_ACCESS_KEY_ID"),
            Some("AKIDEXAMPLE".to_string())
        );
        assert_eq!(
            source.get("AWS_DEFAULT_REGION"),
            Some("ap-southeast-2".to_string())
        );
        assert!(source.get("AWS_SECRET_ACCESS_KEY").is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let source = FileSecretSource::load(tmp.path());
        assert!(source.get("AWS_ACCESS_KEY_ID").is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("secrets.toml"), "not { valid toml !!!").unwrap();

        let source = FileSecretSource::load(tmp.path());
        assert!(source.get("AWS_ACCESS_KEY_ID").is_none());
    }

    #[test]
    fn test_non_string_values_are_ignored() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("secrets.toml"), "AWS_ACCESS_KEY_ID = 42").unwrap();

        let source = FileSecretSource::load(tmp.path());
        assert!(source.get("AWS_ACCESS_KEY_ID").is_none());
    }
}
