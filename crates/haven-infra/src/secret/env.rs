//! Environment variable secret source.
//!
//! Highest-priority source in the chain: env vars override the secrets
//! file, so deployments can inject credentials without touching disk.

use super::SecretSource;

pub struct EnvSecretSource;

impl EnvSecretSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSource for EnvSecretSource {
    fn get(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            // Present but not valid Unicode -- treat as absent, since
            // credentials must be valid strings.
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_existing() {
        // SAFETY: this test sets a uniquely named var and removes it below.
        unsafe { std::env::set_var("HAVEN_TEST_SECRET_1", "value-123") };

        let source = EnvSecretSource::new();
        assert_eq!(
            source.get("HAVEN_TEST_SECRET_1"),
            Some("value-123".to_string())
        );

        // SAFETY: the var was just set above.
        unsafe { std::env::remove_var("HAVEN_TEST_SECRET_1") };
    }

    #[test]
    fn test_get_missing() {
        let source = EnvSecretSource::new();
        assert!(source.get("HAVEN_NONEXISTENT_VAR_XYZ").is_none());
    }
}
