use thiserror::Error;

/// Errors from the interaction store (DynamoDB boundary).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure before any service response.
    #[error("transport error: {0}")]
    Transport(String),

    /// An error reported by the service, carrying the AWS exception name
    /// (e.g. `ResourceInUseException` when provisioning an existing table).
    #[error("{exception}: {message}")]
    Service { exception: String, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("malformed stored item: {0}")]
    MalformedItem(String),
}

/// Errors resolving startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_includes_exception_name() {
        let err = StoreError::Service {
            exception: "ResourceInUseException".to_string(),
            message: "Table already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ResourceInUseException: Table already exists"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingCredential("AWS_ACCESS_KEY_ID".to_string());
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));
    }
}
