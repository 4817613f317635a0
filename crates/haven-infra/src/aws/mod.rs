//! Shared AWS plumbing: credentials and SigV4 request signing.

pub mod sigv4;

use secrecy::SecretString;

/// Static AWS credentials resolved at startup.
///
/// The secret key and optional session token are wrapped in
/// [`SecretString`] and are only exposed while deriving a signature.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

// AwsCredentials intentionally does NOT derive Debug to prevent
// accidental exposure of internal state (same pattern as the providers).

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: SecretString) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key,
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: SecretString) -> Self {
        self.session_token = Some(token);
        self
    }
}
