//! AWS Signature Version 4 request signing.
//!
//! Both external boundaries (Bedrock Runtime, DynamoDB) authenticate the
//! same way: the request is summarized into a canonical form, chained
//! through HMAC-SHA256 with a date-scoped derived key, and the result is
//! carried in the `authorization` header. Only the pieces these two
//! JSON-over-POST APIs need are implemented: an empty query string and
//! caller-supplied headers.
//!
//! Reference: AWS General Reference, "Signature Version 4 signing process".

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use super::AwsCredentials;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Everything the signature derivation depends on besides the request.
pub struct SigningParams<'a> {
    pub credentials: &'a AwsCredentials,
    pub region: &'a str,
    /// Service name as it appears in the credential scope
    /// (e.g. "dynamodb", "bedrock").
    pub service: &'a str,
    pub now: DateTime<Utc>,
}

/// Sign a request and return the headers to attach to it.
///
/// `extra_headers` are the application headers that participate in the
/// signature (e.g. `content-type`, `x-amz-target`); the caller sets them
/// on the request itself. `host` is signed but not returned, since the
/// HTTP client derives it from the URL. The returned list contains
/// `x-amz-date`, `x-amz-security-token` (when a session token is
/// present), and `authorization`.
pub fn sign_headers(
    params: &SigningParams<'_>,
    method: &str,
    host: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
    payload: &[u8],
) -> Vec<(String, String)> {
    let amz_date = params.now.format("%Y%m%dT%H%M%SZ").to_string();
    let datestamp = params.now.format("%Y%m%d").to_string();

    let session_token = params
        .credentials
        .session_token
        .as_ref()
        .map(|t| t.expose_secret().to_string());

    // Canonical headers: caller headers + host + x-amz-date (+ token),
    // lowercase names, sorted.
    let mut headers: Vec<(String, String)> = extra_headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
        .collect();
    headers.push(("host".to_string(), host.to_string()));
    headers.push(("x-amz-date".to_string(), amz_date.clone()));
    if let Some(token) = &session_token {
        headers.push(("x-amz-security-token".to_string(), token.clone()));
    }
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let payload_hash = sha256_hex(payload);
    let canonical_request =
        format!("{method}\n{path}\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}");

    let scope = format!(
        "{datestamp}/{}/{}/aws4_request",
        params.region, params.service
    );
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let secret = params.credentials.secret_access_key.expose_secret();
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), datestamp.as_bytes());
    let k_region = hmac_sha256(&k_date, params.region.as_bytes());
    let k_service = hmac_sha256(&k_region, params.service.as_bytes());
    let k_signing = hmac_sha256(&k_service, b"aws4_request");
    let signature = hex_encode(&hmac_sha256(&k_signing, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        params.credentials.access_key_id
    );

    let mut out = vec![("x-amz-date".to_string(), amz_date)];
    if let Some(token) = session_token {
        out.push(("x-amz-security-token".to_string(), token));
    }
    out.push(("authorization".to_string(), authorization));
    out
}

/// Percent-encode one path segment the way the canonical request expects:
/// unreserved characters pass through, everything else becomes `%XX`.
///
/// Bedrock model identifiers contain `.` and `:`; the encoded form must be
/// used both in the request URL and in the canonical path so the two agree.
pub fn uri_encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            other => {
                out.push('%');
                out.push_str(&format!("{other:02X}"));
            }
        }
    }
    out
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex_encode(&Sha256::digest(data))
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
