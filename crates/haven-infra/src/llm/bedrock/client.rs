//! BedrockProvider -- concrete [`LlmProvider`] implementation for the AWS
//! Bedrock Runtime API.
//!
//! Issues one SigV4-signed, non-streaming `invoke` call per turn. The
//! model id is supplied per request (personas carry defaults, the UI may
//! override), so the provider holds only the HTTP client, the credentials,
//! and the region.

use std::time::Duration;

use chrono::Utc;

use haven_core::llm::provider::LlmProvider;
use haven_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

use crate::aws::sigv4::{sign_headers, uri_encode_path_segment, SigningParams};
use crate::aws::AwsCredentials;

use super::types::{BedrockRequest, ContentBlock, InvokeResponse, WireMessage};

/// AWS Bedrock Claude LLM provider.
pub struct BedrockProvider {
    client: reqwest::Client,
    credentials: AwsCredentials,
    region: String,
}

// BedrockProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl BedrockProvider {
    /// The Anthropic API version for Bedrock.
    const API_VERSION: &'static str = "bedrock-2023-05-31";

    /// SigV4 service name for the Bedrock Runtime.
    const SERVICE: &'static str = "bedrock";

    pub fn new(credentials: AwsCredentials, region: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            credentials,
            region,
        }
    }

    fn host(&self) -> String {
        format!("bedrock-runtime.{}.amazonaws.com", self.region)
    }

    /// Request path for a non-streaming invoke. The model id segment is
    /// percent-encoded (ids contain `:`), and the encoded form is used in
    /// both the URL and the signature's canonical path.
    fn invoke_path(model: &str) -> String {
        format!("/model/{}/invoke", uri_encode_path_segment(model))
    }

    fn to_bedrock_request(request: &CompletionRequest) -> BedrockRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        BedrockRequest {
            anthropic_version: Self::API_VERSION.to_string(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
        }
    }
}

impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = serde_json::to_vec(&Self::to_bedrock_request(request))
            .map_err(|e| LlmError::InvalidRequest(format!("failed to encode request: {e}")))?;

        let host = self.host();
        let path = Self::invoke_path(&request.model);
        let url = format!("https://{host}{path}");

        let extra_headers = [
            ("accept", "application/json"),
            ("content-type", "application/json"),
        ];
        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: Self::SERVICE,
            now: Utc::now(),
        };
        let signed = sign_headers(&params, "POST", &host, &path, &extra_headers, &body);

        tracing::debug!(url = %url, model = %request.model, "Bedrock invoke request");

        let mut http_request = self.client.post(&url);
        for (name, value) in extra_headers {
            http_request = http_request.header(name, value);
        }
        for (name, value) in &signed {
            http_request = http_request.header(name.as_str(), value.as_str());
        }

        let response = http_request
            .body(body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Bedrock API error response");
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                400 => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let invoke_resp: InvokeResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        // First text segment of the reply is the answer.
        let content = invoke_resp
            .content
            .iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.clone()),
            })
            .ok_or_else(|| {
                LlmError::Deserialization("response contained no text block".to_string())
            })?;

        let stop_reason = match invoke_resp.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            id: invoke_resp.id,
            content,
            model: invoke_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: invoke_resp.usage.input_tokens,
                output_tokens: invoke_resp.usage.output_tokens,
            },
        })
    }
}
