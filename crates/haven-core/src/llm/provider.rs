//! LlmProvider trait definition.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). The system
//! makes exactly one synchronous call per turn; there is no streaming
//! surface. The concrete implementation lives in `haven-infra`
//! (`BedrockProvider`).

use haven_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for model-inference backends.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "bedrock").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Errors propagate to the caller untouched: no retry, no fallback.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
