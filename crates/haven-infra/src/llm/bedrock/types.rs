//! Bedrock Runtime wire types (Anthropic Messages payload shape).
//!
//! These are Bedrock-specific request/response structures used for HTTP
//! communication. They are NOT the generic LLM types from haven-types --
//! those are provider-agnostic. The model id travels in the URL path, not
//! the body; the body pins `anthropic_version` instead.

use serde::{Deserialize, Serialize};

/// Request body for `invoke`.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// A single message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// Response body for `invoke`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub model: String,
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: WireUsage,
}

/// A content block in the reply. Only text blocks are produced for
/// tool-less requests like ours.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let req = BedrockRequest {
            anthropic_version: "bedrock-2023-05-31".to_string(),
            max_tokens: 4096,
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            system: Some("Be helpful".to_string()),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["system"], "Be helpful");
        // The model id lives in the URL path, never in the body.
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_request_omits_missing_system() {
        let req = BedrockRequest {
            anthropic_version: "bedrock-2023-05-31".to_string(),
            max_tokens: 1024,
            messages: vec![],
            system: None,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "msg_456",
            "content": [{"type": "text", "text": "Hello!"}],
            "model": "anthropic.claude-3-5-sonnet-20241022-v2:0",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 50, "output_tokens": 20}
        }"#;

        let resp: InvokeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "msg_456");
        assert!(matches!(&resp.content[0], ContentBlock::Text { text } if text == "Hello!"));
        assert_eq!(resp.usage.input_tokens, 50);
    }

    #[test]
    fn test_response_without_usage() {
        let json = r#"{
            "id": "msg_1",
            "content": [{"type": "text", "text": "hi"}],
            "model": "m",
            "stop_reason": null
        }"#;

        let resp: InvokeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.usage.input_tokens, 0);
        assert!(resp.stop_reason.is_none());
    }
}
