//! Turn submission endpoint.
//!
//! POST /api/v1/sessions/{id}/messages - Run one conversation turn.
//!
//! Each session processes one turn at a time: the handler takes the
//! session's lock with `try_lock`, and a submission that arrives while a
//! turn is in flight gets 409 rather than queueing. Inference errors
//! surface as the turn's error response with session state untouched.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use haven_core::chat::TurnRequest;
use haven_types::persona::Language;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnBody {
    /// Persona name from the catalog.
    pub persona: String,
    pub prompt: String,
    #[serde(default)]
    pub language: Language,
    /// Optional per-turn model override.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional per-turn output bound override.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Recorded on the interaction record; never interpreted.
    #[serde(default)]
    pub web_search: bool,
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TurnBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    if body.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }

    let persona = state
        .catalog
        .get(&body.persona)
        .ok_or_else(|| AppError::Validation(format!("unknown persona: '{}'", body.persona)))?
        .clone();

    let session_id = uuid::Uuid::parse_str(&id)
        .map_err(|_| AppError::SessionNotFound(id.clone()))?;
    // Clone the Arc out of the map so the shard guard is not held
    // across the inference await.
    let entry = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(id))?
        .clone();

    let mut session = entry.try_lock().map_err(|_| AppError::TurnInProgress)?;

    let outcome = state
        .engine
        .run_turn(
            &mut session,
            TurnRequest {
                persona: &persona,
                prompt: body.prompt,
                language: body.language,
                model_override: body.model,
                max_tokens_override: body.max_tokens,
                web_search: body.web_search,
            },
        )
        .await?;

    let data = serde_json::json!({
        "reply": outcome.reply,
        "model": outcome.model,
        "audit_warning": outcome.audit_warning,
    });

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_body_defaults() {
        let body: TurnBody = serde_json::from_str(
            r#"{"persona": "Trauma Support Counselor", "prompt": "I feel anxious"}"#,
        )
        .unwrap();

        assert_eq!(body.language, Language::En);
        assert!(body.model.is_none());
        assert!(body.max_tokens.is_none());
        assert!(!body.web_search);
    }

    #[test]
    fn test_turn_body_full() {
        let body: TurnBody = serde_json::from_str(
            r#"{
                "persona": "PTSD Support Guide",
                "prompt": "سلام",
                "language": "fa",
                "model": "anthropic.claude-3-haiku-20240307-v1:0",
                "max_tokens": 2000,
                "web_search": true
            }"#,
        )
        .unwrap();

        assert_eq!(body.language, Language::Fa);
        assert_eq!(
            body.model.as_deref(),
            Some("anthropic.claude-3-haiku-20240307-v1:0")
        );
        assert_eq!(body.max_tokens, Some(2000));
        assert!(body.web_search);
    }
}
