//! Session lifecycle endpoints.
//!
//! Sessions are transient: created here, held in memory, gone when the
//! process stops. Nothing about a session is persisted -- only the
//! interaction records written as a side effect of turns.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use tokio::sync::Mutex;

use haven_core::chat::SessionState;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/sessions - Create a fresh session and return its id.
pub async fn create_session(
    State(state): State<AppState>,
) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session = SessionState::new();
    let session_id = session.id();
    let created_at = session.created_at();
    state
        .sessions
        .insert(session_id, Arc::new(Mutex::new(session)));

    tracing::debug!(session_id = %session_id, "session created");

    let data = serde_json::json!({
        "session_id": session_id,
        "created_at": created_at.to_rfc3339(),
    });

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(data, request_id, elapsed))
}

/// GET /api/v1/sessions/{id}/messages - Display history for rendering.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = uuid::Uuid::parse_str(&id)
        .map_err(|_| AppError::SessionNotFound(id.clone()))?;
    // Clone the Arc out of the map so the shard guard is not held
    // across the lock await.
    let entry = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(id))?
        .clone();

    let session = entry.lock().await;
    let data = serde_json::json!({
        "session_id": session.id(),
        "messages": session.display(),
    });
    drop(session);

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}
