//! Persona catalog endpoint.
//!
//! GET /api/v1/personas - Built-in personas plus the prompt templates for
//! both languages. Read-only; the catalog never changes at runtime.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use haven_core::persona::prompt_templates;
use haven_types::persona::Language;

use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn list_personas(
    State(state): State<AppState>,
) -> Json<ApiResponse<serde_json::Value>> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let data = serde_json::json!({
        "personas": state.catalog.all(),
        "templates": {
            "en": prompt_templates(Language::En),
            "fa": prompt_templates(Language::Fa),
        },
    });

    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(data, request_id, elapsed))
}
