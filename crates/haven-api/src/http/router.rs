//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`. Middleware: CORS, tracing.
//! The root path serves the embedded chat page -- the thinnest functional
//! client of the JSON API; layout and styling are not a concern here.

use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/personas", get(handlers::persona::list_personas))
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}/messages",
            get(handlers::session::get_messages).post(handlers::chat::post_message),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .route("/", get(index))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - The embedded chat page.
async fn index() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
