use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/session/start", post(handlers::start_session))
        .route("/session/end", post(handlers::end_session))
        .route("/session/screenshot", post(handlers::take_screenshot))
        // Session queries
        .route("/session/status", get(handlers::session_status))
        // Saved meetings
        .route("/meetings", get(handlers::list_meetings))
        .route("/meetings/search", get(handlers::search_meetings))
        // Request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
