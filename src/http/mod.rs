//! HTTP control API
//!
//! The daemon exposes the session lifecycle to the CLI (and anything else
//! local) over HTTP:
//! - POST /session/start - begin a new session
//! - POST /session/end - end it and write the Markdown artifact
//! - POST /session/screenshot - capture a screenshot into the session
//! - GET /session/status - session snapshot
//! - GET /meetings - saved meetings, most recent first
//! - GET /meetings/search?q=... - search saved meetings
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
