use super::state::AppState;
use crate::error::ScribeError;
use crate::note::MeetingNote;
use crate::session::SessionStats;
use crate::summary::format_duration;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Optional meeting title
    pub title: Option<String>,

    #[serde(default)]
    pub participants: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub markdown_path: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotResponse {
    pub file_path: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// One saved meeting, without the full transcript payload.
#[derive(Debug, Serialize)]
pub struct MeetingSummaryResponse {
    pub title: String,
    pub started: String,
    pub duration: Option<String>,
    pub participants: Vec<String>,
    pub tags: Vec<String>,
    pub word_count: usize,
}

impl From<&MeetingNote> for MeetingSummaryResponse {
    fn from(note: &MeetingNote) -> Self {
        Self {
            title: note.title.clone(),
            started: note.start_time.format("%Y-%m-%d %H:%M").to_string(),
            duration: note.duration().map(format_duration),
            participants: note.participants.clone(),
            tags: note.tags.clone(),
            word_count: note.word_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(e: &ScribeError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        ScribeError::InvalidState(_) => StatusCode::CONFLICT,
        ScribeError::Transport(_) | ScribeError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        ScribeError::FileSystem(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    match state
        .coordinator
        .start(req.title, req.participants, req.tags)
        .await
    {
        Ok(stats) => {
            info!("Session started via HTTP");
            (StatusCode::OK, Json(stats)).into_response()
        }
        Err(e) => {
            error!("Failed to start session: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// POST /session/end
pub async fn end_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.end().await {
        Ok(report) => {
            info!("Session ended via HTTP");
            (
                StatusCode::OK,
                Json(EndSessionResponse {
                    markdown_path: report.markdown_path.display().to_string(),
                    stats: report.stats,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to end session: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// POST /session/screenshot
pub async fn take_screenshot(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.screenshot().await {
        Ok(shot) => (
            StatusCode::OK,
            Json(ScreenshotResponse {
                file_path: shot.file_path.display().to_string(),
                timestamp: shot.timestamp.to_rfc3339(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to take screenshot: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// GET /session/status
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.status().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// GET /meetings
pub async fn list_meetings(State(state): State<AppState>) -> impl IntoResponse {
    match state.coordinator.list_meetings().await {
        Ok(notes) => {
            let summaries: Vec<MeetingSummaryResponse> = notes.iter().map(Into::into).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            error!("Failed to list meetings: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// GET /meetings/search?q=...
pub async fn search_meetings(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    match state.coordinator.search_meetings(&query.q).await {
        Ok(notes) => {
            let summaries: Vec<MeetingSummaryResponse> = notes.iter().map(Into::into).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(e) => {
            error!("Failed to search meetings: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
