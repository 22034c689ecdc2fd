use super::state::SessionState;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Snapshot of a session, served over the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub state: SessionState,

    /// Session identifier; `None` before the first start.
    pub session_id: Option<String>,

    pub title: Option<String>,

    pub started_at: Option<DateTime<Local>>,

    /// Seconds since start (until end, once ended)
    pub duration_secs: f64,

    /// Number of transcript events appended so far
    pub transcript_events: usize,

    /// Number of screenshots taken so far
    pub screenshots_taken: usize,
}

impl SessionStats {
    pub fn idle() -> Self {
        Self {
            state: SessionState::Idle,
            session_id: None,
            title: None,
            started_at: None,
            duration_secs: 0.0,
            transcript_events: 0,
            screenshots_taken: 0,
        }
    }
}
