use crate::error::{Result, ScribeError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Lifecycle states. Transitions are strictly idle → recording → ended;
/// ended is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Recording,
    Ended,
}

/// One recording-to-summary lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub start_time: Option<DateTime<Local>>,
    pub end_time: Option<DateTime<Local>>,
    pub state: SessionState,
}

impl Session {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: format!("meeting-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            start_time: None,
            end_time: None,
            state: SessionState::Idle,
        }
    }

    /// idle → recording; stamps the session start.
    pub fn begin(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(ScribeError::InvalidState(format!(
                "cannot start recording from state {:?}",
                self.state
            )));
        }
        self.start_time = Some(Local::now());
        self.state = SessionState::Recording;
        Ok(())
    }

    /// recording → ended; stamps the session end.
    pub fn finish(&mut self) -> Result<DateTime<Local>> {
        if self.state != SessionState::Recording {
            return Err(ScribeError::InvalidState(format!(
                "cannot end recording from state {:?}",
                self.state
            )));
        }
        let end = Local::now();
        self.end_time = Some(end);
        self.state = SessionState::Ended;
        Ok(end)
    }

    /// Guard for operations only valid while recording (appends,
    /// screenshots).
    pub fn ensure_recording(&self) -> Result<()> {
        if self.state != SessionState::Recording {
            return Err(ScribeError::InvalidState(format!(
                "session is {:?}, not recording",
                self.state
            )));
        }
        Ok(())
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }
}
