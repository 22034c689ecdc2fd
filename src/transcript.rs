use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One timestamped recognized utterance. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEvent {
    /// Wall-clock time the utterance was finalized
    pub timestamp: DateTime<Local>,

    /// Recognized text
    pub text: String,
}

impl TranscriptEvent {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            text: text.into(),
        }
    }

    /// Render as a protocol line: `[HH:MM:SS] text`
    pub fn as_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

/// Append-only ordered sequence of transcript events. Ordering is arrival
/// order; only one writer appends at a time (the listener consumer task).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranscriptLog {
    events: Vec<TranscriptEvent>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: TranscriptEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[TranscriptEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Concatenated transcript text, one utterance per line. This is what
    /// gets sent to the summarizer.
    pub fn full_text(&self) -> String {
        self.events
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
