use crate::note::MeetingNote;
use crate::screenshot::Screenshot;
use crate::transcript::TranscriptEvent;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Manages the current meeting note and the notes directory.
pub struct MeetingStore {
    storage_dir: PathBuf,
    current: Option<MeetingNote>,
    default_participant: Option<String>,
}

impl MeetingStore {
    pub fn new(storage_dir: PathBuf, default_participant: Option<String>) -> Self {
        Self {
            storage_dir,
            current: None,
            default_participant,
        }
    }

    /// Create a new meeting and set it as current.
    pub fn create_meeting(
        &mut self,
        title: impl Into<String>,
        participants: Vec<String>,
        tags: Vec<String>,
    ) -> &MeetingNote {
        let mut participants = participants;
        if let Some(me) = &self.default_participant {
            if !participants.contains(me) {
                participants.push(me.clone());
            }
        }

        self.current.insert(MeetingNote::new(title, participants, tags))
    }

    pub fn current(&self) -> Option<&MeetingNote> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut MeetingNote> {
        self.current.as_mut()
    }

    /// Append a recognized utterance to the current meeting and persist.
    pub fn add_utterance(&mut self, event: TranscriptEvent) {
        let Some(note) = self.current.as_mut() else {
            warn!("No active meeting to add content to");
            return;
        };

        if event.text.trim().is_empty() {
            return;
        }

        debug!("Adding content to meeting: {}", event.text);
        note.append_utterance(event);

        if let Err(e) = note.save(&self.storage_dir) {
            warn!("Error saving meeting note: {}", e);
        }
    }

    pub fn add_screenshot(&mut self, shot: Screenshot) {
        let Some(note) = self.current.as_mut() else {
            warn!("No active meeting to attach a screenshot to");
            return;
        };

        note.append_screenshot(shot);

        if let Err(e) = note.save(&self.storage_dir) {
            warn!("Error saving meeting note: {}", e);
        }
    }

    /// End the current meeting: compute metadata, save, and hand the
    /// finished note back to the caller. The session boundary timestamp
    /// wins over the note's own clock when provided.
    pub fn end_current_meeting(
        &mut self,
        end_time: Option<chrono::DateTime<chrono::Local>>,
    ) -> Option<MeetingNote> {
        let mut note = self.current.take()?;
        note.end_meeting(end_time);

        if let Err(e) = note.save(&self.storage_dir) {
            warn!("Error saving meeting note: {}", e);
        }

        Some(note)
    }

    /// All saved meetings, most recent first.
    pub fn list_meetings(&self) -> Result<Vec<MeetingNote>> {
        let mut meetings = Vec::new();

        for entry in std::fs::read_dir(&self.storage_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match MeetingNote::load(&path) {
                Ok(note) => meetings.push(note),
                Err(e) => warn!("Skipping unreadable note {}: {}", path.display(), e),
            }
        }

        meetings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(meetings)
    }

    /// Search saved meetings by title, participant, tag, or transcript text.
    pub fn search_meetings(&self, query: &str) -> Result<Vec<MeetingNote>> {
        let query = query.to_lowercase();

        Ok(self
            .list_meetings()?
            .into_iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&query)
                    || m.participants
                        .iter()
                        .any(|p| p.to_lowercase().contains(&query))
                    || m.tags.iter().any(|t| t.to_lowercase().contains(&query))
                    || m.transcript
                        .events()
                        .iter()
                        .any(|e| e.text.to_lowercase().contains(&query))
            })
            .collect())
    }

    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }
}
