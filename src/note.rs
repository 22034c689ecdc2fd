use crate::screenshot::{Screenshot, ScreenshotRegistry};
use crate::transcript::{TranscriptEvent, TranscriptLog};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata computed when a meeting ends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub duration: Option<String>,
    pub word_count: usize,
    pub average_words_per_minute: f64,
}

/// A meeting note: session metadata plus everything collected while
/// recording. Persisted as JSON next to the rendered Markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingNote {
    pub title: String,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub transcript: TranscriptLog,
    #[serde(default)]
    pub screenshots: ScreenshotRegistry,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub metadata: NoteMetadata,
    #[serde(skip)]
    pub file_path: Option<PathBuf>,
}

impl MeetingNote {
    pub fn new(title: impl Into<String>, participants: Vec<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            start_time: Local::now(),
            end_time: None,
            participants,
            tags,
            transcript: TranscriptLog::new(),
            screenshots: ScreenshotRegistry::new(),
            summary: String::new(),
            metadata: NoteMetadata::default(),
            file_path: None,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    pub fn word_count(&self) -> usize {
        self.transcript
            .events()
            .iter()
            .map(|e| e.text.split_whitespace().count())
            .sum()
    }

    fn words_per_minute(&self) -> f64 {
        match self.duration() {
            Some(d) if d.num_seconds() > 0 => {
                let minutes = d.num_seconds() as f64 / 60.0;
                (self.word_count() as f64 / minutes * 100.0).round() / 100.0
            }
            _ => 0.0,
        }
    }

    /// Append a recognized utterance. Blank text is ignored.
    pub fn append_utterance(&mut self, event: TranscriptEvent) {
        if event.text.trim().is_empty() {
            return;
        }
        self.transcript.append(event);
    }

    pub fn append_screenshot(&mut self, shot: Screenshot) {
        self.screenshots.append(shot);
    }

    /// Raw transcript text, one utterance per line.
    pub fn raw_text(&self) -> String {
        self.transcript.full_text()
    }

    /// Complete sentences only (utterances ending in terminal punctuation),
    /// used for the structured notes section.
    pub fn sentences(&self) -> Vec<&str> {
        self.transcript
            .events()
            .iter()
            .map(|e| e.text.trim())
            .filter(|t| t.ends_with('.') || t.ends_with('!') || t.ends_with('?'))
            .collect()
    }

    /// End the meeting and compute metadata. Idempotent on the end time: an
    /// already-ended note keeps its original end time.
    pub fn end_meeting(&mut self, end_time: Option<DateTime<Local>>) {
        if let Some(t) = end_time {
            self.end_time = Some(t);
        } else if self.end_time.is_none() {
            self.end_time = Some(Local::now());
        }

        self.metadata.duration = self.duration().map(|d| format!("{}s", d.num_seconds()));
        self.metadata.word_count = self.word_count();
        self.metadata.average_words_per_minute = self.words_per_minute();
    }

    /// Filename stem shared by the JSON note and the Markdown artifact.
    pub fn file_stem(&self) -> String {
        let safe_title: String = self
            .title
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}", self.start_time.format("%Y%m%d_%H%M%S"), safe_title)
    }

    /// Save the note as JSON under `dir`, remembering the path for later
    /// saves of the same note.
    pub fn save(&mut self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let path = match &self.file_path {
            Some(p) => p.clone(),
            None => dir.join(format!("{}.json", self.file_stem())),
        };

        let json = serde_json::to_string_pretty(self).context("Failed to serialize note")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write note: {}", path.display()))?;

        self.file_path = Some(path.clone());
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read note: {}", path.display()))?;
        let mut note: MeetingNote =
            serde_json::from_str(&json).context("Failed to parse note")?;
        note.file_path = Some(path.to_path_buf());
        Ok(note)
    }
}
