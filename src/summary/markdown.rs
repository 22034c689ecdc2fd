use crate::note::MeetingNote;
use anyhow::{Context, Result};
use chrono::Duration;
use std::path::{Path, PathBuf};

/// Renders meeting notes in Markdown format.
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Convert a meeting note to the final Markdown document.
    ///
    /// Transcript lines appear in append order, one per event, prefixed
    /// with the wall-clock time of the utterance. The AI section is only
    /// present when a summary was generated.
    pub fn render(meeting: &MeetingNote) -> String {
        let mut md = Vec::new();

        md.push(format!("# {}", meeting.title));
        md.push(String::new());
        md.push("---".to_string());

        md.push("## Meeting Details".to_string());
        md.push(format!(
            "- Date: {}",
            meeting.start_time.format("%Y-%m-%d %H:%M")
        ));
        md.push(match meeting.duration() {
            Some(d) => format!("- Duration: {}", format_duration(d)),
            None => "- Duration: Ongoing".to_string(),
        });
        md.push(format!(
            "- Participants: {}",
            meeting.participants.join(", ")
        ));
        md.push(format!("- Tags: {}", meeting.tags.join(", ")));
        md.push(String::new());

        md.push("## 📝 Discussion Notes".to_string());
        let sentences = meeting.sentences();
        if sentences.is_empty() {
            md.push("- *No notes taken*".to_string());
        } else {
            for s in sentences {
                md.push(format!("- {}", s));
            }
        }
        md.push(String::new());

        if !meeting.summary.is_empty() {
            md.push(meeting.summary.trim().to_string());
            md.push(String::new());
        }

        md.push("## Transcript".to_string());
        if meeting.transcript.is_empty() {
            md.push("*No transcript available*".to_string());
        } else {
            for event in meeting.transcript.events() {
                md.push(event.as_line());
            }
        }
        md.push(String::new());

        md.push("## 📸 Screenshots".to_string());
        if meeting.screenshots.is_empty() {
            md.push("*No screenshots taken*".to_string());
        } else {
            for shot in meeting.screenshots.shots() {
                md.push(format!(
                    "- [{}] ![Screenshot]({})",
                    shot.timestamp.format("%H:%M:%S"),
                    shot.file_path.display()
                ));
            }
        }
        md.push(String::new());

        md.push("## Metadata".to_string());
        md.push(format!("- Word count: {}", meeting.word_count()));
        md.push(format!(
            "- Average words per minute: {}",
            meeting.metadata.average_words_per_minute
        ));

        md.join("\n")
    }

    /// Save the rendered document under `dir` using the note's file stem.
    pub fn save_markdown(meeting: &MeetingNote, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let path = dir.join(format!("{}.md", meeting.file_stem()));
        std::fs::write(&path, Self::render(meeting))
            .with_context(|| format!("Failed to write markdown: {}", path.display()))?;

        Ok(path)
    }
}

/// Human duration: "1h 15m", "45m", "30s".
pub fn format_duration(d: Duration) -> String {
    let hours = d.num_hours();
    let minutes = d.num_minutes() % 60;
    let seconds = d.num_seconds() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}
