// Tests for the Markdown summary compiler.

use anyhow::Result;
use chrono::{Local, TimeZone};
use meeting_scribe::note::MeetingNote;
use meeting_scribe::screenshot::Screenshot;
use meeting_scribe::summary::{format_duration, MarkdownRenderer};
use meeting_scribe::transcript::TranscriptEvent;
use std::path::PathBuf;
use tempfile::TempDir;

fn note_with_times(start: (u32, u32, u32), end: (u32, u32, u32)) -> MeetingNote {
    let mut note = MeetingNote::new("Weekly Sync", vec!["Alice".into(), "Bob".into()], vec![]);
    note.start_time = Local
        .with_ymd_and_hms(2026, 3, 10, start.0, start.1, start.2)
        .unwrap();
    note.end_time = Some(
        Local
            .with_ymd_and_hms(2026, 3, 10, end.0, end.1, end.2)
            .unwrap(),
    );
    note
}

fn event_at(h: u32, m: u32, s: u32, text: &str) -> TranscriptEvent {
    TranscriptEvent {
        timestamp: Local.with_ymd_and_hms(2026, 3, 10, h, m, s).unwrap(),
        text: text.to_string(),
    }
}

#[test]
fn duration_renders_as_hours_and_minutes() {
    let note = note_with_times((14, 30, 0), (15, 45, 0));
    let markdown = MarkdownRenderer::render(&note);
    assert!(markdown.contains("- Duration: 1h 15m"));
}

#[test]
fn format_duration_covers_all_granularities() {
    assert_eq!(format_duration(chrono::Duration::minutes(75)), "1h 15m");
    assert_eq!(format_duration(chrono::Duration::hours(2)), "2h 0m");
    assert_eq!(format_duration(chrono::Duration::minutes(45)), "45m");
    assert_eq!(format_duration(chrono::Duration::seconds(30)), "30s");
}

#[test]
fn ongoing_meeting_shows_ongoing_duration() {
    let note = MeetingNote::new("Open End", vec![], vec![]);
    let markdown = MarkdownRenderer::render(&note);
    assert!(markdown.contains("- Duration: Ongoing"));
}

#[test]
fn transcript_lines_render_in_append_order_with_timestamps() {
    let mut note = note_with_times((9, 0, 0), (9, 30, 0));
    note.append_utterance(event_at(9, 0, 12, "Good morning everyone."));
    note.append_utterance(event_at(9, 5, 40, "The release branch is cut"));
    note.append_utterance(event_at(9, 21, 3, "Any blockers?"));

    let markdown = MarkdownRenderer::render(&note);

    let first = markdown.find("[09:00:12] Good morning everyone.").unwrap();
    let second = markdown.find("[09:05:40] The release branch is cut").unwrap();
    let third = markdown.find("[09:21:03] Any blockers?").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn discussion_notes_contain_only_complete_sentences() {
    let mut note = note_with_times((9, 0, 0), (9, 30, 0));
    note.append_utterance(event_at(9, 0, 12, "This is a full sentence."));
    note.append_utterance(event_at(9, 1, 0, "trailing fragment without"));

    let markdown = MarkdownRenderer::render(&note);

    assert!(markdown.contains("- This is a full sentence."));
    assert!(!markdown.contains("- trailing fragment without"));
    // But the fragment is still part of the transcript
    assert!(markdown.contains("[09:01:00] trailing fragment without"));
}

#[test]
fn missing_summary_omits_only_the_ai_section() {
    let mut note = note_with_times((14, 30, 0), (15, 45, 0));
    note.append_utterance(event_at(14, 31, 0, "Decisions were made."));

    let without = MarkdownRenderer::render(&note);
    assert!(!without.contains("Key Points"));
    assert!(!without.contains("Action Items"));
    // Everything else is still there
    assert!(without.contains("## Meeting Details"));
    assert!(without.contains("## Transcript"));
    assert!(without.contains("## 📸 Screenshots"));
    assert!(without.contains("## Metadata"));

    note.summary =
        "## Key Points\n- Decisions were made.\n\n## Action Items\n- [ ] Follow up".to_string();
    let with = MarkdownRenderer::render(&note);
    assert!(with.contains("## Key Points"));
    assert!(with.contains("## Action Items"));
}

#[test]
fn screenshots_section_links_each_capture() {
    let mut note = note_with_times((10, 0, 0), (10, 30, 0));
    note.append_screenshot(Screenshot {
        timestamp: Local.with_ymd_and_hms(2026, 3, 10, 10, 12, 5).unwrap(),
        file_path: PathBuf::from("screenshots/screenshot-20260310_101205.png"),
    });

    let markdown = MarkdownRenderer::render(&note);
    assert!(markdown
        .contains("- [10:12:05] ![Screenshot](screenshots/screenshot-20260310_101205.png)"));
}

#[test]
fn empty_sections_show_placeholders() {
    let note = MeetingNote::new("Quiet Meeting", vec![], vec![]);
    let markdown = MarkdownRenderer::render(&note);

    assert!(markdown.contains("*No notes taken*"));
    assert!(markdown.contains("*No transcript available*"));
    assert!(markdown.contains("*No screenshots taken*"));
}

#[test]
fn save_markdown_uses_the_note_file_stem() -> Result<()> {
    let dir = TempDir::new()?;
    let note = note_with_times((14, 30, 0), (15, 45, 0));

    let path = MarkdownRenderer::save_markdown(&note, dir.path())?;

    assert!(path.exists());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("20260310_143000_Weekly_Sync"));
    assert!(name.ends_with(".md"));

    Ok(())
}
