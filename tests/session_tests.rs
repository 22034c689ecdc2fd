// Integration tests for the session lifecycle coordinator.
//
// Audio capture is disabled and no API keys are configured, so sessions run
// in degraded mode: the state machine, stores, and artifact writing are
// exercised without touching a microphone or the network.

use anyhow::Result;
use meeting_scribe::config::Config;
use meeting_scribe::session::{Session, SessionCoordinator, SessionState};
use meeting_scribe::ScribeError;
use tempfile::TempDir;

fn test_config(dir: &TempDir) -> Config {
    let mut cfg = Config::default();
    cfg.paths.logs = dir.path().join("logs").display().to_string();
    cfg.paths.meetings = dir.path().join("meetings").display().to_string();
    cfg.paths.screenshots = dir.path().join("screenshots").display().to_string();
    cfg.audio.enabled = false;
    cfg
}

#[tokio::test]
async fn starting_twice_without_ending_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    coordinator.start(Some("First".into()), vec![], vec![]).await?;

    let err = coordinator
        .start(Some("Second".into()), vec![], vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    Ok(())
}

#[tokio::test]
async fn ending_without_starting_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    let err = coordinator.end().await.unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    Ok(())
}

#[tokio::test]
async fn screenshot_outside_recording_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    // Before any session exists
    let err = coordinator.screenshot().await.unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    // After a session has ended
    coordinator.start(Some("Standup".into()), vec![], vec![]).await?;
    let report = coordinator.end().await?;
    assert_eq!(report.stats.screenshots_taken, 0);

    let err = coordinator.screenshot().await.unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    // Registry unchanged: nothing was captured into the artifact
    let markdown = std::fs::read_to_string(&report.markdown_path)?;
    assert!(markdown.contains("*No screenshots taken*"));

    Ok(())
}

#[tokio::test]
async fn appending_outside_recording_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    let err = coordinator.append_utterance("too early").await.unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    coordinator.start(None, vec![], vec![]).await?;
    coordinator.end().await?;

    let err = coordinator.append_utterance("too late").await.unwrap_err();
    assert!(matches!(err, ScribeError::InvalidState(_)));

    Ok(())
}

#[tokio::test]
async fn transcript_events_appear_in_summary_in_append_order() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    coordinator
        .start(Some("Planning".into()), vec!["Alice".into()], vec![])
        .await?;

    let utterances = [
        "We shipped the parser refactor.",
        "The deploy is scheduled for Thursday.",
        "Bob will own the migration runbook.",
        "No open incidents this week.",
    ];
    for u in utterances {
        coordinator.append_utterance(u).await?;
    }

    let report = coordinator.end().await?;
    assert_eq!(report.stats.state, SessionState::Ended);
    assert_eq!(report.stats.transcript_events, utterances.len());

    let markdown = std::fs::read_to_string(&report.markdown_path)?;

    // Exactly N transcript lines, in append order
    let transcript_section = markdown
        .split("## Transcript")
        .nth(1)
        .and_then(|rest| rest.split("##").next())
        .expect("transcript section present");
    let lines: Vec<&str> = transcript_section
        .lines()
        .filter(|l| l.starts_with('['))
        .collect();
    assert_eq!(lines.len(), utterances.len());
    for (line, expected) in lines.iter().zip(utterances.iter()) {
        assert!(line.ends_with(expected), "line {:?} should end with {:?}", line, expected);
    }

    Ok(())
}

#[tokio::test]
async fn blank_utterances_are_ignored() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    coordinator.start(None, vec![], vec![]).await?;
    coordinator.append_utterance("Something real.").await?;
    coordinator.append_utterance("   ").await?;

    let report = coordinator.end().await?;
    assert_eq!(report.stats.transcript_events, 1);

    Ok(())
}

#[tokio::test]
async fn a_new_session_can_start_after_the_previous_ended() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    coordinator.start(Some("Morning".into()), vec![], vec![]).await?;
    coordinator.end().await?;

    let stats = coordinator
        .start(Some("Afternoon".into()), vec![], vec![])
        .await?;
    assert_eq!(stats.state, SessionState::Recording);
    assert_eq!(stats.title.as_deref(), Some("Afternoon"));

    Ok(())
}

#[tokio::test]
async fn ending_writes_markdown_protocol_and_json_note() -> Result<()> {
    let dir = TempDir::new()?;
    let config = test_config(&dir);
    let meetings_dir = config.meetings_dir();
    let coordinator = SessionCoordinator::new(config);

    coordinator.start(Some("Retro".into()), vec![], vec![]).await?;
    coordinator.append_utterance("We should keep the new CI setup.").await?;
    let report = coordinator.end().await?;

    assert!(report.markdown_path.exists());
    assert!(report.note_path.as_ref().is_some_and(|p| p.exists()));

    let protocol = meetings_dir
        .read_dir()?
        .filter_map(|e| e.ok())
        .find(|e| e.file_name().to_string_lossy().ends_with("_protocol.txt"));
    assert!(protocol.is_some(), "protocol file should exist");

    Ok(())
}

#[tokio::test]
async fn summary_failure_still_writes_the_complete_artifact() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = test_config(&dir);
    config.openai.api_key = "sk-test".into();
    // Point the completion API at a local port nothing listens on.
    let unused = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = unused.local_addr()?;
    drop(unused);
    config.openai.api_base = format!("http://{}/v1", addr);

    let coordinator = SessionCoordinator::new(config);
    coordinator
        .start(Some("Doomed Summary".into()), vec![], vec![])
        .await?;
    coordinator
        .append_utterance("We decided to ship on Friday.")
        .await?;
    let report = coordinator.end().await?;

    let markdown = std::fs::read_to_string(&report.markdown_path)?;
    assert!(markdown.contains("## Transcript"));
    assert!(markdown.contains("We decided to ship on Friday."));
    assert!(!markdown.contains("Key Points"));
    assert!(!markdown.contains("Action Items"));

    Ok(())
}

#[tokio::test]
async fn ended_meetings_are_listed_and_searchable() -> Result<()> {
    let dir = TempDir::new()?;
    let coordinator = SessionCoordinator::new(test_config(&dir));

    coordinator
        .start(Some("Budget Review".into()), vec![], vec![])
        .await?;
    coordinator
        .append_utterance("We discussed the roadmap.")
        .await?;
    coordinator.end().await?;

    coordinator.start(Some("Standup".into()), vec![], vec![]).await?;
    coordinator.end().await?;

    let all = coordinator.list_meetings().await?;
    assert_eq!(all.len(), 2);

    let hits = coordinator.search_meetings("roadmap").await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Budget Review");

    assert!(coordinator.search_meetings("nonexistent").await?.is_empty());

    Ok(())
}

#[test]
fn session_state_machine_transitions_in_order() {
    let mut session = Session::new("Unit");
    assert_eq!(session.state, SessionState::Idle);
    assert!(session.start_time.is_none());

    session.begin().expect("idle -> recording");
    assert_eq!(session.state, SessionState::Recording);
    assert!(session.start_time.is_some());
    assert!(session.begin().is_err(), "recording -> recording rejected");

    session.finish().expect("recording -> ended");
    assert_eq!(session.state, SessionState::Ended);
    assert!(session.end_time.is_some());
    assert!(session.finish().is_err(), "ended is terminal");
    assert!(session.begin().is_err(), "ended -> recording rejected");
}

#[test]
fn finish_before_begin_is_rejected() {
    let mut session = Session::new("Unit");
    assert!(session.finish().is_err());
}
