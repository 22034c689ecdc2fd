// Daemon file logging. Lives in its own binary because installing the
// global subscriber is a once-per-process operation.

use anyhow::Result;
use meeting_scribe::{logging, Config};
use tempfile::TempDir;

#[test]
fn daemon_logging_writes_to_the_logs_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let logs = dir.path().join("logs");
    std::fs::create_dir_all(&logs)?;

    let mut cfg = Config::default();
    cfg.paths.logs = logs.display().to_string();

    let guard = logging::init(&cfg, true);
    tracing::info!("session log line");
    drop(guard); // flush

    let log_file = logs
        .read_dir()?
        .filter_map(|e| e.ok())
        .find(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("meeting-scribe.log")
        })
        .expect("log file created");

    let content = std::fs::read_to_string(log_file.path())?;
    assert!(content.contains("session log line"));

    Ok(())
}
