// Configuration loading, env overrides, and directory creation.

use anyhow::Result;
use meeting_scribe::Config;
use tempfile::TempDir;

fn write_config(dir: &TempDir) -> Result<String> {
    let base = dir.path();
    let content = format!(
        r#"
[paths]
logs = "{base}/logs"
meetings = "{base}/meetings"
screenshots = "{base}/screenshots"

[azure]
speech_key = "file-key"
speech_region = "westeurope"

[transcription]
output_format = "simple"
language = "de-DE"
enable_timestamps = true

[audio]
enabled = false
format = "int16"
channels = 1
rate = 16000
chunk = 1024

[openai]
api_key = ""
model = "gpt-4o-mini"
temperature = 0.2
max_tokens = 512
"#,
        base = base.display()
    );

    let path = base.join("config.toml");
    std::fs::write(&path, content)?;
    Ok(path.display().to_string())
}

#[test]
fn load_parses_sections_and_creates_directories() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir)?;

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.azure.speech_region, "westeurope");
    assert_eq!(cfg.transcription.language, "de-DE");
    assert!(!cfg.audio.enabled);
    assert_eq!(cfg.openai.model, "gpt-4o-mini");

    assert!(dir.path().join("logs").is_dir());
    assert!(dir.path().join("meetings").is_dir());
    assert!(dir.path().join("screenshots").is_dir());

    Ok(())
}

// Environment mutation is process-global and tests in one binary run in
// parallel, so this test only overrides keys no other test here asserts on.
#[test]
fn environment_variables_override_file_values() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir)?;

    std::env::set_var("AZURE_SPEECH_KEY", "env-key");
    std::env::set_var("OPENAI_MAX_TOKENS", "256");

    let cfg = Config::load(&path)?;

    assert_eq!(cfg.azure.speech_key, "env-key");
    assert_eq!(cfg.openai.max_tokens, 256);
    // Untouched keys keep their file values
    assert_eq!(cfg.azure.speech_region, "westeurope");

    std::env::remove_var("AZURE_SPEECH_KEY");
    std::env::remove_var("OPENAI_MAX_TOKENS");

    Ok(())
}

#[test]
fn missing_config_file_is_an_error() {
    let result = Config::load("/nonexistent/path/to/config");
    assert!(result.is_err());
}

#[test]
fn malformed_config_file_is_an_error_not_a_fallback() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[azure\nspeech_key = ")?;

    assert!(Config::load_or_default(&path.display().to_string()).is_err());
    Ok(())
}

#[test]
fn absent_config_file_falls_back_to_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("does-not-exist").display().to_string();

    let cfg = Config::load_or_default(&path)?;
    assert_eq!(cfg.http.port, 7583);
    assert_eq!(cfg.openai.api_base, "https://api.openai.com/v1");

    Ok(())
}

#[test]
fn azure_validation_reports_missing_credentials() {
    let mut cfg = Config::default();
    assert!(cfg.validate_azure().is_err());

    cfg.azure.speech_key = "key".to_string();
    assert!(cfg.validate_azure().is_err(), "region still missing");

    cfg.azure.speech_region = "westeurope".to_string();
    assert!(cfg.validate_azure().is_ok());
}

#[test]
fn openai_key_presence_gates_summaries() {
    let mut cfg = Config::default();
    assert!(!cfg.has_openai_key());

    cfg.openai.api_key = "sk-test".to_string();
    assert!(cfg.has_openai_key());
}
