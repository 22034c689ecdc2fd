use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub logs: String,
    pub meetings: String,
    pub screenshots: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            logs: "logs".to_string(),
            meetings: "meetings".to_string(),
            screenshots: "screenshots".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureConfig {
    #[serde(default)]
    pub speech_key: String,
    #[serde(default)]
    pub speech_region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Azure response format: "simple" or "detailed"
    pub output_format: String,
    /// BCP-47 language tag, e.g. "en-US" or "de-DE"
    pub language: String,
    pub enable_timestamps: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            output_format: "simple".to_string(),
            language: "en-US".to_string(),
            enable_timestamps: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Sample format requested from the input device: "int16" or "float32"
    pub format: String,
    pub channels: u16,
    pub rate: u32,
    /// Frames per buffer
    pub chunk: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: "int16".to_string(),
            channels: 1,
            rate: 16000,
            chunk: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_openai_api_base(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
        }
    }
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 7583,
        }
    }
}

impl Config {
    /// Load configuration from a file (extension inferred by the config
    /// crate), apply environment overrides, and create the configured
    /// directories.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .context("Failed to parse config")?;

        cfg.apply_env_overrides();
        cfg.create_directories()?;
        Ok(cfg)
    }

    /// Load the config file when one exists at `path` (with or without an
    /// extension); fall back to defaults when it does not. A file that is
    /// present but unparseable is an error, not a fallback.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let candidate = std::path::Path::new(path);
        let exists = candidate.exists()
            || ["toml", "yaml", "json", "ini"]
                .iter()
                .any(|ext| candidate.with_extension(ext).exists());

        if exists {
            Self::load(path)
        } else {
            Self::from_env()
        }
    }

    /// Defaults only (no file), still honoring env overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Config::default();
        cfg.apply_env_overrides();
        cfg.create_directories()?;
        Ok(cfg)
    }

    /// Environment variables win over file values. Each recognized key maps
    /// to the variable of matching name (section and key, uppercased).
    fn apply_env_overrides(&mut self) {
        fn over(var: &str, slot: &mut String) {
            if let Ok(v) = std::env::var(var) {
                *slot = v;
            }
        }

        over("PATHS_LOGS", &mut self.paths.logs);
        over("PATHS_MEETINGS", &mut self.paths.meetings);
        over("PATHS_SCREENSHOTS", &mut self.paths.screenshots);

        over("AZURE_SPEECH_KEY", &mut self.azure.speech_key);
        over("AZURE_SPEECH_REGION", &mut self.azure.speech_region);

        over(
            "TRANSCRIPTION_OUTPUT_FORMAT",
            &mut self.transcription.output_format,
        );
        over("TRANSCRIPTION_LANGUAGE", &mut self.transcription.language);
        if let Some(v) = parse_env("TRANSCRIPTION_ENABLE_TIMESTAMPS") {
            self.transcription.enable_timestamps = v;
        }

        if let Some(v) = parse_env("AUDIO_ENABLED") {
            self.audio.enabled = v;
        }
        over("AUDIO_FORMAT", &mut self.audio.format);
        if let Some(v) = parse_env("AUDIO_CHANNELS") {
            self.audio.channels = v;
        }
        if let Some(v) = parse_env("AUDIO_RATE") {
            self.audio.rate = v;
        }
        if let Some(v) = parse_env("AUDIO_CHUNK") {
            self.audio.chunk = v;
        }

        over("OPENAI_API_KEY", &mut self.openai.api_key);
        over("OPENAI_API_BASE", &mut self.openai.api_base);
        over("OPENAI_MODEL", &mut self.openai.model);
        if let Some(v) = parse_env("OPENAI_TEMPERATURE") {
            self.openai.temperature = v;
        }
        if let Some(v) = parse_env("OPENAI_MAX_TOKENS") {
            self.openai.max_tokens = v;
        }
    }

    fn create_directories(&self) -> Result<()> {
        for dir in [
            &self.paths.logs,
            &self.paths.meetings,
            &self.paths.screenshots,
        ] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir))?;
        }
        Ok(())
    }

    /// Azure credentials are required for transcription; an empty key or
    /// region is a configuration error when audio capture is enabled.
    pub fn validate_azure(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.azure.speech_key.is_empty() {
            missing.push("azure.speech_key");
        }
        if self.azure.speech_region.is_empty() {
            missing.push("azure.speech_region");
        }
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required Azure credentials: {}. \
                 Set them in the config file or environment variables.",
                missing.join(", ")
            );
        }
        Ok(())
    }

    pub fn has_openai_key(&self) -> bool {
        !self.openai.api_key.is_empty()
    }

    pub fn meetings_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.meetings)
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.screenshots)
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.logs)
    }
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}
