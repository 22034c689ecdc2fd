use thiserror::Error;

/// Application error taxonomy.
///
/// Variants map to how each failure is handled:
/// - `InvalidState` is fatal to the triggering command only
/// - `Transport` is retried once, then the listener degrades
/// - `ExternalService` is recovered by omitting the AI section
/// - `FileSystem` is surfaced to the user
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Session lifecycle misuse (start while recording, end while idle, ...).
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// Network/listener failure talking to the speech service.
    #[error("transport error: {0}")]
    Transport(String),

    /// LLM / external completion API failure.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Filesystem failure writing session artifacts.
    #[error("filesystem error: {0}")]
    FileSystem(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScribeError>;

impl ScribeError {
    /// Wrap a non-io failure that is still, to the user, a failure to
    /// produce a file artifact.
    pub fn filesystem(msg: impl Into<String>) -> Self {
        ScribeError::FileSystem(std::io::Error::new(
            std::io::ErrorKind::Other,
            msg.into(),
        ))
    }
}
