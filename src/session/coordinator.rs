use super::state::{Session, SessionState};
use super::stats::SessionStats;
use crate::audio::{AudioBackendConfig, MicrophoneBackend, SampleFormat};
use crate::config::Config;
use crate::error::{Result, ScribeError};
use crate::note::MeetingNote;
use crate::protocol::ProtocolWriter;
use crate::screenshot::{self, Screenshot};
use crate::speech::{AzureSpeechClient, SpeechListener};
use crate::store::MeetingStore;
use crate::summary::{MarkdownRenderer, OpenAiService};
use crate::transcript::TranscriptEvent;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Artifacts produced when a session ends.
#[derive(Debug)]
pub struct EndReport {
    pub markdown_path: PathBuf,
    pub note_path: Option<PathBuf>,
    pub stats: SessionStats,
}

/// Owns the session state machine and the background transcription task.
///
/// At most one session is active at a time; all appends are gated on the
/// recording state. The coordinator is shared behind an `Arc` by the HTTP
/// handlers, so every field guards its own mutation.
pub struct SessionCoordinator {
    config: Config,
    session: Mutex<Option<Session>>,
    store: Arc<Mutex<MeetingStore>>,
    protocol: Arc<Mutex<Option<ProtocolWriter>>>,
    listener: Mutex<Option<SpeechListener>>,
    consumer_task: Mutex<Option<JoinHandle<()>>>,
    openai: Option<OpenAiService>,
}

impl SessionCoordinator {
    pub fn new(config: Config) -> Self {
        let store = MeetingStore::new(config.meetings_dir(), None);
        let openai = OpenAiService::from_config(&config.openai);

        if openai.is_none() {
            info!("No OpenAI key configured, AI summaries disabled");
        }

        Self {
            config,
            session: Mutex::new(None),
            store: Arc::new(Mutex::new(store)),
            protocol: Arc::new(Mutex::new(None)),
            listener: Mutex::new(None),
            consumer_task: Mutex::new(None),
            openai,
        }
    }

    /// Start a new session: idle → recording. Fails with `InvalidState`
    /// while another session is active. A listener failure (no microphone,
    /// unreachable speech service) degrades the session instead of failing
    /// the start.
    pub async fn start(
        &self,
        title: Option<String>,
        participants: Vec<String>,
        tags: Vec<String>,
    ) -> Result<SessionStats> {
        let mut session_slot = self.session.lock().await;

        if let Some(existing) = session_slot.as_ref() {
            if existing.state != SessionState::Ended {
                return Err(ScribeError::InvalidState(format!(
                    "session {} is already {:?}",
                    existing.id, existing.state
                )));
            }
        }

        let mut session = Session::new(title.unwrap_or_else(|| "Untitled Meeting".to_string()));
        session.begin()?;

        info!("Starting session {} ({})", session.id, session.title);

        let protocol_path = {
            let mut store = self.store.lock().await;
            let note = store.create_meeting(session.title.clone(), participants, tags);
            self.config
                .meetings_dir()
                .join(format!("{}_protocol.txt", note.file_stem()))
        };

        std::fs::create_dir_all(self.config.meetings_dir())?;
        let mut writer = ProtocolWriter::new(protocol_path);
        writer.start_protocol()?;
        *self.protocol.lock().await = Some(writer);

        self.spawn_listener().await;

        *session_slot = Some(session);
        drop(session_slot);

        self.status().await
    }

    /// Spawn the speech listener and its consumer task, if transcription is
    /// possible with the current configuration.
    async fn spawn_listener(&self) {
        if !self.config.audio.enabled {
            info!("Audio capture disabled, session records without transcription");
            return;
        }
        if self.config.validate_azure().is_err() {
            warn!("Azure credentials missing, session records without transcription");
            return;
        }

        let backend = MicrophoneBackend::new(AudioBackendConfig {
            sample_rate: self.config.audio.rate,
            channels: self.config.audio.channels,
            chunk: self.config.audio.chunk,
            format: SampleFormat::from_config(&self.config.audio.format),
        });
        let client = AzureSpeechClient::new(&self.config.azure, &self.config.transcription);
        let mut listener = SpeechListener::new(Box::new(backend), client);

        let mut event_rx = match listener.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Failed to start speech listener, continuing degraded: {}", e);
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let protocol = Arc::clone(&self.protocol);

        let consumer = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                {
                    let mut protocol = protocol.lock().await;
                    if let Some(writer) = protocol.as_mut() {
                        if let Err(e) = writer.write_entry(&event.text) {
                            warn!("Failed to write protocol entry: {}", e);
                        }
                    }
                }
                store.lock().await.add_utterance(event);
            }
            info!("Transcript consumer stopped");
        });

        *self.listener.lock().await = Some(listener);
        *self.consumer_task.lock().await = Some(consumer);
    }

    /// Append a transcript event from outside the listener (manual notes).
    /// Rejected outside the recording state.
    pub async fn append_utterance(&self, text: impl Into<String>) -> Result<()> {
        {
            let session = self.session.lock().await;
            match session.as_ref() {
                Some(s) => s.ensure_recording()?,
                None => {
                    return Err(ScribeError::InvalidState(
                        "no active session".to_string(),
                    ))
                }
            }
        }

        let event = TranscriptEvent::now(text);

        {
            let mut protocol = self.protocol.lock().await;
            if let Some(writer) = protocol.as_mut() {
                writer.write_entry(&event.text)?;
            }
        }

        self.store.lock().await.add_utterance(event);
        Ok(())
    }

    /// Capture a screenshot and append it to the registry. Rejected outside
    /// the recording state; the registry is untouched on rejection.
    pub async fn screenshot(&self) -> Result<Screenshot> {
        // Hold the session lock across the capture so it cannot interleave
        // with end().
        let session = self.session.lock().await;
        match session.as_ref() {
            Some(s) => s.ensure_recording()?,
            None => {
                return Err(ScribeError::InvalidState(
                    "no active session".to_string(),
                ))
            }
        }

        let shot = screenshot::capture_screen(&self.config.screenshots_dir()).await?;
        self.store.lock().await.add_screenshot(shot.clone());

        Ok(shot)
    }

    /// End the session: recording → ended. Tears down the listener
    /// (in-flight recognitions discarded), compiles the summary, and writes
    /// the Markdown artifact.
    pub async fn end(&self) -> Result<EndReport> {
        let mut session_slot = self.session.lock().await;

        let session = session_slot
            .as_mut()
            .ok_or_else(|| ScribeError::InvalidState("no active session".to_string()))?;
        let end_time = session.finish()?;

        info!("Ending session {}", session.id);

        if let Some(mut listener) = self.listener.lock().await.take() {
            if let Err(e) = listener.stop().await {
                warn!("Error stopping speech listener: {}", e);
            }
        }
        if let Some(task) = self.consumer_task.lock().await.take() {
            task.abort();
        }

        let mut note = {
            let mut store = self.store.lock().await;
            store
                .end_current_meeting(Some(end_time))
                .ok_or_else(|| ScribeError::filesystem("no meeting note for active session"))?
        };

        if let Some(openai) = &self.openai {
            match openai.generate_summary(&note).await {
                Ok(summary) => note.summary = summary,
                Err(e) => {
                    warn!("Summary generation failed, writing without AI section: {}", e)
                }
            }
        }

        if let Some(mut writer) = self.protocol.lock().await.take() {
            if let Err(e) = writer.close_protocol() {
                warn!("Failed to close protocol file: {}", e);
            }
        }

        let markdown_path = MarkdownRenderer::save_markdown(&note, &self.config.meetings_dir())
            .map_err(|e| ScribeError::filesystem(e.to_string()))?;

        // Re-save the JSON note so it carries the generated summary.
        let note_path = match note.save(&self.config.meetings_dir()) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Failed to re-save meeting note: {}", e);
                None
            }
        };

        info!("Session artifact written: {}", markdown_path.display());

        let stats = Self::stats_for(session_slot.as_ref(), Some(&note));
        Ok(EndReport {
            markdown_path,
            note_path,
            stats,
        })
    }

    /// Saved meetings, most recent first.
    pub async fn list_meetings(&self) -> Result<Vec<MeetingNote>> {
        self.store
            .lock()
            .await
            .list_meetings()
            .map_err(|e| ScribeError::filesystem(e.to_string()))
    }

    /// Search saved meetings by title, participant, tag, or transcript text.
    pub async fn search_meetings(&self, query: &str) -> Result<Vec<MeetingNote>> {
        self.store
            .lock()
            .await
            .search_meetings(query)
            .map_err(|e| ScribeError::filesystem(e.to_string()))
    }

    /// Snapshot of the current session.
    pub async fn status(&self) -> Result<SessionStats> {
        let session = self.session.lock().await;
        let store = self.store.lock().await;
        Ok(Self::stats_for(session.as_ref(), store.current()))
    }

    fn stats_for(session: Option<&Session>, note: Option<&MeetingNote>) -> SessionStats {
        let Some(session) = session else {
            return SessionStats::idle();
        };

        let duration_secs = match (session.start_time, session.end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
            (Some(start), None) => {
                (Local::now() - start).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        };

        SessionStats {
            state: session.state,
            session_id: Some(session.id.clone()),
            title: Some(session.title.clone()),
            started_at: session.start_time,
            duration_secs,
            transcript_events: note.map(|n| n.transcript.len()).unwrap_or(0),
            screenshots_taken: note.map(|n| n.screenshots.len()).unwrap_or(0),
        }
    }
}
