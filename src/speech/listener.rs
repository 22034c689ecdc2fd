use super::azure::AzureSpeechClient;
use crate::audio::{AudioBackend, AudioFrame};
use crate::transcript::TranscriptEvent;
use anyhow::{Context, Result};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Seconds of audio accumulated before a chunk is sent for recognition.
const CHUNK_SECONDS: u64 = 8;

/// Continuous transcription: consumes audio frames, sends WAV chunks to the
/// recognizer, and emits one `TranscriptEvent` per finalized utterance.
///
/// A transport error is retried once against a fresh connection; a second
/// failure degrades the listener (transcription stops, the session stays
/// usable).
pub struct SpeechListener {
    backend: Box<dyn AudioBackend>,
    client: Option<AzureSpeechClient>,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl SpeechListener {
    pub fn new(backend: Box<dyn AudioBackend>, client: AzureSpeechClient) -> Self {
        Self {
            backend,
            client: Some(client),
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Start capture and recognition. Returns the channel on which
    /// recognized utterances arrive.
    pub async fn start(&mut self) -> Result<mpsc::Receiver<TranscriptEvent>> {
        let audio_rx = self
            .backend
            .start()
            .await
            .context("Failed to start audio capture")?;

        let client = self
            .client
            .take()
            .context("Listener already started")?;

        self.running.store(true, Ordering::SeqCst);

        let (event_tx, event_rx) = mpsc::channel(100);
        let running = Arc::clone(&self.running);

        let task = tokio::spawn(async move {
            Self::run(audio_rx, client, running, event_tx).await;
        });

        self.task = Some(task);
        info!("Speech listener started ({})", self.backend.name());

        Ok(event_rx)
    }

    async fn run(
        mut audio_rx: mpsc::Receiver<AudioFrame>,
        mut client: AzureSpeechClient,
        running: Arc<AtomicBool>,
        event_tx: mpsc::Sender<TranscriptEvent>,
    ) {
        let mut samples: Vec<i16> = Vec::new();
        let mut sample_rate = 16000u32;
        let mut channels = 1u16;

        while let Some(frame) = audio_rx.recv().await {
            if !running.load(Ordering::SeqCst) {
                break;
            }

            sample_rate = frame.sample_rate;
            channels = frame.channels;
            samples.extend_from_slice(&frame.samples);

            let chunk_len = (sample_rate as u64 * channels as u64 * CHUNK_SECONDS) as usize;
            if samples.len() < chunk_len {
                continue;
            }

            let chunk: Vec<i16> = samples.drain(..chunk_len).collect();
            let wav = match encode_wav(&chunk, sample_rate, channels) {
                Ok(wav) => wav,
                Err(e) => {
                    warn!("Failed to encode audio chunk: {}", e);
                    continue;
                }
            };

            let text = match client.recognize(wav.clone(), sample_rate).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Speech request failed, reconnecting: {}", e);
                    client.reconnect();
                    match client.recognize(wav, sample_rate).await {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(
                                "Speech service unreachable after reconnect, \
                                 transcription degraded: {}",
                                e
                            );
                            break;
                        }
                    }
                }
            };

            if let Some(text) = text {
                if event_tx.send(TranscriptEvent::now(text)).await.is_err() {
                    break;
                }
            }
        }

        info!("Speech listener task stopped");
    }

    /// Stop capture and cancel recognition. In-flight recognitions are
    /// discarded, not awaited.
    pub async fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);

        self.backend
            .stop()
            .await
            .context("Failed to stop audio capture")?;

        if let Some(task) = self.task.take() {
            task.abort();
        }

        info!("Speech listener stopped");
        Ok(())
    }
}

/// Encode raw PCM samples as an in-memory WAV file for the recognizer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;
        for &s in samples {
            writer.write_sample(s).context("Failed to write sample")?;
        }
        writer.finalize().context("Failed to finalize WAV")?;
    }

    Ok(cursor.into_inner())
}
