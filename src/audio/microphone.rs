use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame, SampleFormat};
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Microphone capture via cpal.
///
/// The cpal stream is not `Send`, so it lives on a dedicated thread that
/// forwards frames into a tokio channel and parks until `stop()`.
pub struct MicrophoneBackend {
    config: AudioBackendConfig,
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl MicrophoneBackend {
    pub fn new(config: AudioBackendConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    fn run_capture(
        config: AudioBackendConfig,
        running: Arc<AtomicBool>,
        tx: mpsc::Sender<AudioFrame>,
        ready_tx: std::sync::mpsc::Sender<Result<()>>,
    ) {
        let host = cpal::default_host();
        let device = match host.default_input_device() {
            Some(d) => d,
            None => {
                let _ = ready_tx.send(Err(anyhow!("No input device available")));
                return;
            }
        };

        info!(
            "Opening input device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(config.chunk),
        };

        let started = Instant::now();
        let sample_rate = config.sample_rate;
        let channels = config.channels;

        let err_fn = |err| error!("Audio stream error: {}", err);

        let stream = match config.format {
            SampleFormat::Int16 => {
                let tx = tx.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let frame = AudioFrame {
                            samples: data.to_vec(),
                            sample_rate,
                            channels,
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        // Drop frames when the consumer is behind rather
                        // than blocking the audio callback. A closed
                        // channel means the listener degraded; stay quiet.
                        if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(frame) {
                            warn!("Audio channel full, dropping frame");
                        }
                    },
                    err_fn,
                    None,
                )
            }
            SampleFormat::Float32 => {
                let tx = tx.clone();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let samples: Vec<i16> = data
                            .iter()
                            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                            .collect();
                        let frame = AudioFrame {
                            samples,
                            sample_rate,
                            channels,
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(frame) {
                            warn!("Audio channel full, dropping frame");
                        }
                    },
                    err_fn,
                    None,
                )
            }
        };

        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                let _ = ready_tx.send(Err(anyhow!("Failed to build input stream: {}", e)));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready_tx.send(Err(anyhow!("Failed to start input stream: {}", e)));
            return;
        }

        let _ = ready_tx.send(Ok(()));

        while running.load(Ordering::SeqCst) {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        drop(stream);
        info!("Microphone capture thread stopped");
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.running.load(Ordering::SeqCst) {
            anyhow::bail!("Microphone capture already running");
        }

        let (tx, rx) = mpsc::channel(100);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        self.running.store(true, Ordering::SeqCst);
        let config = self.config.clone();
        let running = Arc::clone(&self.running);

        let thread = std::thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || Self::run_capture(config, running, tx, ready_tx))
            .context("Failed to spawn capture thread")?;

        self.thread = Some(thread);

        // Fail start() if the device could not be opened.
        match tokio::task::spawn_blocking(move || ready_rx.recv()).await {
            Ok(Ok(Ok(()))) => {
                info!("Microphone capture started");
                Ok(rx)
            }
            Ok(Ok(Err(e))) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
            _ => {
                self.running.store(false, Ordering::SeqCst);
                Err(anyhow!("Capture thread exited before signalling readiness"))
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);

        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || {
                if thread.join().is_err() {
                    error!("Microphone capture thread panicked");
                }
            })
            .await
            .context("Failed to join capture thread")?;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}
