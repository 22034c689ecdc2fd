use anyhow::Result;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Sample format requested from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Int16,
    Float32,
}

impl SampleFormat {
    /// Parse the config value ("int16" / "float32"); unknown values fall
    /// back to int16 which every device we target supports.
    pub fn from_config(s: &str) -> Self {
        match s {
            "float32" | "f32" => SampleFormat::Float32,
            _ => SampleFormat::Int16,
        }
    }
}

/// Configuration for an audio capture backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames per buffer requested from the device
    pub chunk: u32,
    pub format: SampleFormat,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // Azure STT expects 16kHz mono
            channels: 1,
            chunk: 1024,
            format: SampleFormat::Int16,
        }
    }
}

/// Audio capture backend trait
///
/// The only production implementation is the cpal microphone backend;
/// tests drive the listener through the channel directly.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
