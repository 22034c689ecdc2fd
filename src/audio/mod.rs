pub mod backend;
pub mod microphone;

pub use backend::{AudioBackend, AudioBackendConfig, AudioFrame, SampleFormat};
pub use microphone::MicrophoneBackend;
