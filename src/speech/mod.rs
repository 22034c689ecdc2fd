//! Speech-to-text listener
//!
//! Wraps microphone capture and the cloud recognizer: audio frames are
//! batched into short WAV chunks and sent to Azure, each recognized
//! utterance comes back out as a timestamped `TranscriptEvent`.

mod azure;
mod listener;

pub use azure::AzureSpeechClient;
pub use listener::SpeechListener;
