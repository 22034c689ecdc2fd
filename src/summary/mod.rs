//! Summary compilation
//!
//! Turns a finished meeting note into the Markdown artifact, optionally
//! asking the completion API for a key-points/action-items section first.

mod markdown;
mod openai;

pub use markdown::{format_duration, MarkdownRenderer};
pub use openai::OpenAiService;
