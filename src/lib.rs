pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod note;
pub mod protocol;
pub mod screenshot;
pub mod session;
pub mod speech;
pub mod store;
pub mod summary;
pub mod transcript;

pub use config::Config;
pub use error::{Result, ScribeError};
pub use http::{create_router, AppState};
pub use note::MeetingNote;
pub use protocol::ProtocolWriter;
pub use screenshot::{Screenshot, ScreenshotRegistry};
pub use session::{EndReport, Session, SessionCoordinator, SessionState, SessionStats};
pub use store::MeetingStore;
pub use summary::{format_duration, MarkdownRenderer, OpenAiService};
pub use transcript::{TranscriptEvent, TranscriptLog};
