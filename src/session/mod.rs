//! Session lifecycle
//!
//! The coordinator is the one piece with multi-step logic: it drives the
//! idle → recording → ended state machine, owns the background speech
//! listener task, gates transcript/screenshot appends on the recording
//! state, and triggers summary compilation on end.

mod coordinator;
mod state;
mod stats;

pub use coordinator::{EndReport, SessionCoordinator};
pub use state::{Session, SessionState};
pub use stats::SessionStats;
