use crate::error::{Result, ScribeError};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One captured screenshot. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    /// Wall-clock time of capture
    pub timestamp: DateTime<Local>,

    /// Path of the saved image file
    pub file_path: PathBuf,
}

/// Append-only ordered sequence of screenshots taken during a session.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenshotRegistry {
    shots: Vec<Screenshot>,
}

impl ScreenshotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, shot: Screenshot) {
        self.shots.push(shot);
    }

    pub fn shots(&self) -> &[Screenshot] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }
}

/// Capture the screen to a timestamped PNG under `dir` using the platform
/// screenshot tool. The capture itself is an OS call; we only pick the tool
/// and the destination path.
pub async fn capture_screen(dir: &Path) -> Result<Screenshot> {
    let timestamp = Local::now();
    let file_path = dir.join(format!(
        "screenshot-{}.png",
        timestamp.format("%Y%m%d_%H%M%S")
    ));

    let status = screenshot_command(&file_path)
        .status()
        .await
        .map_err(ScribeError::FileSystem)?;

    if !status.success() {
        warn!("Screenshot tool exited with {}", status);
        return Err(ScribeError::FileSystem(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("screenshot tool failed: {}", status),
        )));
    }

    info!("Screenshot saved: {}", file_path.display());

    Ok(Screenshot {
        timestamp,
        file_path,
    })
}

#[cfg(target_os = "macos")]
fn screenshot_command(path: &Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("screencapture");
    cmd.arg("-x").arg(path);
    cmd
}

#[cfg(not(target_os = "macos"))]
fn screenshot_command(path: &Path) -> tokio::process::Command {
    // gnome-screenshot and scrot cover most Linux desktops; fall back to
    // ImageMagick's import for X11 setups without either.
    for (tool, args) in [
        ("gnome-screenshot", vec!["-f"]),
        ("scrot", vec![]),
        ("import", vec!["-window", "root"]),
    ] {
        if which(tool) {
            let mut cmd = tokio::process::Command::new(tool);
            for a in args {
                cmd.arg(a);
            }
            cmd.arg(path);
            return cmd;
        }
    }

    // Let the spawn fail with a NotFound error the caller surfaces.
    let mut cmd = tokio::process::Command::new("gnome-screenshot");
    cmd.arg("-f").arg(path);
    cmd
}

#[cfg(not(target_os = "macos"))]
fn which(tool: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| dir.join(tool).is_file())
        })
        .unwrap_or(false)
}
