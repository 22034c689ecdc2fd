use crate::error::{Result, ScribeError};
use chrono::Local;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Live protocol file: every recognized utterance is written (and flushed)
/// as it arrives, so an interrupted session still leaves a usable log.
pub struct ProtocolWriter {
    output_file: PathBuf,
    handle: Option<BufWriter<File>>,
}

impl ProtocolWriter {
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            handle: None,
        }
    }

    /// Start a new protocol session, writing the header.
    pub fn start_protocol(&mut self) -> Result<()> {
        let file = File::create(&self.output_file).map_err(ScribeError::FileSystem)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "Protocol - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )
        .map_err(ScribeError::FileSystem)?;
        writeln!(writer, "{}\n", "=".repeat(50)).map_err(ScribeError::FileSystem)?;
        writer.flush().map_err(ScribeError::FileSystem)?;

        self.handle = Some(writer);
        Ok(())
    }

    /// Write one timestamped entry. A no-op before `start_protocol`.
    pub fn write_entry(&mut self, text: &str) -> Result<()> {
        if let Some(writer) = self.handle.as_mut() {
            writeln!(
                writer,
                "[{}] {}",
                Local::now().format("%H:%M:%S"),
                text
            )
            .map_err(ScribeError::FileSystem)?;
            writer.flush().map_err(ScribeError::FileSystem)?;
        }
        Ok(())
    }

    /// Write the footer and close the file.
    pub fn close_protocol(&mut self) -> Result<()> {
        if let Some(mut writer) = self.handle.take() {
            writeln!(
                writer,
                "\nProtocol ended - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            )
            .map_err(ScribeError::FileSystem)?;
            writer.flush().map_err(ScribeError::FileSystem)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_file
    }
}
