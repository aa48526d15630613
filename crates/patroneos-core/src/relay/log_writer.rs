use crate::types::RelayEvent;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

/// Timestamp prefix of every log line, e.g. `2018/05/02 17:04:05`.
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Formats one event as a log line, newline included.
#[must_use]
pub fn format_line<Tz>(event: &RelayEvent, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} {} {} {}\n",
        at.format(TIMESTAMP_FORMAT),
        event.host,
        event.success,
        event.message
    )
}

/// Append-only event log watched by fail2ban.
///
/// Each event is written as one complete line with a single write under the lock, so
/// concurrent relay requests never interleave within a line. No ordering across lines.
#[derive(Debug)]
pub struct RelayLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl RelayLog {
    /// Opens (creating if needed) the log file for appending.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened; the relay cannot run without it.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        Ok(Self { file: Mutex::new(file), path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one event.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the write or flush.
    pub async fn append(&self, event: &RelayEvent) -> std::io::Result<()> {
        let line = format_line(event, &Local::now());
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
