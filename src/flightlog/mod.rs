//! # Flight Log
//!
//! Persists every relayed payload and connection lifecycle event to
//! append-only files named by UTC calendar date (`<dir>/<YYYY-MM-DD>.log`).
//! Each line is `<RFC 3339 timestamp> - <payload>`.
//!
//! Appending is fire-and-forget: entries travel over a channel to a router
//! task that owns one writer task per date, so a slow or failing disk never
//! blocks the telemetry pipeline. Entries for the same date are written in
//! submission order. The log directory is only created once there is
//! something to write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// One log line awaiting its writer
#[derive(Debug)]
struct LogEntry {
    timestamp: DateTime<Utc>,
    payload: String,
}

impl LogEntry {
    fn format_line(&self) -> String {
        format!(
            "{} - {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.payload
        )
    }
}

/// Cloneable handle for appending to the flight log
///
/// Dropping every handle closes the log; awaiting the task handle returned
/// by [`FlightLog::spawn`] then guarantees all accepted entries are flushed.
#[derive(Debug, Clone)]
pub struct FlightLog {
    entries: UnboundedSender<LogEntry>,
}

impl FlightLog {
    /// Start the log router writing under `dir`
    pub fn spawn(dir: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
        let (entries, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_router(dir.into(), receiver));
        (Self { entries }, task)
    }

    /// Append an already-serialized message payload
    pub fn append_message(&self, payload: String) {
        self.send(LogEntry {
            timestamp: Utc::now(),
            payload,
        });
    }

    /// Append a lifecycle event description, JSON-quoted like any payload
    pub fn append_event(&self, description: &str) {
        let payload = match serde_json::to_string(description) {
            Ok(payload) => payload,
            Err(error) => {
                debug!("Failed to serialize log event: {}", error);
                return;
            }
        };

        self.send(LogEntry {
            timestamp: Utc::now(),
            payload,
        });
    }

    fn send(&self, entry: LogEntry) {
        if self.entries.send(entry).is_err() {
            debug!("Flight log closed, entry dropped");
        }
    }
}

/// Route entries to one writer task per calendar date
async fn run_router(dir: PathBuf, mut entries: UnboundedReceiver<LogEntry>) {
    let mut writers: HashMap<NaiveDate, UnboundedSender<LogEntry>> = HashMap::new();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    while let Some(entry) = entries.recv().await {
        let date = entry.timestamp.date_naive();
        let writer = writers.entry(date).or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            tasks.push(tokio::spawn(write_day(dir.clone(), date, rx)));
            tx
        });

        // Writer tasks only exit once their sender is dropped below
        let _ = writer.send(entry);
    }

    // Every handle is gone; let the per-day writers drain before completing
    drop(writers);
    for task in tasks {
        let _ = task.await;
    }
}

/// Append entries for a single date, in arrival order
async fn write_day(dir: PathBuf, date: NaiveDate, mut entries: UnboundedReceiver<LogEntry>) {
    let path = dir.join(format!("{date}.log"));
    let mut file: Option<File> = None;
    let mut failure_reported = false;

    while let Some(entry) = entries.recv().await {
        let line = entry.format_line();

        if let Err(error) = append_line(&dir, &path, &mut file, line.as_bytes()).await {
            // Reopen on the next entry instead of writing through a dead handle
            file = None;

            if failure_reported {
                debug!("Flight log {} still failing: {}", path.display(), error);
            } else {
                error!("Failed to append to flight log {}: {}", path.display(), error);
                failure_reported = true;
            }
        }
    }
}

async fn append_line(
    dir: &Path,
    path: &Path,
    file: &mut Option<File>,
    line: &[u8],
) -> std::io::Result<()> {
    if file.is_none() {
        fs::create_dir_all(dir).await?;
        let opened = OpenOptions::new().append(true).create(true).open(path).await?;
        *file = Some(opened);
    }

    if let Some(file) = file {
        file.write_all(line).await?;
        file.flush().await?;
    }

    Ok(())
}
