// Chat interaction logger
//
// Fire-and-forget JSONL appends through a spawned writer task. Logging never
// blocks or fails the request path; write errors are traced and dropped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

#[derive(Debug, Serialize)]
struct ChatLogEntry {
    timestamp: DateTime<Utc>,
    session_id: String,
    query: String,
    response: String,
    is_crisis: bool,
}

/// Handle for logging chat turns. Cheap to clone; all clones feed the same
/// writer task.
#[derive(Clone)]
pub struct ChatLogger {
    tx: Option<mpsc::UnboundedSender<ChatLogEntry>>,
}

impl ChatLogger {
    /// Spawn the writer task appending to `log_path`. Must be called from
    /// within a tokio runtime.
    pub fn new(log_path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ChatLogEntry>();

        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                if let Err(e) = append_entry(&log_path, &entry).await {
                    tracing::warn!(error = %e, "Failed to write chat log entry");
                }
            }
        });

        Self { tx: Some(tx) }
    }

    /// Logger that drops everything. Used by tests and the one-shot CLI.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue one interaction for logging.
    pub fn log(&self, session_id: &str, query: &str, response: &str, is_crisis: bool) {
        let Some(tx) = &self.tx else { return };

        let entry = ChatLogEntry {
            timestamp: Utc::now(),
            session_id: session_id.to_string(),
            query: query.to_string(),
            response: response.to_string(),
            is_crisis,
        };

        if tx.send(entry).is_err() {
            tracing::warn!("Chat log writer is gone, dropping entry");
        }
    }
}

async fn append_entry(path: &Path, entry: &ChatLogEntry) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;

    Ok(())
}
