//! JSON-lines completion sink.

use async_trait::async_trait;
use drill_core::{CompletionEvent, CompletionSink, ReportError};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use std::io::ErrorKind;
use tokio::io::AsyncWriteExt;

/// Appends one JSON object per completed session to a file.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every recorded completion, in file order.
    ///
    /// A missing file means nothing was recorded yet. Lines that do not parse
    /// are logged and skipped.
    pub async fn read_all(&self) -> Result<Vec<CompletionEvent>, ReportError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut events = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    error = %e,
                    "skipping unreadable completion"
                ),
            }
        }
        Ok(events)
    }
}

#[async_trait]
impl CompletionSink for JsonlSink {
    async fn record_completion(&self, event: &CompletionEvent) -> Result<(), ReportError> {
        let mut line =
            serde_json::to_string(event).map_err(|e| ReportError::Serialize(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
