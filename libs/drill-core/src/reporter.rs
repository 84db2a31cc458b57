//! Completion reporting.
//!
//! The reporter hands a [`CompletionEvent`] to an external sink without the
//! engine ever waiting on the result. Sink failures are logged and dropped.

use crate::error::ReportError;
use crate::types::CompletionEvent;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Destination for completed-session events.
#[async_trait]
pub trait CompletionSink: Send + Sync {
    async fn record_completion(&self, event: &CompletionEvent) -> Result<(), ReportError>;
}

/// Fire-and-forget bridge between the engine and a [`CompletionSink`].
#[derive(Clone)]
pub struct SessionReporter {
    user_id: String,
    sink: Arc<dyn CompletionSink>,
}

impl std::fmt::Debug for SessionReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReporter")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl SessionReporter {
    pub fn new(user_id: impl Into<String>, sink: Arc<dyn CompletionSink>) -> Self {
        Self {
            user_id: user_id.into(),
            sink,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Spawn the sink call on the current tokio runtime and return at once.
    ///
    /// Returns None when no runtime is available; the event is then logged
    /// and dropped.
    pub fn report(&self, pair_count: usize) -> Option<JoinHandle<()>> {
        let event = CompletionEvent {
            user_id: self.user_id.clone(),
            pair_count,
            completed_at: Utc::now(),
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    user_id = %event.user_id,
                    pair_count,
                    "no async runtime, completion not recorded"
                );
                return None;
            }
        };

        let sink = Arc::clone(&self.sink);
        Some(handle.spawn(async move {
            match sink.record_completion(&event).await {
                Ok(()) => {
                    tracing::debug!(user_id = %event.user_id, pair_count, "completion recorded")
                }
                Err(e) => tracing::warn!(
                    user_id = %event.user_id,
                    pair_count,
                    error = %e,
                    "failed to record completion"
                ),
            }
        }))
    }
}
