//! Engine: polls the review API and relays status changes to the notifier

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::notifier::Notifier;
use crate::review::{describe_submission, validate_response, ReviewSource};

/// Lower bound (Unix seconds) for the next status query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(timestamp: i64) -> Self {
        Self(timestamp)
    }

    /// Cursor positioned at the current wall-clock time
    pub fn now() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(i64::try_from(seconds).unwrap_or(i64::MAX))
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }

    /// Move to the server-supplied `current_date`, if the response carries one
    pub fn advance(&mut self, response: &serde_json::Value) {
        if let Some(current_date) = response.get("current_date").and_then(|v| v.as_i64()) {
            self.0 = current_date;
        }
    }
}

/// Remembers the last error text that was actually delivered
#[derive(Debug, Default)]
pub struct ErrorDeduplicator {
    last_sent: Option<String>,
}

impl ErrorDeduplicator {
    /// Whether `message` differs from the last delivered error
    pub fn should_send(&self, message: &str) -> bool {
        self.last_sent.as_deref() != Some(message)
    }

    pub fn record_sent(&mut self, message: String) {
        self.last_sent = Some(message);
    }

    pub fn clear(&mut self) {
        self.last_sent = None;
    }
}

/// Result of one poll iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A status change was delivered
    Notified(String),
    /// The response carried no homeworks
    NoUpdates,
    /// The iteration failed; `sent` is false when the text repeated the last delivered error
    ErrorReported { message: String, sent: bool },
}

/// The engine owns the cursor and drives the poll loop
pub struct Engine {
    source: Arc<dyn ReviewSource>,
    notifier: Arc<dyn Notifier>,
    cursor: PollCursor,
    errors: ErrorDeduplicator,
    interval: Duration,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        notifier: Arc<dyn Notifier>,
        cursor: PollCursor,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            notifier,
            cursor,
            errors: ErrorDeduplicator::default(),
            interval,
            cancel,
        }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    /// Run one fetch/validate/notify iteration.
    ///
    /// Recoverable failures are reported to the chat and returned as
    /// [`PollOutcome::ErrorReported`]. Fatal failures, and failures to deliver
    /// the error report itself, are returned as `Err`.
    pub async fn poll_once(&mut self) -> crate::Result<PollOutcome> {
        let error = match self.check_updates().await {
            Ok(outcome) => {
                if matches!(outcome, PollOutcome::Notified(_)) {
                    self.errors.clear();
                }
                return Ok(outcome);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => e,
        };

        let message = format!("Сбой в работе программы: {}", error);
        tracing::error!("{} ({:?})", message, error);

        if !self.errors.should_send(&message) {
            tracing::debug!("Same error already reported, not sending again");
            return Ok(PollOutcome::ErrorReported {
                message,
                sent: false,
            });
        }

        self.notifier.notify(&message).await?;
        self.errors.record_sent(message.clone());
        Ok(PollOutcome::ErrorReported {
            message,
            sent: true,
        })
    }

    async fn check_updates(&mut self) -> crate::Result<PollOutcome> {
        let response = self.source.fetch_status(self.cursor.timestamp()).await?;
        let homeworks = validate_response(&response)?;

        let outcome = match homeworks.first() {
            Some(latest) => {
                let message = describe_submission(latest)?;
                self.notifier.notify(&message).await?;
                PollOutcome::Notified(message)
            }
            None => {
                tracing::debug!("No homework status updates");
                PollOutcome::NoUpdates
            }
        };

        self.cursor.advance(&response);
        Ok(outcome)
    }

    /// Poll until cancelled or a fatal error occurs, sleeping between iterations
    pub async fn run(&mut self) -> crate::Result<()> {
        let cancel = self.cancel.clone();
        loop {
            let outcome = tokio::select! {
                biased;
                outcome = self.poll_once() => outcome?,
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled during request");
                    return Ok(());
                }
            };
            tracing::debug!(
                "Poll finished: {:?}, cursor={}",
                outcome,
                self.cursor.timestamp()
            );

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    return Ok(());
                }
            }
        }
    }
}
