//! Homework bot - review status poller
//!
//! Polls the Yandex Practicum homework-status API, detects status changes for
//! the latest submission, and relays them to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod review;
pub mod telegram;

pub use config::{load_config, Config, Credentials};
pub use error::{BotError, Result};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::engine::{Engine, PollCursor};
use crate::io::ReqwestHttpClient;
use crate::practicum::PracticumClient;
use crate::telegram::TelegramNotifier;

/// Run the poll loop with the given configuration.
///
/// Fails before any network call if a secret is missing. Otherwise returns
/// only on ctrl-c or a fatal error.
pub async fn run(config: &Config) -> Result<()> {
    let credentials = config.credentials()?;

    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let source = Arc::new(PracticumClient::new(
        &config.practicum,
        &credentials.practicum_token,
        Arc::clone(&http),
    ));
    let notifier = Arc::new(TelegramNotifier::new(
        &config.telegram,
        &credentials,
        Arc::clone(&http),
    ));

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
        }
    });

    let interval = Duration::from_secs(config.polling.retry_interval_seconds);
    let mut engine = Engine::new(source, notifier, PollCursor::now(), interval, cancel);

    tracing::info!(
        "Homework bot started, polling every {}s",
        interval.as_secs()
    );
    let result = engine.run().await;
    if let Err(e) = &result {
        tracing::error!("Homework bot stopped: {}", e);
    } else {
        tracing::info!("Homework bot stopped");
    }
    result
}
