//! BDD test world for the homework bot

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cucumber::World;
use homework_bot::engine::{Engine, PollOutcome};
use homework_bot::notifier::Notifier;
use homework_bot::review::ReviewSource;
use homework_bot::{BotError, Config};
use serde_json::Value;

/// Review source replaying responses queued by the scenario
#[derive(Debug, Default)]
pub struct QueuedSource {
    pub responses: Mutex<VecDeque<homework_bot::Result<Value>>>,
    pub requested: Mutex<Vec<i64>>,
}

#[async_trait::async_trait]
impl ReviewSource for QueuedSource {
    async fn fetch_status(&self, from_date: i64) -> homework_bot::Result<Value> {
        self.requested.lock().unwrap().push(from_date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BotError::Http("no response queued".to_string())))
    }
}

/// Notifier recording every delivered message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> homework_bot::Result<()> {
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, World)]
pub struct HomeworkBotWorld {
    // Validation testing
    pub response: Option<Value>,
    pub validation_result: Option<homework_bot::Result<usize>>,

    // Poll loop testing
    pub source: Option<Arc<QueuedSource>>,
    pub notifier: Option<Arc<RecordingNotifier>>,
    pub engine: Option<EngineHandle>,
    pub outcomes: Vec<homework_bot::Result<PollOutcome>>,

    // Startup testing
    pub config: Option<Config>,
    pub startup_result: Option<homework_bot::Result<()>>,
}

/// Wrapper so the world can derive Debug
pub struct EngineHandle(pub Engine);

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("cursor", &self.0.cursor())
            .finish()
    }
}
