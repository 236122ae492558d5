//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Credentials, TelegramConfig};
use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Sends messages to one chat through the `sendMessage` method
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        credentials: &Credentials,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let send_url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            credentials.telegram_token
        );

        tracing::debug!(
            "Created TelegramNotifier for chat {}",
            credentials.telegram_chat_id
        );

        Self {
            send_url,
            chat_id: credentials.telegram_chat_id.clone(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> crate::Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self.http.post_form(&self.send_url, &params).await?;

        if response.status != 200 {
            return Err(crate::BotError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::info!("Message sent to Telegram");
        Ok(())
    }
}
