//! Configuration types for the homework bot
//!
//! Non-secret settings come from an optional JSON file. The three secrets
//! come from the environment (optionally seeded from a `.env` file) and take
//! precedence over anything in the file.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Review API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
            bot_token: None,
            chat_id: None,
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_interval")]
    pub retry_interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_interval_seconds: default_retry_interval(),
        }
    }
}

/// The three secrets, guaranteed present
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish_non_exhaustive()
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_interval() -> u64 {
    600
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Config {
    /// Overlay secrets from the process environment
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|key| std::env::var(key).ok());
    }

    /// Overlay secrets from an arbitrary lookup. Blank values are ignored.
    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_blank(PRACTICUM_TOKEN_ENV) {
            self.practicum.token = Some(token);
        }
        if let Some(token) = non_blank(TELEGRAM_TOKEN_ENV) {
            self.telegram.bot_token = Some(token);
        }
        if let Some(chat_id) = non_blank(TELEGRAM_CHAT_ID_ENV) {
            self.telegram.chat_id = Some(chat_id);
        }
    }

    /// Check that all three secrets are present
    pub fn check_tokens(&self) -> bool {
        let missing: Vec<&str> = [
            (PRACTICUM_TOKEN_ENV, &self.practicum.token),
            (TELEGRAM_TOKEN_ENV, &self.telegram.bot_token),
            (TELEGRAM_CHAT_ID_ENV, &self.telegram.chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| !present(value))
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            return true;
        }

        tracing::error!(
            "CRITICAL: missing required environment variables: {}",
            missing.join(", ")
        );
        false
    }

    /// Extract the secrets, failing if any is absent
    pub fn credentials(&self) -> crate::Result<Credentials> {
        if !self.check_tokens() {
            return Err(crate::BotError::Config(
                "Не найдены токены для запуска".to_string(),
            ));
        }

        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(Credentials {
            practicum_token: value(&self.practicum.token),
            telegram_token: value(&self.telegram.bot_token),
            telegram_chat_id: value(&self.telegram.chat_id),
        })
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
