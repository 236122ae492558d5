//! Error types for the homework bot
//!
//! Display texts are sent to the chat verbatim inside failure notifications,
//! so they are written for the student reading them.

/// Errors that can occur while polling and notifying
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    #[error("API недоступно: {0}")]
    Http(String),

    #[error("Не удается разобрать ответ от API: {0}")]
    ResponseParse(String),

    #[error("API-сервис не доступен")]
    UpstreamUnavailable,

    #[error("Неполадки во время выполнения запроса к API-сервису: статус {status}")]
    RequestFailed { status: u16 },

    #[error("Тип данных {0} не соответствует ожидаемому")]
    TypeMismatch(String),

    #[error("API передало пустой словарь")]
    EmptyResponse,

    #[error("Ответ API не содержит ключ <{0}>")]
    MissingKey(String),

    #[error("Неизвестный статус домашней работы: {0}")]
    UnknownStatus(String),

    #[error("Ошибка отправки сообщения: {0}")]
    Notifier(String),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка разбора JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl BotError {
    /// Whether this error must stop the poll loop instead of being reported
    pub fn is_fatal(&self) -> bool {
        matches!(self, BotError::Http(_) | BotError::Config(_))
    }
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, BotError>;
