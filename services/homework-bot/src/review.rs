//! Review API types: response validation and status translation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::BotError;

/// Review status of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Human-readable verdict for the status
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }
}

/// One homework entry from the review API. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub homework_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Source of raw review-status responses
#[async_trait]
pub trait ReviewSource: Send + Sync + fmt::Debug {
    /// Fetch every status change since `from_date` (Unix seconds)
    async fn fetch_status(&self, from_date: i64) -> crate::Result<Value>;
}

/// Check the response shape and return the `homeworks` list.
///
/// Checks run in order: mapping type, non-empty, `homeworks` key present,
/// `homeworks` is a list. The list itself may be empty.
pub fn validate_response(response: &Value) -> crate::Result<&[Value]> {
    let Some(map) = response.as_object() else {
        tracing::error!("API response is not a mapping: {}", response);
        return Err(BotError::TypeMismatch("ответа API".to_string()));
    };

    if map.is_empty() {
        tracing::error!("API returned an empty mapping");
        return Err(BotError::EmptyResponse);
    }

    let Some(homeworks) = map.get("homeworks") else {
        tracing::error!("API response has no 'homeworks' key");
        return Err(BotError::MissingKey("homeworks".to_string()));
    };

    let Some(list) = homeworks.as_array() else {
        tracing::error!("'homeworks' is not a list: {}", homeworks);
        return Err(BotError::TypeMismatch("<homeworks>".to_string()));
    };

    Ok(list.as_slice())
}

/// Build the notification text for a submission.
///
/// Name and status presence is checked before the status lookup.
pub fn describe_submission(submission: &Value) -> crate::Result<String> {
    if !submission.is_object() {
        tracing::error!("Homework entry is not a mapping: {}", submission);
        return Err(BotError::TypeMismatch("домашней работы".to_string()));
    }
    let submission = Submission::deserialize(submission).map_err(|e| {
        tracing::error!("Homework entry has malformed fields: {}", e);
        BotError::TypeMismatch("домашней работы".to_string())
    })?;

    let Some(name) = submission.homework_name else {
        tracing::error!("Homework entry has no name");
        return Err(BotError::MissingKey("homework_name".to_string()));
    };
    let Some(status) = submission.status else {
        tracing::error!("Homework '{}' has no status", name);
        return Err(BotError::MissingKey("status".to_string()));
    };

    let status = status.parse::<HomeworkStatus>().inspect_err(|_| {
        tracing::error!("Homework '{}' has unknown status '{}'", name, status);
    })?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
