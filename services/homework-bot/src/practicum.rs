//! Yandex Practicum homework-status client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;
use crate::review::ReviewSource;
use crate::BotError;

/// Client for the homework-status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }
}

#[async_trait]
impl ReviewSource for PracticumClient {
    async fn fetch_status(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        let headers = [("Authorization", self.authorization.as_str())];
        let query = [("from_date", from_date.as_str())];

        let response = self
            .http
            .get(&self.endpoint, &headers, &query)
            .await
            .inspect_err(|e| tracing::error!("Review API is unreachable: {}", e))?;

        match response.status {
            200 => serde_json::from_str(&response.body).map_err(|e| {
                tracing::error!("Failed to parse review API response: {}", e);
                BotError::ResponseParse(e.to_string())
            }),
            500 => {
                tracing::error!("Review API returned 500: {}", response.body);
                Err(BotError::UpstreamUnavailable)
            }
            status => {
                tracing::error!(
                    "Review API request failed with status {}: {}",
                    status,
                    response.body
                );
                Err(BotError::RequestFailed { status })
            }
        }
    }
}
