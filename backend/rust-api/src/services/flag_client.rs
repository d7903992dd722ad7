use async_trait::async_trait;
use reqwest::Client;

use crate::error::QuizError;
use crate::models::Flag;

/// Anything that can hand a quiz session its flag pool
#[async_trait]
pub trait FlagSource: Send + Sync {
    async fn list_flags(&self) -> Result<Vec<Flag>, QuizError>;
}

/// Fetches the dataset from a running server's `GET /api/flags`
#[derive(Debug, Clone)]
pub struct HttpFlagSource {
    client: Client,
    base_url: String,
}

impl HttpFlagSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn flags_url(&self) -> String {
        format!("{}/api/flags", self.base_url)
    }
}

#[async_trait]
impl FlagSource for HttpFlagSource {
    async fn list_flags(&self) -> Result<Vec<Flag>, QuizError> {
        let url = self.flags_url();
        tracing::debug!("Fetching flags from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuizError::FetchFailed(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(QuizError::FetchFailed(format!(
                "server returned {}: {}",
                status, error_text
            )));
        }

        let flags: Vec<Flag> = response
            .json()
            .await
            .map_err(|e| QuizError::FetchFailed(format!("invalid flags payload: {}", e)))?;

        tracing::info!("Fetched {} flags from {}", flags.len(), url);
        Ok(flags)
    }
}
