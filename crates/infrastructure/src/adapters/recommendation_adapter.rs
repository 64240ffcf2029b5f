//! Recommendation adapter - forwards transcripts to an HTTP webhook

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{RecommendationPort, RecommendationRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::RecommenderConfig;

/// Adapter posting [`RecommendationRequest`]s as JSON to a webhook
#[derive(Debug, Clone)]
pub struct HttpRecommendationAdapter {
    client: Client,
    url: String,
}

impl HttpRecommendationAdapter {
    /// Create an adapter for `config.url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &RecommenderConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecommendationPort for HttpRecommendationAdapter {
    #[instrument(skip(self, request), fields(url = %self.url, transcript_len = request.transcript.len()))]
    async fn recommend(&self, request: RecommendationRequest) -> Result<Value, ApplicationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApplicationError::ExternalService("Recommender timed out".to_string())
                } else {
                    ApplicationError::ExternalService(format!("Recommender unreachable: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Recommender returned an error");
            return Err(ApplicationError::ExternalService(format!(
                "Recommender returned {status}: {body}"
            )));
        }

        let value = response.json::<Value>().await.map_err(|e| {
            ApplicationError::ExternalService(format!("Invalid recommender response: {e}"))
        })?;
        debug!("Recommender answered");
        Ok(value)
    }
}
