//! Recommendation port - downstream lookup keyed by a transcript

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApplicationError;

/// Payload forwarded to the recommender
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    /// Transcribed text
    pub transcript: String,
    /// Caller-supplied user profile, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    /// Job the user is practising for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_job: Option<String>,
}

/// Port for the optional recommendation component
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecommendationPort: Send + Sync {
    /// Look up suggestions; the JSON answer is returned as-is
    async fn recommend(&self, request: RecommendationRequest) -> Result<Value, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_missing_context() {
        let request = RecommendationRequest {
            transcript: "tôi muốn làm kỹ sư".to_string(),
            user: None,
            desired_job: Some("engineer".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["desired_job"], "engineer");
        assert!(json.get("user").is_none());
    }
}
