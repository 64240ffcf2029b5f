//! Health check handler

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub speech_client_ready: bool,
    /// `sdk`, `rest`, `generative`, or `none` when not ready
    pub backend: String,
    pub using_gemini_api: bool,
    /// Generative model name when that backend is ready
    pub model: Option<String>,
}

/// Liveness check with transcription backend status
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.transcription.status();
    let using_gemini_api = status.ready && status.backend == "generative";

    Json(HealthResponse {
        status: "healthy".to_string(),
        speech_client_ready: status.ready,
        backend: status.backend,
        using_gemini_api,
        model: if using_gemini_api { status.model } else { None },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes_null_model() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            speech_client_ready: false,
            backend: "none".to_string(),
            using_gemini_api: false,
            model: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["model"].is_null());
    }
}
