//! Transcription handlers
//!
//! Both endpoints answer 200 with `{"success": false, "error": ...}` when
//! transcription itself fails; only bad input (400) and unexpected faults
//! (500) use error statuses.

use application::{
    ApplicationError, RecommendationContext, TranscriptionOutcome, TranscriptionRequest,
};
use axum::{
    Json,
    extract::{Multipart, State, rejection::JsonRejection},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use domain::{LanguageCode, TranscriptSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{error::ApiError, state::AppState};

/// Method the client should switch to when the vendor quota is spent
pub const FALLBACK_METHOD: &str = "browser_speech_api";

/// Transcription result body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptionResponse {
    Success(TranscriptionSuccess),
    Failure(TranscriptionFailure),
}

/// Successful transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSuccess {
    pub success: bool,
    pub results: Vec<TranscriptSegment>,
    pub full_transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions_error: Option<String>,
}

/// Failed transcription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionFailure {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_suggestion: Option<FallbackSuggestion>,
}

/// Hint that the client can use in-browser recognition instead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackSuggestion {
    pub method: String,
    pub message: String,
    pub instructions: String,
}

impl FallbackSuggestion {
    fn browser_speech_api() -> Self {
        Self {
            method: FALLBACK_METHOD.to_string(),
            message: "Gemini API quota exceeded. You can use browser's built-in Speech \
                      Recognition as a fallback."
                .to_string(),
            instructions: "The React app can automatically switch to Web Speech API for speech \
                           recognition."
                .to_string(),
        }
    }
}

impl TranscriptionResponse {
    fn from_outcome(outcome: TranscriptionOutcome) -> Self {
        let full_transcript = outcome.transcripts.full_transcript();
        Self::Success(TranscriptionSuccess {
            success: true,
            results: outcome.transcripts.into_segments(),
            full_transcript,
            suggestions: outcome.suggestions,
            suggestions_error: outcome.suggestions_error,
        })
    }

    fn failure(error: &ApplicationError, with_fallback: bool) -> Self {
        Self::Failure(TranscriptionFailure {
            success: false,
            error: error.to_string(),
            fallback_suggestion: (with_fallback && error.is_quota())
                .then(FallbackSuggestion::browser_speech_api),
        })
    }
}

/// JSON body of `/transcribe-blob`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscribeBlobRequest {
    /// Base64 audio, optionally as a data URL
    #[serde(rename = "audioData")]
    pub audio_data: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "sampleRate")]
    pub sample_rate: Option<u32>,
    pub user: Option<Value>,
    pub desired_job: Option<String>,
}

/// Decode base64 audio, accepting a `data:...;base64,` prefix
pub fn decode_audio_payload(payload: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = payload
        .split_once(',')
        .map_or(payload, |(_, data)| data)
        .trim();
    STANDARD
        .decode(encoded)
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 audio data: {e}")))
}

fn parse_language(language: Option<&str>) -> Result<LanguageCode, ApiError> {
    match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(tag) => LanguageCode::parse(tag).map_err(|e| ApiError::BadRequest(e.to_string())),
        None => Ok(LanguageCode::default()),
    }
}

fn parse_sample_rate(value: &str) -> Result<u32, ApiError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|rate| *rate > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid sample_rate: {value}")))
}

/// Transcription failures become a 200 body; anything else is an API error
fn render_failure(
    err: ApplicationError,
    with_fallback: bool,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    if err.is_transcription_failure() {
        warn!(error = %err, "Transcription failed");
        Ok(Json(TranscriptionResponse::failure(&err, with_fallback)))
    } else {
        Err(err.into())
    }
}

/// `POST /transcribe` - multipart upload
#[instrument(skip(state, multipart))]
pub async fn transcribe_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let mut audio: Option<(String, Vec<u8>)> = None;
    let mut language = None;
    let mut sample_rate = TranscriptionRequest::DEFAULT_SAMPLE_RATE;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                // Only file parts count as uploads
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid audio upload: {e}")))?;
                audio = Some((file_name, bytes.to_vec()));
            },
            Some("language") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid language field: {e}")))?;
                language = Some(text);
            },
            Some("sample_rate") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid sample_rate field: {e}")))?;
                sample_rate = parse_sample_rate(&text)?;
            },
            _ => {},
        }
    }

    let (file_name, data) =
        audio.ok_or_else(|| ApiError::BadRequest("No audio file provided".to_string()))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No audio file selected".to_string()));
    }

    let language = parse_language(language.as_deref())?;
    debug!(file = %file_name, size = data.len(), %language, sample_rate, "Audio upload received");

    let request = TranscriptionRequest::new(data)
        .with_language(language)
        .with_sample_rate(sample_rate);

    match state.transcription.transcribe(request).await {
        Ok(transcripts) => Ok(Json(TranscriptionResponse::from_outcome(
            TranscriptionOutcome {
                transcripts,
                suggestions: None,
                suggestions_error: None,
            },
        ))),
        Err(e) => render_failure(e, false),
    }
}

/// `POST /transcribe-blob` - base64 JSON payload
#[instrument(skip(state, payload))]
pub async fn transcribe_blob(
    State(state): State<AppState>,
    payload: Result<Json<TranscribeBlobRequest>, JsonRejection>,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;

    let encoded = body
        .audio_data
        .as_deref()
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("No audio data provided".to_string()))?;
    let data = decode_audio_payload(encoded)?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("No audio data provided".to_string()));
    }

    let language = parse_language(body.language.as_deref())?;
    let sample_rate = match body.sample_rate {
        Some(0) => return Err(ApiError::BadRequest("Invalid sampleRate: 0".to_string())),
        Some(rate) => rate,
        None => TranscriptionRequest::DEFAULT_SAMPLE_RATE,
    };
    debug!(size = data.len(), %language, sample_rate, "Audio blob received");

    let request = TranscriptionRequest::new(data)
        .with_language(language)
        .with_sample_rate(sample_rate);
    let context = RecommendationContext {
        user: body.user,
        desired_job: body.desired_job,
    };

    match state
        .transcription
        .transcribe_with_context(request, context)
        .await
    {
        Ok(outcome) => Ok(Json(TranscriptionResponse::from_outcome(outcome))),
        Err(e) => render_failure(e, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_and_bare_base64_decode_identically() {
        let bare = decode_audio_payload("AQID").unwrap();
        let url = decode_audio_payload("data:audio/webm;codecs=opus;base64,AQID").unwrap();
        assert_eq!(bare, vec![1, 2, 3]);
        assert_eq!(bare, url);
    }

    #[test]
    fn invalid_base64_is_bad_request() {
        assert!(matches!(
            decode_audio_payload("not base64!!"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn sample_rate_must_be_positive_integer() {
        assert_eq!(parse_sample_rate(" 48000 ").unwrap(), 48000);
        assert!(parse_sample_rate("0").is_err());
        assert!(parse_sample_rate("fast").is_err());
    }

    #[test]
    fn language_defaults_to_vietnamese() {
        assert_eq!(parse_language(None).unwrap().as_str(), "vi-VN");
        assert_eq!(parse_language(Some("")).unwrap().as_str(), "vi-VN");
        assert_eq!(parse_language(Some("en-US")).unwrap().as_str(), "en-US");
    }

    #[test]
    fn fallback_only_for_quota_errors() {
        let quota = ApplicationError::QuotaExceeded("quota".to_string());
        let TranscriptionResponse::Failure(failure) = TranscriptionResponse::failure(&quota, true)
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.fallback_suggestion.unwrap().method, FALLBACK_METHOD);

        let other = ApplicationError::Transcription("boom".to_string());
        let TranscriptionResponse::Failure(failure) = TranscriptionResponse::failure(&other, true)
        else {
            panic!("expected failure");
        };
        assert!(failure.fallback_suggestion.is_none());
    }

    #[test]
    fn upload_failures_never_carry_fallback() {
        let quota = ApplicationError::QuotaExceeded("quota".to_string());
        let json = serde_json::to_value(TranscriptionResponse::failure(&quota, false)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "quota");
        assert!(json.get("fallback_suggestion").is_none());
    }
}
