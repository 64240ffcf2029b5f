//! Generative-model transcription (`models/{model}:generateContent`)
//!
//! Audio is sent inline with a transcription prompt. Calls are wrapped in a
//! bounded retry loop that sorts failures by the text of the vendor error.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use domain::{LanguageCode, TranscriptSegment, TranscriptSet};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::API_KEY_HEADER;
use crate::config::{RetryConfig, SpeechConfig};
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::AudioData;

/// Placeholder confidence; the model does not report one
pub const GENERATIVE_CONFIDENCE: f32 = 0.90;

/// How a failed attempt is treated by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Usage limits reached; stop immediately
    Quota,
    /// Vendor complained about the audio; retry without waiting
    Format,
    /// Anything else; retry after the configured delay
    Other,
}

/// Classify a vendor error message
///
/// Quota markers take precedence over format markers.
#[must_use]
pub fn classify_failure(message: &str) -> FailureClass {
    if message.contains("429") || message.contains("RESOURCE_EXHAUSTED") {
        return FailureClass::Quota;
    }
    let lower = message.to_lowercase();
    if lower.contains("audio") || lower.contains("format") {
        FailureClass::Format
    } else {
        FailureClass::Other
    }
}

/// Prompt sent alongside the audio
#[must_use]
pub fn transcription_prompt(language: &LanguageCode) -> String {
    format!(
        "Please transcribe this audio to text in {}. Only return the transcribed text, no additional commentary.",
        language.display_name()
    )
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: String },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Generative-model transcriber
pub struct GeminiTranscriber {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    temperature: f32,
    max_output_tokens: u32,
    retry: RetryConfig,
}

impl fmt::Debug for GeminiTranscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiTranscriber")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl GeminiTranscriber {
    /// Create a transcriber from the generative settings in `config`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the API key is missing or the
    /// configuration is invalid.
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;

        let api_key = config
            .api_key_str()
            .ok_or_else(|| SpeechError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.generative_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: SecretString::from(api_key.to_owned()),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            retry: config.retry.clone(),
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// One inline-audio request; returns the trimmed response text
    async fn generate(&self, audio: &AudioData, language: &LanguageCode) -> Result<String, SpeechError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: transcription_prompt(language),
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: audio.mime_type(),
                            data: STANDARD.encode(audio.data()),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::TranscriptionFailed(format!("{status}: {body}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| {
                SpeechError::InvalidResponse(format!(
                    "Failed to parse response: {}",
                    e.without_url()
                ))
            })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text.trim().to_string())
    }
}

/// The vendor's own words, without our error-kind prefix
fn vendor_message(err: &SpeechError) -> String {
    match err {
        SpeechError::TranscriptionFailed(m)
        | SpeechError::RequestFailed(m)
        | SpeechError::ConnectionFailed(m)
        | SpeechError::InvalidResponse(m) => m.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SpeechToText for GeminiTranscriber {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), mime = audio.mime_type(), language = %language, model = %self.model))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &LanguageCode,
    ) -> Result<TranscriptSet, SpeechError> {
        let max_attempts = self.retry.max_attempts;

        for attempt in 1..=max_attempts {
            if attempt > self.retry.inline_attempts {
                warn!(attempt, "Inline attempts used up, returning fallback");
                return Err(SpeechError::TemporarilyUnavailable);
            }

            debug!(attempt, "Sending inline audio");
            match self.generate(&audio, language).await {
                Ok(text) if !text.is_empty() => {
                    info!(attempt, chars = text.chars().count(), "Transcription complete");
                    let segment =
                        TranscriptSegment::new(text, GENERATIVE_CONFIDENCE).with_model(&self.model);
                    return Ok(TranscriptSet::single(segment));
                },
                Ok(_) => {
                    warn!(attempt, "Empty transcription");
                    if attempt == max_attempts {
                        return Err(SpeechError::EmptyTranscript);
                    }
                },
                Err(err) => {
                    let message = vendor_message(&err);
                    match classify_failure(&message) {
                        FailureClass::Quota => {
                            warn!(attempt, "Quota exceeded");
                            return Err(SpeechError::QuotaExceeded);
                        },
                        FailureClass::Format => {
                            warn!(attempt, error = %message, "Audio format rejected");
                            if attempt == max_attempts {
                                return Err(SpeechError::UnsupportedFormat);
                            }
                        },
                        FailureClass::Other => {
                            warn!(attempt, error = %message, "Transcription attempt failed");
                            if attempt == max_attempts {
                                return Err(SpeechError::RetriesExhausted {
                                    attempts: max_attempts,
                                    message,
                                });
                            }
                            tokio::time::sleep(Duration::from_millis(self.retry.retry_delay_ms))
                                .await;
                        },
                    }
                },
            }
        }

        Err(SpeechError::EmptyTranscript)
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "generative"
    }

    fn model_name(&self) -> Option<&str> {
        Some(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_markers_win() {
        assert_eq!(classify_failure("429 Too Many Requests"), FailureClass::Quota);
        assert_eq!(
            classify_failure("RESOURCE_EXHAUSTED: audio quota"),
            FailureClass::Quota
        );
    }

    #[test]
    fn format_markers_are_case_insensitive() {
        assert_eq!(
            classify_failure("400: Unsupported AUDIO payload"),
            FailureClass::Format
        );
        assert_eq!(classify_failure("bad Format"), FailureClass::Format);
    }

    #[test]
    fn other_errors() {
        assert_eq!(
            classify_failure("500 Internal Server Error"),
            FailureClass::Other
        );
        assert_eq!(classify_failure(""), FailureClass::Other);
    }

    #[test]
    fn quota_status_in_lowercase_is_not_quota() {
        // only the exact vendor marker counts
        assert_eq!(classify_failure("resource_exhausted"), FailureClass::Other);
    }

    #[test]
    fn prompt_names_language() {
        let prompt = transcription_prompt(&LanguageCode::default());
        assert_eq!(
            prompt,
            "Please transcribe this audio to text in tiếng Việt. Only return the transcribed text, no additional commentary."
        );
        let prompt = transcription_prompt(&LanguageCode::parse("en-GB").unwrap());
        assert!(prompt.contains("in English."));
    }

    #[test]
    fn vendor_message_strips_prefix() {
        let err = SpeechError::TranscriptionFailed("500: boom".to_string());
        assert_eq!(vendor_message(&err), "500: boom");
        assert_eq!(
            vendor_message(&SpeechError::RateLimited),
            "Rate limit exceeded"
        );
    }

    #[test]
    fn new_requires_api_key() {
        let result = GeminiTranscriber::new(&SpeechConfig::default());
        assert!(matches!(result, Err(SpeechError::Configuration(_))));
    }

    #[test]
    fn request_serializes_inline_audio() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "hi".to_string(),
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "audio/webm",
                            data: "AAEC".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                max_output_tokens: 500,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "audio/webm"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
    }
}
