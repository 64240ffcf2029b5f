//! Google Cloud Speech-to-Text (`v1/speech:recognize`)
//!
//! One provider type serves both the service-account (SDK) mode and the
//! API-key (REST) mode; only the authentication differs.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use domain::{LanguageCode, TranscriptSegment, TranscriptSet, WordTiming};
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::API_KEY_HEADER;
use super::service_account::{ServiceAccountKey, TokenSource};
use crate::config::{SpeechConfig, SpeechMode};
use crate::duration::duration_value_secs;
use crate::error::SpeechError;
use crate::ports::SpeechToText;
use crate::types::{AudioData, AudioFormat};
use crate::wav::WavInfo;

/// How requests are authenticated
enum CloudAuth {
    /// `?key=` query parameter
    ApiKey(SecretString),
    /// `Authorization: Bearer` from a service account
    ServiceAccount(TokenSource),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    audio_channel_count: u16,
    language_code: &'a str,
    enable_word_time_offsets: bool,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    #[serde(default)]
    word: String,
    #[serde(default)]
    start_time: Option<serde_json::Value>,
    #[serde(default)]
    end_time: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

/// Google API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Cloud Speech provider
pub struct CloudSpeechProvider {
    client: Client,
    base_url: String,
    auth: CloudAuth,
}

impl fmt::Debug for CloudSpeechProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = match &self.auth {
            CloudAuth::ApiKey(_) => "api_key",
            CloudAuth::ServiceAccount(_) => "service_account",
        };
        f.debug_struct("CloudSpeechProvider")
            .field("base_url", &self.base_url)
            .field("auth", &auth)
            .finish_non_exhaustive()
    }
}

fn http_client(config: &SpeechConfig) -> Result<Client, SpeechError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
        .map_err(|e| SpeechError::Configuration(format!("Failed to create HTTP client: {e}")))
}

impl CloudSpeechProvider {
    /// REST mode: authenticate with `config.api_key`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if no API key is set.
    pub fn with_api_key(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let key = config
            .api_key_str()
            .ok_or_else(|| SpeechError::Configuration("GOOGLE_API_KEY is not set".to_string()))?;

        Ok(Self {
            client: http_client(config)?,
            base_url: config.speech_base_url.trim_end_matches('/').to_string(),
            auth: CloudAuth::ApiKey(SecretString::from(key.to_owned())),
        })
    }

    /// SDK mode: authenticate with the service account at `config.credentials_path`
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials file is missing or unusable.
    pub fn with_service_account(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let path = config.credentials_path.as_deref().ok_or_else(|| {
            SpeechError::Configuration("GOOGLE_APPLICATION_CREDENTIALS is not set".to_string())
        })?;
        let key = ServiceAccountKey::from_file(path)?;
        Self::with_key(config, key)
    }

    /// SDK mode from an already-parsed key
    pub fn with_key(config: &SpeechConfig, key: ServiceAccountKey) -> Result<Self, SpeechError> {
        let client = http_client(config)?;
        let tokens = TokenSource::new(key, client.clone())?;

        Ok(Self {
            client,
            base_url: config.speech_base_url.trim_end_matches('/').to_string(),
            auth: CloudAuth::ServiceAccount(tokens),
        })
    }

    /// The mode this provider was built for
    #[must_use]
    pub const fn mode(&self) -> SpeechMode {
        match self.auth {
            CloudAuth::ApiKey(_) => SpeechMode::Rest,
            CloudAuth::ServiceAccount(_) => SpeechMode::Sdk,
        }
    }

    fn recognize_url(&self) -> String {
        format!("{}/speech:recognize", self.base_url)
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SpeechError> {
        Ok(match &self.auth {
            CloudAuth::ApiKey(key) => request.header(API_KEY_HEADER, key.expose_secret()),
            CloudAuth::ServiceAccount(tokens) => request.bearer_auth(tokens.access_token().await?),
        })
    }

    /// Encoding, sample rate and channel count for `audio`
    ///
    /// WAV headers win over the caller's sample rate; anything unreadable is
    /// sent as mono at the caller's rate.
    fn audio_parameters(audio: &AudioData) -> (&'static str, u32, u16) {
        match audio.format() {
            Some(AudioFormat::Wav) => WavInfo::parse(audio.data()).map_or(
                ("LINEAR16", audio.sample_rate(), 1),
                |info| ("LINEAR16", info.sample_rate, info.channels.max(1)),
            ),
            Some(format) => (format.recognition_encoding(), audio.sample_rate(), 1),
            None => ("LINEAR16", audio.sample_rate(), 1),
        }
    }

    fn error_for(status: StatusCode, body: &str) -> SpeechError {
        let detail = serde_json::from_str::<ApiError>(body).ok().map(|e| e.error);
        let vendor_status = detail.as_ref().and_then(|d| d.status.as_deref());

        if status == StatusCode::TOO_MANY_REQUESTS || vendor_status == Some("RESOURCE_EXHAUSTED") {
            return SpeechError::QuotaExceeded;
        }
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return SpeechError::Authentication(
                detail.map_or_else(|| format!("HTTP {status}"), |d| d.message),
            );
        }
        match detail {
            Some(d) => SpeechError::TranscriptionFailed(d.message),
            None => SpeechError::TranscriptionFailed(format!("HTTP {status}: {body}")),
        }
    }

    fn to_segments(response: RecognizeResponse) -> TranscriptSet {
        let segments = response
            .results
            .into_iter()
            .filter_map(|result| result.alternatives.into_iter().next())
            .map(|alt| {
                let words: Vec<WordTiming> = alt
                    .words
                    .into_iter()
                    .map(|w| WordTiming {
                        word: w.word,
                        start_time: w.start_time.as_ref().and_then(duration_value_secs).unwrap_or(0.0),
                        end_time: w.end_time.as_ref().and_then(duration_value_secs).unwrap_or(0.0),
                    })
                    .collect();

                let segment = TranscriptSegment::new(alt.transcript, alt.confidence);
                if words.is_empty() {
                    segment
                } else {
                    segment.with_words(words)
                }
            })
            .collect();

        TranscriptSet::new(segments)
    }
}

#[async_trait]
impl SpeechToText for CloudSpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.size_bytes(), format = ?audio.format(), language = %language))]
    async fn transcribe(
        &self,
        audio: AudioData,
        language: &LanguageCode,
    ) -> Result<TranscriptSet, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::InvalidAudio("Audio data is empty".to_string()));
        }

        let (encoding, sample_rate_hertz, audio_channel_count) = Self::audio_parameters(&audio);
        debug!(encoding, sample_rate_hertz, audio_channel_count, "Recognizing with Cloud Speech");

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding,
                sample_rate_hertz,
                audio_channel_count,
                language_code: language.as_str(),
                enable_word_time_offsets: true,
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(audio.data()),
            },
        };

        let response = self
            .authorize(self.client.post(self.recognize_url()))
            .await?
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::error_for(status, &body));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| {
                SpeechError::InvalidResponse(format!(
                    "Failed to parse response: {}",
                    e.without_url()
                ))
            })?;

        let set = Self::to_segments(parsed);
        debug!(segments = set.segments().len(), "Recognition complete");
        Ok(set)
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        self.mode().as_str()
    }

    fn model_name(&self) -> Option<&str> {
        None
    }
}
