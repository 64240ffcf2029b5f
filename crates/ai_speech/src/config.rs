//! Configuration for speech processing

use std::fmt;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Transcription backend, chosen once when the client is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMode {
    /// Google Cloud Speech with a service-account credential file
    Sdk,
    /// Google Cloud Speech authenticated by API key
    Rest,
    /// Multimodal generative model with inline audio
    #[default]
    Generative,
}

impl SpeechMode {
    /// Short name used in health output and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::Rest => "rest",
            Self::Generative => "generative",
        }
    }
}

impl fmt::Display for SpeechMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempt budget for the generative backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, including the short-circuit attempt
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Attempts that actually send the audio
    #[serde(default = "default_inline_attempts")]
    pub inline_attempts: u32,

    /// Pause before retrying a generic failure
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_inline_attempts() -> u32 {
    2
}

const fn default_retry_delay_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            inline_attempts: default_inline_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Google Translate text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Language of the synthesized voice
    #[serde(default = "default_tts_language")]
    pub language: String,

    /// Top-level domain of the Translate host (`com`, `com.vn`, ...)
    #[serde(default = "default_tld")]
    pub tld: String,

    /// Slow speaking rate
    #[serde(default)]
    pub slow: bool,

    /// Full endpoint override, mostly for tests
    #[serde(default)]
    pub base_url: Option<String>,

    /// Longest text chunk sent in one request
    #[serde(default = "default_chunk_max_chars")]
    pub chunk_max_chars: usize,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_tts_language() -> String {
    "vi".to_string()
}

fn default_tld() -> String {
    "com".to_string()
}

const fn default_chunk_max_chars() -> usize {
    100
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language: default_tts_language(),
            tld: default_tld(),
            slow: false,
            base_url: None,
            chunk_max_chars: default_chunk_max_chars(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TtsConfig {
    /// Endpoint that serves `translate_tts`
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            format!("https://translate.google.{}/translate_tts", self.tld)
        })
    }
}

/// Configuration for speech processing services
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Transcription backend
    #[serde(default)]
    pub mode: SpeechMode,

    /// Service-account JSON file for SDK mode
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// API key for REST or generative mode (sensitive)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Generative model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Cloud Speech API base URL
    #[serde(default = "default_speech_base_url")]
    pub speech_base_url: String,

    /// Generative language API base URL
    #[serde(default = "default_generative_base_url")]
    pub generative_base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sampling temperature for the generative model
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output token cap for the generative model
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Retry policy for the generative model
    #[serde(default)]
    pub retry: RetryConfig,

    /// Text-to-speech settings
    #[serde(default)]
    pub tts: TtsConfig,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_speech_base_url() -> String {
    "https://speech.googleapis.com/v1".to_string()
}

fn default_generative_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000 // 30 seconds
}

const fn default_temperature() -> f32 {
    0.1
}

const fn default_max_output_tokens() -> u32 {
    500
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            mode: SpeechMode::default(),
            credentials_path: None,
            api_key: None,
            model: default_model(),
            speech_base_url: default_speech_base_url(),
            generative_base_url: default_generative_base_url(),
            timeout_ms: default_timeout_ms(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            retry: RetryConfig::default(),
            tts: TtsConfig::default(),
        }
    }
}

impl fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("mode", &self.mode)
            .field("credentials_path", &self.credentials_path)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("model", &self.model)
            .field("speech_base_url", &self.speech_base_url)
            .field("generative_base_url", &self.generative_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("retry", &self.retry)
            .field("tts", &self.tts)
            .finish_non_exhaustive()
    }
}

impl SpeechConfig {
    /// Create a minimal config for testing
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_key: Some(SecretString::from("test-key")),
            ..Default::default()
        }
    }

    /// The API key, if one is configured and non-empty
    #[must_use]
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        match self.mode {
            SpeechMode::Sdk if self.credentials_path.is_none() => {
                return Err("Credentials file is required for SDK mode".to_string());
            },
            SpeechMode::Rest if self.api_key_str().is_none() => {
                return Err("GOOGLE_API_KEY is required for REST mode".to_string());
            },
            SpeechMode::Generative if self.api_key_str().is_none() => {
                return Err("GEMINI_API_KEY is required for generative mode".to_string());
            },
            _ => {},
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.retry.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }

        if self.retry.inline_attempts == 0 || self.retry.inline_attempts > self.retry.max_attempts
        {
            return Err(format!(
                "inline_attempts must be between 1 and max_attempts ({}), got {}",
                self.retry.max_attempts, self.retry.inline_attempts
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }

        if self.tts.chunk_max_chars == 0 {
            return Err("TTS chunk size must be greater than 0".to_string());
        }

        Ok(())
    }
}
