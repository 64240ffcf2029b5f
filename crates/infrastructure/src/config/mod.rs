//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `batch`: corpus and audio directory settings
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `config.toml`, then `PARLEY_` environment variables
//! (`PARLEY_SERVER__PORT=8080`). A `.env` file is read before anything else.

mod batch;
mod server;

use std::fmt;
use std::path::PathBuf;

use ai_speech::{SpeechConfig, SpeechMode};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub use batch::BatchAppConfig;
pub use server::ServerConfig;

/// Value of `GOOGLE_APPLICATION_CREDENTIALS` that asks for API-key auth
pub const USE_API_KEY_SENTINEL: &str = "USE_API_KEY";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: {s}. Use 'text' or 'json'")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directives used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

/// Downstream recommendation webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderConfig {
    /// Webhook URL receiving the transcript and user context
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_recommender_timeout")]
    pub timeout_ms: u64,
}

const fn default_recommender_timeout() -> u64 {
    30000
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Speech-to-text and text-to-speech configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Audio batch generation
    #[serde(default)]
    pub batch: BatchAppConfig,

    /// Recommendation webhook (optional)
    #[serde(default)]
    pub recommender: Option<RecommenderConfig>,
}

impl AppConfig {
    /// Load configuration from `.env`, `config.toml` and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv_outcome(dotenvy::dotenv())?;

        Self::load_from(
            config::File::with_name("config").required(false),
            |key| std::env::var(key).ok(),
        )
    }

    /// Load from an explicit file source, resolving well-known variables via `lookup`
    pub fn load_from<S, F>(file: S, lookup: F) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
        F: Fn(&str) -> Option<String>,
    {
        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .add_source(file)
            // Override with environment variables (e.g., PARLEY_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix("PARLEY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let explicit_mode = config.get_string("speech.mode").is_ok();
        let mut app: Self = config.try_deserialize()?;
        app.speech = apply_speech_env(app.speech, explicit_mode, lookup);
        Ok(app)
    }

    /// Validate settings that would stop the server from starting
    ///
    /// Speech settings are not checked here: a bad speech setup leaves the
    /// transcription client not ready instead of failing startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }
        if self.server.max_body_size_bytes == 0 {
            return Err("server.max_body_size_bytes must be greater than 0".to_string());
        }
        if let Some(recommender) = &self.recommender {
            if !recommender.url.starts_with("http://") && !recommender.url.starts_with("https://")
            {
                return Err(format!(
                    "recommender.url must be an http(s) URL, got '{}'",
                    recommender.url
                ));
            }
        }
        Ok(())
    }
}

/// Fill speech settings from `GEMINI_API_KEY`, `GOOGLE_API_KEY` and
/// `GOOGLE_APPLICATION_CREDENTIALS`
///
/// Unless the mode was configured explicitly it is picked in this order:
/// generative when a Gemini key exists, REST when the credentials variable
/// holds the `USE_API_KEY` sentinel, SDK when it holds a path, REST when only
/// a Google API key exists. Values already present in `speech` win.
pub fn apply_speech_env<F>(mut speech: SpeechConfig, explicit_mode: bool, lookup: F) -> SpeechConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let gemini_key = non_blank("GEMINI_API_KEY");
    let google_key = non_blank("GOOGLE_API_KEY");
    let credentials = non_blank("GOOGLE_APPLICATION_CREDENTIALS");
    let wants_api_key = credentials.as_deref() == Some(USE_API_KEY_SENTINEL);

    if !explicit_mode {
        if gemini_key.is_some() {
            speech.mode = SpeechMode::Generative;
        } else if wants_api_key {
            speech.mode = SpeechMode::Rest;
        } else if credentials.is_some() {
            speech.mode = SpeechMode::Sdk;
        } else if google_key.is_some() {
            speech.mode = SpeechMode::Rest;
        }
    }

    if speech.api_key_str().is_none() {
        let key = match speech.mode {
            SpeechMode::Generative => gemini_key,
            SpeechMode::Rest => google_key,
            SpeechMode::Sdk => None,
        };
        if let Some(key) = key {
            speech.api_key = Some(SecretString::from(key));
        }
    }

    if speech.mode == SpeechMode::Sdk && speech.credentials_path.is_none() && !wants_api_key {
        speech.credentials_path = credentials.map(PathBuf::from);
    }

    speech
}

/// Accept a loaded or absent `.env` file; reject one that cannot be parsed
fn dotenv_outcome(result: Result<PathBuf, dotenvy::Error>) -> Result<(), config::ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(config::ConfigError::Message(format!("Invalid .env file: {e}"))),
    }
}
