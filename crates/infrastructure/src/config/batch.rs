//! Audio batch generation settings.

use std::{path::PathBuf, time::Duration};

use application::AudioBatchConfig;
use serde::{Deserialize, Serialize};

/// Where the corpus and generated audio live, and how files are named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAppConfig {
    /// Dialogue corpus JSON file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Directory the generated MP3 files are written to
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// URL prefix under which `audio_dir` is served
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// File name prefix
    #[serde(default = "default_key")]
    pub file_prefix: String,

    /// Key written into `audioPaths`
    #[serde(default = "default_key")]
    pub audio_key: String,

    /// Language sent to text-to-speech
    #[serde(default = "default_language")]
    pub language: String,

    /// Pause after each synthesized line, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("public/dialogues.json")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("public/audios/vietnamese")
}

fn default_public_prefix() -> String {
    "/audios/vietnamese".to_string()
}

fn default_key() -> String {
    "vietnamese".to_string()
}

fn default_language() -> String {
    "vi".to_string()
}

const fn default_delay_ms() -> u64 {
    1000
}

impl Default for BatchAppConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            audio_dir: default_audio_dir(),
            public_prefix: default_public_prefix(),
            file_prefix: default_key(),
            audio_key: default_key(),
            language: default_language(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl BatchAppConfig {
    /// Naming and pacing for the batch service
    pub fn to_batch_config(&self) -> AudioBatchConfig {
        AudioBatchConfig {
            file_prefix: self.file_prefix.clone(),
            audio_key: self.audio_key.clone(),
            public_prefix: self.public_prefix.clone(),
            language: self.language.clone(),
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}
