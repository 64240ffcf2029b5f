//! BCP-47 style language tag (e.g. `vi-VN`, `en-US`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Longest tag we accept; real BCP-47 tags stay well below this
const MAX_TAG_LEN: usize = 35;

/// A validated language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Language used when a request does not name one
    pub const DEFAULT: &'static str = "vi-VN";

    /// Parse and validate a language tag
    pub fn parse(tag: &str) -> Result<Self, DomainError> {
        let tag = tag.trim();
        let valid = !tag.is_empty()
            && tag.len() <= MAX_TAG_LEN
            && !tag.starts_with('-')
            && !tag.ends_with('-')
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

        if valid {
            Ok(Self(tag.to_string()))
        } else {
            Err(DomainError::InvalidLanguageCode(tag.to_string()))
        }
    }

    /// The tag as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, lower-cased (`vi-VN` -> `vi`)
    #[must_use]
    pub fn primary_subtag(&self) -> String {
        self.0
            .split('-')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Human-readable language name used in transcription prompts
    ///
    /// Unknown tags fall back to English.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self.0.as_str() {
            "vi-VN" => "tiếng Việt",
            "zh-CN" => "Chinese",
            "ja-JP" => "Japanese",
            "ko-KR" => "Korean",
            "fr-FR" => "French",
            "de-DE" => "German",
            "es-ES" => "Spanish",
            _ => "English",
        }
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
