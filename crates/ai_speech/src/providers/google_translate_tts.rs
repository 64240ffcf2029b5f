//! Google Translate text-to-speech
//!
//! Speaks text through the public `translate_tts` endpoint. Long text is cut
//! into short chunks, one request each, and the MP3 responses are joined.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use crate::config::TtsConfig;
use crate::error::SpeechError;
use crate::ports::TextToSpeech;
use crate::types::{AudioData, AudioFormat};

fn is_boundary(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | '!' | '?' | ';' | ':' | '…' | '。' | '，' | '！' | '？' | '\n'
    )
}

/// Split at punctuation that is followed by whitespace or the end of text
fn clauses(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if is_boundary(c) && chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            let end = i + c.len_utf8();
            out.push(&text[start..end]);
            start = end;
        }
    }
    out.push(&text[start..]);
    out
}

/// Pack the words of `clause` into chunks of at most `max_chars` characters
fn pack_words(clause: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in clause.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max_chars) {
            let piece_len = piece.len();
            let needed = current_len + usize::from(current_len > 0) + piece_len;
            if current_len > 0 && needed > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += piece_len;
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }
}

/// Cut text into speakable chunks of at most `max_chars` characters
///
/// Chunks end at punctuation where possible, otherwise at spaces; words longer
/// than the limit are split. Chunks with nothing to pronounce are dropped.
#[must_use]
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    for clause in clauses(text) {
        pack_words(clause, max_chars, &mut chunks);
    }
    chunks.retain(|chunk| chunk.chars().any(char::is_alphanumeric));
    chunks
}

/// Google Translate TTS client
#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    client: Client,
    config: TtsConfig,
}

impl GoogleTranslateTts {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: TtsConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                SpeechError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Default voice language
    #[must_use]
    pub fn language(&self) -> &str {
        &self.config.language
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<bytes::Bytes, SpeechError> {
        let speed = if self.config.slow { "0.3" } else { "1" };
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(self.config.endpoint())
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SpeechError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::SynthesisFailed(format!("HTTP {status}: {body}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {e}")))
    }
}

#[async_trait]
impl TextToSpeech for GoogleTranslateTts {
    #[instrument(skip(self, text), fields(text_len = text.len(), language = %language))]
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioData, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text cannot be empty".to_string(),
            ));
        }

        let chunks = split_text(text, self.config.chunk_max_chars);
        if chunks.is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Text has nothing to speak".to_string(),
            ));
        }

        let total = chunks.len();
        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, language, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }

        debug!(chunks = total, audio_size = audio.len(), "Speech synthesis complete");
        Ok(AudioData::with_format(audio.to_vec(), AudioFormat::Mp3))
    }
}
