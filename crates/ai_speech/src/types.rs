//! Types for speech processing
//!
//! Contains the audio container used by every backend and the container
//! detection the cloud backends need to pick an encoding.

use serde::{Deserialize, Serialize};

/// Audio containers we can recognize from their leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE
    Wav,
    /// WebM (browser recordings, Opus inside)
    Webm,
    /// Ogg (Opus inside)
    Ogg,
    /// FLAC
    Flac,
    /// MP3, with or without an ID3 tag
    Mp3,
}

impl AudioFormat {
    /// Get the MIME type for this audio format
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Get the file extension for this audio format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
        }
    }

    /// Cloud Speech `RecognitionConfig.encoding` value
    #[must_use]
    pub const fn recognition_encoding(&self) -> &'static str {
        match self {
            Self::Wav => "LINEAR16",
            Self::Webm => "WEBM_OPUS",
            Self::Ogg => "OGG_OPUS",
            Self::Flac => "FLAC",
            Self::Mp3 => "MP3",
        }
    }

    /// Detect the container from magic bytes
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Some(Self::Webm),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            // MPEG audio frame sync
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Some(Self::Mp3),
            _ => None,
        }
    }

    /// Guess the container from a file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "ogg" | "opus" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            _ => None,
        }
    }
}

/// Raw audio plus what we know about it
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Raw audio bytes
    data: Vec<u8>,
    /// Detected container, if any
    format: Option<AudioFormat>,
    /// Sample rate supplied by the caller
    sample_rate: u32,
}

impl AudioData {
    /// Sample rate assumed when the caller does not supply one
    pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

    /// Wrap bytes, detecting the container from the content
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let format = AudioFormat::sniff(&data);
        Self {
            data,
            format,
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
        }
    }

    /// Wrap bytes with a known container
    #[must_use]
    pub const fn with_format(data: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            data,
            format: Some(format),
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
        }
    }

    /// Override the caller-supplied sample rate
    #[must_use]
    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Get the raw audio bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio bytes
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Detected or declared container
    #[must_use]
    pub const fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    /// Caller-supplied sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the size of the audio data in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if the audio data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MIME type for inline uploads; unknown containers are sent as WebM
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.format.map_or("audio/webm", |f| f.mime_type())
    }
}
