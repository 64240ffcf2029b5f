//! RIFF/WAVE header inspection
//!
//! Only the header is read; the sample data is never decoded.

use std::io::Cursor;

use hound::WavReader;

/// Format fields from a WAV `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavInfo {
    /// Read the header of an in-memory WAV file
    ///
    /// Returns `None` when the bytes are not a RIFF/WAVE file or the header
    /// is truncated.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let spec = WavReader::new(Cursor::new(bytes)).ok()?.spec();
        Some(Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
        })
    }
}

/// 16-bit PCM WAV file holding `samples`
#[cfg(test)]
pub(crate) fn pcm_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    use hound::{SampleFormat, WavSpec, WavWriter};

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer
}
