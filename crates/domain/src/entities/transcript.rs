//! Transcript value types shared by every transcription backend

use serde::{Deserialize, Serialize};

/// Timing of one recognized word, in seconds from the start of the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// One unit of recognized speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Recognized text
    pub transcript: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Per-word timing, when the backend provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTiming>>,
    /// Model that produced the segment, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl TranscriptSegment {
    /// Create a segment without word timing
    pub fn new(transcript: impl Into<String>, confidence: f32) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
            words: None,
            model_used: None,
        }
    }

    /// Attach word timing
    #[must_use]
    pub fn with_words(mut self, words: Vec<WordTiming>) -> Self {
        self.words = Some(words);
        self
    }

    /// Record the model that produced the segment
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_used = Some(model.into());
        self
    }
}

/// Ordered transcript segments for one audio clip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSet {
    segments: Vec<TranscriptSegment>,
}

impl TranscriptSet {
    /// Wrap a list of segments
    #[must_use]
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// A set holding exactly one segment
    #[must_use]
    pub fn single(segment: TranscriptSegment) -> Self {
        Self {
            segments: vec![segment],
        }
    }

    #[must_use]
    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<TranscriptSegment> {
        self.segments
    }

    /// Segment texts joined by a single space
    #[must_use]
    pub fn full_transcript(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.transcript.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when no segment carries any non-whitespace text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.transcript.trim().is_empty())
    }

    /// Mean segment confidence, `None` for an empty set
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_confidence(&self) -> Option<f32> {
        if self.segments.is_empty() {
            return None;
        }
        let total: f32 = self.segments.iter().map(|s| s.confidence).sum();
        Some(total / self.segments.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_transcript_joins_with_space() {
        let set = TranscriptSet::new(vec![
            TranscriptSegment::new("xin chào", 0.9),
            TranscriptSegment::new("các bạn", 0.8),
        ]);
        assert_eq!(set.full_transcript(), "xin chào các bạn");
    }

    #[test]
    fn empty_set_has_no_average() {
        assert!(TranscriptSet::default().average_confidence().is_none());
        assert!(TranscriptSet::default().is_empty());
    }

    #[test]
    fn whitespace_segments_count_as_empty() {
        let set = TranscriptSet::single(TranscriptSegment::new("  \n", 0.5));
        assert!(set.is_empty());
    }

    #[test]
    fn average_confidence_is_mean() {
        let set = TranscriptSet::new(vec![
            TranscriptSegment::new("a", 0.5),
            TranscriptSegment::new("b", 1.0),
        ]);
        let avg = set.average_confidence().unwrap();
        assert!((avg - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn segment_serialization_omits_absent_fields() {
        let segment = TranscriptSegment::new("hello", 0.9);
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["transcript"], "hello");
        assert!(json.get("words").is_none());
        assert!(json.get("model_used").is_none());
    }

    #[test]
    fn segment_serialization_includes_words_and_model() {
        let segment = TranscriptSegment::new("hi there", 0.9)
            .with_words(vec![WordTiming {
                word: "hi".to_string(),
                start_time: 0.0,
                end_time: 0.4,
            }])
            .with_model("gemini-1.5-flash");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["words"][0]["word"], "hi");
        assert_eq!(json["model_used"], "gemini-1.5-flash");
    }
}
