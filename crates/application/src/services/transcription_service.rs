//! Transcription service - transcribe a clip and optionally fetch suggestions

use std::{fmt, sync::Arc};

use domain::TranscriptSet;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{RecommendationPort, RecommendationRequest, TranscriptionPort, TranscriptionRequest},
};

/// Readiness of the transcription backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriberStatus {
    pub ready: bool,
    pub backend: String,
    pub model: Option<String>,
}

/// Caller details that make a recommendation lookup worthwhile
#[derive(Debug, Clone, Default)]
pub struct RecommendationContext {
    pub user: Option<Value>,
    pub desired_job: Option<String>,
}

impl RecommendationContext {
    /// True when neither a user nor a desired job was supplied
    pub const fn is_empty(&self) -> bool {
        self.user.is_none() && self.desired_job.is_none()
    }
}

/// Transcript plus the outcome of the optional recommendation lookup
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub transcripts: TranscriptSet,
    /// Recommender answer, when it was called and succeeded
    pub suggestions: Option<Value>,
    /// Recommender failure, when it was called and failed
    pub suggestions_error: Option<String>,
}

/// Service for transcription requests
pub struct TranscriptionService {
    transcriber: Arc<dyn TranscriptionPort>,
    recommender: Option<Arc<dyn RecommendationPort>>,
}

impl fmt::Debug for TranscriptionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionService")
            .field("backend", &self.transcriber.backend())
            .field("has_recommender", &self.recommender.is_some())
            .finish()
    }
}

impl TranscriptionService {
    /// Create a service without a recommender
    pub fn new(transcriber: Arc<dyn TranscriptionPort>) -> Self {
        Self {
            transcriber,
            recommender: None,
        }
    }

    /// Attach a recommender
    #[must_use]
    pub fn with_recommender(mut self, recommender: Arc<dyn RecommendationPort>) -> Self {
        self.recommender = Some(recommender);
        self
    }

    /// Backend readiness for health checks
    pub fn status(&self) -> TranscriberStatus {
        let ready = self.transcriber.is_ready();
        TranscriberStatus {
            ready,
            backend: self.transcriber.backend(),
            model: if ready { self.transcriber.model() } else { None },
        }
    }

    /// Transcribe one clip
    #[instrument(skip(self, request), fields(
        audio_size = request.audio.len(),
        language = %request.language,
        sample_rate = request.sample_rate
    ))]
    pub async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptSet, ApplicationError> {
        if request.audio.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "Audio data is empty".to_string(),
            ));
        }

        match self.transcriber.transcribe(request).await {
            Ok(set) => {
                info!(segments = set.segments().len(), "Transcription succeeded");
                Ok(set)
            },
            Err(e) => {
                warn!(error = %e, "Transcription failed");
                Err(e)
            },
        }
    }

    /// Transcribe, then ask the recommender when one is configured and the
    /// caller supplied context
    ///
    /// A recommender failure is reported in the outcome, never as an error.
    pub async fn transcribe_with_context(
        &self,
        request: TranscriptionRequest,
        context: RecommendationContext,
    ) -> Result<TranscriptionOutcome, ApplicationError> {
        let transcripts = self.transcribe(request).await?;

        let mut outcome = TranscriptionOutcome {
            transcripts,
            suggestions: None,
            suggestions_error: None,
        };

        let Some(recommender) = self.recommender.as_ref() else {
            return Ok(outcome);
        };
        if context.is_empty() {
            return Ok(outcome);
        }

        let request = RecommendationRequest {
            transcript: outcome.transcripts.full_transcript(),
            user: context.user,
            desired_job: context.desired_job,
        };

        debug!("Requesting suggestions");
        match recommender.recommend(request).await {
            Ok(suggestions) => outcome.suggestions = Some(suggestions),
            Err(e) => {
                warn!(error = %e, "Recommendation lookup failed");
                outcome.suggestions_error = Some(e.to_string());
            },
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockRecommendationPort, MockTranscriptionPort};
    use domain::TranscriptSegment;

    fn ok_transcriber(text: &'static str) -> MockTranscriptionPort {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_transcribe().returning(move |_| {
            Ok(TranscriptSet::single(TranscriptSegment::new(text, 0.9)))
        });
        mock.expect_backend().returning(|| "generative".to_string());
        mock
    }

    fn context() -> RecommendationContext {
        RecommendationContext {
            user: Some(serde_json::json!({"name": "An"})),
            desired_job: Some("developer".to_string()),
        }
    }

    #[tokio::test]
    async fn transcribe_delegates_to_port() {
        let service = TranscriptionService::new(Arc::new(ok_transcriber("xin chào")));
        let set = service
            .transcribe(TranscriptionRequest::new(vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(set.full_transcript(), "xin chào");
    }

    #[tokio::test]
    async fn empty_audio_is_invalid_input() {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_transcribe().never();
        let service = TranscriptionService::new(Arc::new(mock));

        let err = service
            .transcribe(TranscriptionRequest::new(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn transcription_errors_propagate() {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_transcribe()
            .returning(|_| Err(ApplicationError::QuotaExceeded("quota".to_string())));
        let service = TranscriptionService::new(Arc::new(mock));

        let err = service
            .transcribe(TranscriptionRequest::new(vec![1]))
            .await
            .unwrap_err();
        assert!(err.is_quota());
    }

    #[tokio::test]
    async fn recommender_receives_transcript_and_context() {
        let mut recommender = MockRecommendationPort::new();
        recommender
            .expect_recommend()
            .withf(|req| {
                req.transcript == "tôi là lập trình viên"
                    && req.desired_job.as_deref() == Some("developer")
                    && req.user.is_some()
            })
            .times(1)
            .returning(|_| Ok(serde_json::json!({"jobs": ["backend"]})));

        let service = TranscriptionService::new(Arc::new(ok_transcriber("tôi là lập trình viên")))
            .with_recommender(Arc::new(recommender));

        let outcome = service
            .transcribe_with_context(TranscriptionRequest::new(vec![1]), context())
            .await
            .unwrap();

        assert_eq!(outcome.suggestions.unwrap()["jobs"][0], "backend");
        assert!(outcome.suggestions_error.is_none());
    }

    #[tokio::test]
    async fn recommender_failure_is_captured() {
        let mut recommender = MockRecommendationPort::new();
        recommender
            .expect_recommend()
            .returning(|_| Err(ApplicationError::ExternalService("timeout".to_string())));

        let service = TranscriptionService::new(Arc::new(ok_transcriber("hello")))
            .with_recommender(Arc::new(recommender));

        let outcome = service
            .transcribe_with_context(TranscriptionRequest::new(vec![1]), context())
            .await
            .unwrap();

        assert!(outcome.suggestions.is_none());
        assert_eq!(
            outcome.suggestions_error.as_deref(),
            Some("External service error: timeout")
        );
        assert_eq!(outcome.transcripts.full_transcript(), "hello");
    }

    #[tokio::test]
    async fn recommender_skipped_without_context() {
        let mut recommender = MockRecommendationPort::new();
        recommender.expect_recommend().never();

        let service = TranscriptionService::new(Arc::new(ok_transcriber("hello")))
            .with_recommender(Arc::new(recommender));

        let outcome = service
            .transcribe_with_context(
                TranscriptionRequest::new(vec![1]),
                RecommendationContext::default(),
            )
            .await
            .unwrap();
        assert!(outcome.suggestions.is_none());
        assert!(outcome.suggestions_error.is_none());
    }

    #[tokio::test]
    async fn recommender_skipped_when_transcription_fails() {
        let mut transcriber = MockTranscriptionPort::new();
        transcriber
            .expect_transcribe()
            .returning(|_| Err(ApplicationError::Transcription("boom".to_string())));
        let mut recommender = MockRecommendationPort::new();
        recommender.expect_recommend().never();

        let service = TranscriptionService::new(Arc::new(transcriber))
            .with_recommender(Arc::new(recommender));

        let result = service
            .transcribe_with_context(TranscriptionRequest::new(vec![1]), context())
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn status_hides_model_when_not_ready() {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_is_ready().returning(|| false);
        mock.expect_backend().returning(|| "none".to_string());
        mock.expect_model().returning(|| Some("gemini-1.5-flash".to_string()));

        let status = TranscriptionService::new(Arc::new(mock)).status();
        assert!(!status.ready);
        assert_eq!(status.backend, "none");
        assert!(status.model.is_none());
    }

    #[test]
    fn status_reports_model_when_ready() {
        let mut mock = MockTranscriptionPort::new();
        mock.expect_is_ready().returning(|| true);
        mock.expect_backend().returning(|| "generative".to_string());
        mock.expect_model().returning(|| Some("gemini-1.5-flash".to_string()));

        let status = TranscriptionService::new(Arc::new(mock)).status();
        assert!(status.ready);
        assert_eq!(status.model.as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn service_has_debug() {
        let service = TranscriptionService::new(Arc::new(ok_transcriber("x")));
        let debug = format!("{service:?}");
        assert!(debug.contains("TranscriptionService"));
        assert!(debug.contains("generative"));
    }
}
