use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::{AudioInput, TranscriptionResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (real service vs mock).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe recorded speech to text.
    ///
    /// A failure reported by the service itself comes back as
    /// `Ok(TranscriptionResult { status: Error, .. })`; `Err` is reserved for
    /// failures reaching the service.
    async fn transcribe(&self, audio: &AudioInput) -> Result<TranscriptionResult>;

    /// Name of the backing service, for logs.
    fn name(&self) -> &str;
}

/// Implement Transcriber for Arc<T> to allow sharing across pipelines.
#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Arc<T> {
    async fn transcribe(&self, audio: &AudioInput) -> Result<TranscriptionResult> {
        (**self).transcribe(audio).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock transcriber for testing
#[derive(Debug)]
pub struct MockTranscriber {
    response: String,
    service_error: Option<String>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    /// Create a new mock transcriber with default settings
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            service_error: None,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to report `status = error` with the given detail
    pub fn with_service_error(mut self, detail: &str) -> Self {
        self.service_error = Some(detail.to_string());
        self
    }

    /// Configure the mock to fail before reaching the service
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcribe calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &AudioInput) -> Result<TranscriptionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(PolyvoxError::TranscriptionFailed {
                detail: "mock transcription failure".to_string(),
            });
        }
        match &self.service_error {
            Some(detail) => Ok(TranscriptionResult::error(detail.as_str())),
            None => Ok(TranscriptionResult::ok(self.response.as_str())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::TranscriptionStatus;

    fn audio() -> AudioInput {
        AudioInput::file("hello.wav")
    }

    #[tokio::test]
    async fn test_mock_transcriber_returns_response() {
        let transcriber = MockTranscriber::new().with_response("Hello world.");

        let result = transcriber.transcribe(&audio()).await.unwrap();

        assert_eq!(result.status, TranscriptionStatus::Ok);
        assert_eq!(result.text, "Hello world.");
        assert_eq!(transcriber.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_transcriber_reports_service_error_in_band() {
        let transcriber = MockTranscriber::new().with_service_error("audio too short");

        let result = transcriber.transcribe(&audio()).await.unwrap();

        assert_eq!(result.status, TranscriptionStatus::Error);
        assert_eq!(result.error_detail.as_deref(), Some("audio too short"));
    }

    #[tokio::test]
    async fn test_mock_transcriber_returns_error_when_configured() {
        let transcriber = MockTranscriber::new().with_failure();

        match transcriber.transcribe(&audio()).await {
            Err(PolyvoxError::TranscriptionFailed { detail }) => {
                assert_eq!(detail, "mock transcription failure");
            }
            other => panic!("Expected TranscriptionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transcriber_trait_is_object_safe() {
        let transcriber: Arc<dyn Transcriber> =
            Arc::new(MockTranscriber::new().with_response("shared"));

        assert_eq!(transcriber.name(), "mock");
        let result = transcriber.transcribe(&audio()).await.unwrap();
        assert_eq!(result.text, "shared");
    }
}
