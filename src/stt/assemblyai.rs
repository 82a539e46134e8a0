//! AssemblyAI speech-to-text client.
//!
//! Transcription is asynchronous on the service side: local audio is uploaded,
//! a transcript job is created for the uploaded URL, and the job is polled
//! until it settles.

use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::{AudioInput, TranscriptionResult};
use crate::stt::transcriber::Transcriber;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`AssemblyAiTranscriber`].
#[derive(Debug, Clone)]
pub struct AssemblyAiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Spoken language hint; `None` lets the service use its default.
    pub language_code: Option<String>,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl AssemblyAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: defaults::ASSEMBLYAI_BASE_URL.to_string(),
            language_code: None,
            poll_interval: Duration::from_millis(defaults::TRANSCRIPTION_POLL_INTERVAL_MS),
            timeout: Duration::from_secs(defaults::TRANSCRIPTION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TranscriptResponse {
    /// Settled result, or `None` while the job is still queued or processing.
    fn settled(self) -> Option<TranscriptionResult> {
        match self.status.as_str() {
            "completed" => Some(TranscriptionResult::ok(self.text.unwrap_or_default())),
            "error" => Some(TranscriptionResult::error(
                self.error
                    .unwrap_or_else(|| "transcription service reported an error".to_string()),
            )),
            _ => None,
        }
    }
}

/// [`Transcriber`] backed by the AssemblyAI REST API.
pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    config: AssemblyAiConfig,
}

impl AssemblyAiTranscriber {
    /// Wrap a shared HTTP client. The client is reused for every call.
    pub fn new(client: reqwest::Client, config: AssemblyAiConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn upload(&self, path: &std::path::Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            failed(format!("cannot read audio file {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "uploading audio");

        let response = self
            .client
            .post(self.endpoint("/v2/upload"))
            .header("authorization", &self.config.api_key)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| failed(format!("upload request failed: {e}")))?;
        let upload: UploadResponse = read_json(response, "upload").await?;
        Ok(upload.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> Result<String> {
        let request = TranscriptRequest {
            audio_url,
            language_code: self.config.language_code.as_deref(),
        };
        let response = self
            .client
            .post(self.endpoint("/v2/transcript"))
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| failed(format!("transcript request failed: {e}")))?;
        let transcript: TranscriptResponse = read_json(response, "transcript").await?;
        Ok(transcript.id)
    }

    async fn poll(&self, id: &str) -> Result<TranscriptionResult> {
        let url = self.endpoint(&format!("/v2/transcript/{id}"));
        loop {
            let response = self
                .client
                .get(&url)
                .header("authorization", &self.config.api_key)
                .send()
                .await
                .map_err(|e| failed(format!("status request failed: {e}")))?;
            let transcript: TranscriptResponse = read_json(response, "status").await?;
            tracing::trace!(id, status = %transcript.status, "polled transcript");

            if let Some(result) = transcript.settled() {
                return Ok(result);
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn run_job(&self, audio: &AudioInput) -> Result<TranscriptionResult> {
        let audio_url = match audio {
            AudioInput::File(path) => self.upload(path).await?,
            AudioInput::Url(url) => url.clone(),
        };

        let id = self.submit(&audio_url).await?;
        tracing::debug!(id = %id, "transcript job created");
        self.poll(&id).await
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    /// The configured timeout covers upload, job creation and polling.
    async fn transcribe(&self, audio: &AudioInput) -> Result<TranscriptionResult> {
        tokio::time::timeout(self.config.timeout, self.run_job(audio))
            .await
            .map_err(|_| {
                failed(format!(
                    "transcription did not complete within {:?}",
                    self.config.timeout
                ))
            })?
    }

    fn name(&self) -> &str {
        "assemblyai"
    }
}

fn failed(detail: String) -> PolyvoxError {
    PolyvoxError::TranscriptionFailed { detail }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    step: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(failed(format!("{step} returned {status}: {}", body.trim())));
    }
    response
        .json()
        .await
        .map_err(|e| failed(format!("{step} returned an unreadable body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::TranscriptionStatus;

    fn response(json: &str) -> TranscriptResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_completed_transcript_is_settled() {
        let result = response(r#"{"id":"t1","status":"completed","text":"Hello world."}"#)
            .settled()
            .unwrap();
        assert_eq!(result, TranscriptionResult::ok("Hello world."));
    }

    #[test]
    fn test_completed_without_text_is_empty() {
        let result = response(r#"{"id":"t1","status":"completed","text":null}"#)
            .settled()
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_error_transcript_carries_service_detail() {
        let result = response(r#"{"id":"t1","status":"error","error":"audio too short"}"#)
            .settled()
            .unwrap();
        assert_eq!(result.status, TranscriptionStatus::Error);
        assert_eq!(result.error_detail.as_deref(), Some("audio too short"));
    }

    #[test]
    fn test_pending_states_are_not_settled() {
        assert!(response(r#"{"id":"t1","status":"queued"}"#).settled().is_none());
        assert!(response(r#"{"id":"t1","status":"processing"}"#).settled().is_none());
    }

    #[test]
    fn test_request_omits_missing_language() {
        let body = serde_json::to_value(TranscriptRequest {
            audio_url: "https://cdn/x",
            language_code: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"audio_url": "https://cdn/x"}));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let mut config = AssemblyAiConfig::new("key");
        config.base_url = "http://localhost:9000/".to_string();
        let transcriber = AssemblyAiTranscriber::new(reqwest::Client::new(), config);
        assert_eq!(
            transcriber.endpoint("/v2/upload"),
            "http://localhost:9000/v2/upload"
        );
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_network() {
        let mut config = AssemblyAiConfig::new("key");
        config.base_url = "http://127.0.0.1:9".to_string();
        let transcriber = AssemblyAiTranscriber::new(reqwest::Client::new(), config);

        let err = transcriber
            .transcribe(&AudioInput::file("/nonexistent/polyvox/audio.wav"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot read audio file"));
    }
}
