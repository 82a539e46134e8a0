//! ElevenLabs text-to-speech client.

use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::{AudioArtifact, VoiceProfile};
use crate::tts::store::ArtifactStore;
use crate::tts::synthesizer::Synthesizer;
use async_trait::async_trait;
use serde::Serialize;

/// Connection settings for [`ElevenLabsSynthesizer`].
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: String,
    /// 0 (best quality) to 4 (lowest latency).
    pub optimize_streaming_latency: u8,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: defaults::ELEVENLABS_BASE_URL.to_string(),
            optimize_streaming_latency: defaults::SYNTHESIS_STREAMING_LATENCY,
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl From<&VoiceProfile> for VoiceSettings {
    fn from(voice: &VoiceProfile) -> Self {
        Self {
            stability: voice.stability,
            similarity_boost: voice.similarity_boost,
            style: voice.style,
            use_speaker_boost: voice.use_speaker_boost,
        }
    }
}

/// [`Synthesizer`] backed by the ElevenLabs REST API.
///
/// The audio body is streamed straight into the [`ArtifactStore`].
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    config: ElevenLabsConfig,
    store: ArtifactStore,
}

impl ElevenLabsSynthesizer {
    pub fn new(client: reqwest::Client, config: ElevenLabsConfig, store: ArtifactStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{voice_id}",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(
        &self,
        language: &str,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<AudioArtifact> {
        let extension = voice.file_extension();
        if text.trim().is_empty() {
            tracing::debug!(language, "empty text, writing empty artifact");
            return self.store.persist(language, extension, Vec::new()).await;
        }

        let fail = |message: String| PolyvoxError::SynthesisFailed {
            language: language.to_string(),
            message,
        };

        let request = SpeechRequest {
            text,
            model_id: &voice.model_id,
            voice_settings: VoiceSettings::from(voice),
        };
        let latency = self.config.optimize_streaming_latency.to_string();
        let response = self
            .client
            .post(self.endpoint(&voice.voice_id))
            .query(&[
                ("output_format", voice.output_format.as_str()),
                ("optimize_streaming_latency", latency.as_str()),
            ])
            .header("xi-api-key", &self.config.api_key)
            .header("accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(fail(format!("service returned {status}: {}", body.trim())));
        }

        self.store
            .persist_stream(language, extension, response.bytes_stream())
            .await
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}
