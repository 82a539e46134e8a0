use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::{AudioArtifact, VoiceProfile};
use crate::tts::store::ArtifactStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for text-to-speech synthesis.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` (already in `language`) with the given voice.
    ///
    /// Returns only once the audio is fully materialized and persisted under
    /// a locator unique to this call. Empty text produces an empty artifact.
    async fn synthesize(
        &self,
        language: &str,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<AudioArtifact>;

    /// Name of the backing service, for logs.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    async fn synthesize(
        &self,
        language: &str,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<AudioArtifact> {
        (**self).synthesize(language, text, voice).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock synthesizer for testing.
///
/// Without a store, artifacts are named `<language>.<ext>` and never touch
/// the disk. With a store they are persisted like real artifacts.
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    store: Option<ArtifactStore>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist artifacts through `store`
    pub fn with_store(mut self, store: ArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Fail every synthesis for `language`
    pub fn with_failure_for(mut self, language: &str) -> Self {
        self.failing.insert(language.to_string());
        self
    }

    /// Sleep before answering for `language`
    pub fn with_delay(mut self, language: &str, delay: Duration) -> Self {
        self.delays.insert(language.to_string(), delay);
        self
    }

    /// `(language, text)` of every call made so far, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        language: &str,
        text: &str,
        voice: &VoiceProfile,
    ) -> Result<AudioArtifact> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((language.to_string(), text.to_string()));
        }
        if let Some(delay) = self.delays.get(language) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(language) {
            return Err(PolyvoxError::SynthesisFailed {
                language: language.to_string(),
                message: "mock synthesis failure".to_string(),
            });
        }

        let bytes = text.as_bytes().to_vec();
        match &self.store {
            Some(store) => {
                store
                    .persist(language, voice.file_extension(), bytes)
                    .await
            }
            None => Ok(AudioArtifact::new(
                language,
                format!("{language}.{}", voice.file_extension()),
                bytes,
            )),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
