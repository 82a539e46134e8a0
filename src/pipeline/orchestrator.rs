//! Voice-to-voice pipeline: transcribe once, then fan out one
//! translate → synthesize branch per target language and fan the artifacts
//! back in, in target order.

use crate::error::{PolyvoxError, Result};
use crate::pipeline::state::{LogReporter, PipelineState, StageReporter};
use crate::pipeline::types::{
    AudioArtifact, AudioInput, LanguageTarget, TranslationResult, VoiceProfile,
};
use crate::stt::transcriber::Transcriber;
use crate::translate::translator::Translator;
use crate::tts::synthesizer::Synthesizer;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Configuration for the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Fail with `EmptyInput` when nothing was recognised, instead of
    /// producing empty artifacts.
    pub reject_empty_transcript: bool,
}

/// Result of one branch when running with partial-success semantics.
#[derive(Debug)]
pub struct BranchOutcome {
    pub target: LanguageTarget,
    pub result: Result<AudioArtifact>,
}

impl BranchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// The pipeline orchestrator.
///
/// Holds long-lived capability handles; one `Pipeline` serves any number of
/// runs, and runs share no state with each other.
pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    config: PipelineConfig,
    reporter: Arc<dyn StageReporter>,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            transcriber,
            translator,
            synthesizer,
            config: PipelineConfig::default(),
            reporter: Arc::new(LogReporter),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StageReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline, failing the whole run on the first error.
    ///
    /// On success the result holds exactly one artifact per target, and
    /// `artifacts[i]` belongs to `targets[i]`. When a branch fails, the
    /// remaining branches are aborted and no artifacts are returned.
    #[tracing::instrument(skip_all, fields(audio = %audio, targets = targets.len()))]
    pub async fn run(
        &self,
        audio: &AudioInput,
        targets: &[LanguageTarget],
        voice: &VoiceProfile,
    ) -> Result<Vec<AudioArtifact>> {
        let text = self.transcribe(audio).await?;
        let mut branches = self.spawn_branches(text, targets, voice);

        let mut slots: Vec<Option<AudioArtifact>> = targets.iter().map(|_| None).collect();
        while let Some(joined) = branches.join_next().await {
            let (index, result) = joined
                .map_err(|e| PolyvoxError::Other(format!("pipeline branch aborted: {e}")))?;
            match result {
                Ok(artifact) => slots[index] = Some(artifact),
                Err(e) => {
                    self.reporter.report(&PipelineState::BranchFailed {
                        index,
                        language: targets[index].code.clone(),
                    });
                    branches.abort_all();
                    self.reporter.report(&PipelineState::Failed {
                        language: targets[index].code.clone(),
                    });
                    return Err(e);
                }
            }
        }

        let artifacts = slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.ok_or_else(|| {
                    PolyvoxError::Other(format!("no artifact produced for {}", target.code))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.reporter.report(&PipelineState::Completed {
            artifacts: artifacts.len(),
        });
        Ok(artifacts)
    }

    /// Run the pipeline, letting every branch finish.
    ///
    /// Transcription failure is still fatal. Branch failures are returned per
    /// target, in target order, next to the artifacts that succeeded.
    #[tracing::instrument(skip_all, fields(audio = %audio, targets = targets.len()))]
    pub async fn run_settled(
        &self,
        audio: &AudioInput,
        targets: &[LanguageTarget],
        voice: &VoiceProfile,
    ) -> Result<Vec<BranchOutcome>> {
        let text = self.transcribe(audio).await?;
        let mut branches = self.spawn_branches(text, targets, voice);

        let mut slots: Vec<Option<Result<AudioArtifact>>> =
            targets.iter().map(|_| None).collect();
        while let Some(joined) = branches.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if result.is_err() {
                        self.reporter.report(&PipelineState::BranchFailed {
                            index,
                            language: targets[index].code.clone(),
                        });
                    }
                    slots[index] = Some(result);
                }
                Err(e) => tracing::error!(error = %e, "pipeline branch aborted"),
            }
        }

        let outcomes: Vec<BranchOutcome> = slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| BranchOutcome {
                target: target.clone(),
                result: slot.unwrap_or_else(|| {
                    Err(PolyvoxError::Other(format!(
                        "no artifact produced for {}",
                        target.code
                    )))
                }),
            })
            .collect();

        self.reporter.report(&PipelineState::Completed {
            artifacts: outcomes.iter().filter(|o| o.is_ok()).count(),
        });
        Ok(outcomes)
    }

    /// Transcribe the input, converting a service-reported error into
    /// `TranscriptionFailed`. Nothing downstream starts if this fails.
    async fn transcribe(&self, audio: &AudioInput) -> Result<String> {
        self.reporter.report(&PipelineState::Received);
        self.reporter.report(&PipelineState::Transcribing);

        let result = match self.transcriber.transcribe(audio).await {
            Ok(result) => result,
            Err(e) => {
                self.reporter.report(&PipelineState::TranscriptionFailed {
                    detail: e.to_string(),
                });
                return Err(e);
            }
        };

        if !result.is_ok() {
            let detail = result
                .error_detail
                .unwrap_or_else(|| "transcription service reported an error".to_string());
            self.reporter.report(&PipelineState::TranscriptionFailed {
                detail: detail.clone(),
            });
            return Err(PolyvoxError::TranscriptionFailed { detail });
        }

        if result.text.trim().is_empty() && self.config.reject_empty_transcript {
            self.reporter.report(&PipelineState::TranscriptionFailed {
                detail: "no speech recognised".to_string(),
            });
            return Err(PolyvoxError::EmptyInput {
                stage: "transcription".to_string(),
            });
        }

        tracing::info!(
            transcriber = self.transcriber.name(),
            chars = result.text.len(),
            "transcription complete"
        );
        self.reporter.report(&PipelineState::Transcribed {
            chars: result.text.len(),
        });
        Ok(result.text)
    }

    /// Start one translate → synthesize task per target.
    ///
    /// Each task yields its target index alongside its result so the caller
    /// can place results by position, whatever the completion order.
    fn spawn_branches(
        &self,
        text: String,
        targets: &[LanguageTarget],
        voice: &VoiceProfile,
    ) -> JoinSet<(usize, Result<AudioArtifact>)> {
        let text: Arc<str> = Arc::from(text);
        let voice = Arc::new(voice.clone());
        let mut branches = JoinSet::new();

        for (index, target) in targets.iter().enumerate() {
            let branch = Branch {
                index,
                language: target.code.clone(),
                translator: self.translator.clone(),
                synthesizer: self.synthesizer.clone(),
                reporter: self.reporter.clone(),
            };
            let text = text.clone();
            let voice = voice.clone();
            branches.spawn(
                async move { (index, branch.run(&text, &voice).await) }.in_current_span(),
            );
        }
        branches
    }
}

/// Everything one fan-out branch needs, owned so it can run as its own task.
struct Branch {
    index: usize,
    language: String,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    reporter: Arc<dyn StageReporter>,
}

impl Branch {
    async fn run(self, text: &str, voice: &VoiceProfile) -> Result<AudioArtifact> {
        self.reporter.report(&PipelineState::Translating {
            index: self.index,
            language: self.language.clone(),
        });
        let translation = TranslationResult {
            text: self.translator.translate(text, &self.language).await?,
            language_code: self.language.clone(),
        };
        tracing::debug!(
            index = self.index,
            language = %translation.language_code,
            chars = translation.text.len(),
            "translation complete"
        );

        self.reporter.report(&PipelineState::Synthesizing {
            index: self.index,
            language: self.language.clone(),
        });
        self.synthesizer
            .synthesize(&translation.language_code, &translation.text, voice)
            .await
    }
}
