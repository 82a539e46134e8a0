//! Voice-to-voice pipeline.
//!
//! transcribe → (translate → synthesize) × N targets → ordered artifacts

pub mod orchestrator;
pub mod state;
pub mod types;

pub use orchestrator::{BranchOutcome, Pipeline, PipelineConfig};
pub use state::{LogReporter, PipelineState, RecordingReporter, StageReporter};
pub use types::{
    AudioArtifact, AudioInput, LanguageTarget, TranscriptionResult, TranscriptionStatus,
    TranslationResult, VoiceProfile,
};
