//! polyvox - speak once, hear it back in several languages
//!
//! Transcribes a recording, translates the transcript into every target
//! language concurrently and synthesizes speech for each translation.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
#[cfg(feature = "cli")]
pub mod output;
pub mod pipeline;
pub mod stt;
pub mod translate;
pub mod tts;

// Composition root - needs everything
#[cfg(feature = "cli")]
pub mod app;

// Capability traits (transcribe → translate → synthesize)
pub use stt::transcriber::Transcriber;
pub use translate::translator::Translator;
pub use tts::synthesizer::Synthesizer;

// Pipeline
pub use pipeline::orchestrator::{BranchOutcome, Pipeline, PipelineConfig};
pub use pipeline::state::{PipelineState, StageReporter};
pub use pipeline::types::{
    AudioArtifact, AudioInput, LanguageTarget, TranscriptionResult, TranslationResult,
    VoiceProfile,
};

// Error handling
pub use error::{PolyvoxError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
            let hash_part = ver.split('+').nth(1).unwrap_or("");
            assert_eq!(hash_part.len(), 7, "Git hash should be 7 chars, got: {}", hash_part);
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
