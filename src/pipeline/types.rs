//! Data types flowing through the voice-to-voice pipeline.

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Recorded speech handed to the pipeline.
///
/// Created by the caller and consumed once by the transcriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioInput {
    /// Audio file on the local file system.
    File(PathBuf),
    /// Publicly reachable audio URL, passed to the transcription service as-is.
    Url(String),
}

impl AudioInput {
    /// Interpret a command-line argument as either a URL or a file path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            AudioInput::Url(trimmed.to_string())
        } else {
            AudioInput::File(PathBuf::from(trimmed))
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        AudioInput::File(path.into())
    }
}

impl fmt::Display for AudioInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioInput::File(path) => write!(f, "{}", path.display()),
            AudioInput::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Outcome reported by the transcription capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Ok,
    Error,
}

/// Text recognised from an [`AudioInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub text: String,
    pub status: TranscriptionStatus,
    pub error_detail: Option<String>,
}

impl TranscriptionResult {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: TranscriptionStatus::Ok,
            error_detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            status: TranscriptionStatus::Error,
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == TranscriptionStatus::Ok
    }
}

/// One output language: its service code and a human-readable label.
///
/// The order of a target list defines both the translation fan-out and the
/// order of the returned artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTarget {
    pub code: String,
    pub label: String,
}

impl LanguageTarget {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }

    /// The built-in target list (Spanish, German, Mandarin, Greek).
    pub fn defaults() -> Vec<LanguageTarget> {
        defaults::TARGET_LANGUAGES
            .iter()
            .map(|(code, label)| LanguageTarget::new(*code, *label))
            .collect()
    }
}

impl fmt::Display for LanguageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.code)
    }
}

/// Transcribed text rendered into one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub language_code: String,
    pub text: String,
}

/// Voice parameters shared by every synthesis call of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    pub model_id: String,
    /// Service format identifier, `<codec>_<sample rate>[_<bitrate>]`.
    pub output_format: String,
}

impl VoiceProfile {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            stability: defaults::VOICE_STABILITY,
            similarity_boost: defaults::VOICE_SIMILARITY_BOOST,
            style: defaults::VOICE_STYLE,
            use_speaker_boost: defaults::VOICE_USE_SPEAKER_BOOST,
            model_id: defaults::SYNTHESIS_MODEL_ID.to_string(),
            output_format: defaults::SYNTHESIS_OUTPUT_FORMAT.to_string(),
        }
    }

    /// File extension for artifacts in this profile's output format.
    ///
    /// `mp3_22050_32` → `mp3`, `pcm_16000` → `pcm`.
    pub fn file_extension(&self) -> &str {
        match self.output_format.split('_').next() {
            Some(codec) if !codec.is_empty() => codec,
            _ => "bin",
        }
    }
}

/// Synthesized speech for one target language.
///
/// Ownership moves from the synthesizer to the pipeline and then to the
/// caller. The file behind `path` is never removed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioArtifact {
    pub language_code: String,
    pub path: PathBuf,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl AudioArtifact {
    pub fn new(language_code: impl Into<String>, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            language_code: language_code.into(),
            path: path.into(),
            bytes,
        }
    }

    /// Unique name the artifact is addressable by.
    pub fn locator(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
