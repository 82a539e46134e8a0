//! Default configuration constants for polyvox.
//!
//! Shared by the configuration types and the service clients so that a
//! missing config section and a freshly constructed client agree.

/// AssemblyAI REST endpoint.
pub const ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com";

/// Interval between transcript status polls.
///
/// Matches the polling cadence of the official AssemblyAI SDKs.
pub const TRANSCRIPTION_POLL_INTERVAL_MS: u64 = 3000;

/// Give up on a transcript that has not completed after this many seconds.
pub const TRANSCRIPTION_TIMEOUT_SECS: u64 = 600;

/// Google Translate endpoint used by the `gtx` web client.
pub const GOOGLE_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";

/// Source language for every translation.
///
/// Use "auto" to let the translation service detect it.
pub const SOURCE_LANGUAGE: &str = "en";

/// Language value that triggers automatic source language detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Longest text accepted by the translation endpoint in a single request.
pub const TRANSLATION_MAX_CHARS: usize = 5000;

/// ElevenLabs REST endpoint.
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// Multilingual model; the turbo models only cover a subset of languages.
pub const SYNTHESIS_MODEL_ID: &str = "eleven_multilingual_v2";

/// MP3, 22.05kHz sample rate, 32kbps.
pub const SYNTHESIS_OUTPUT_FORMAT: &str = "mp3_22050_32";

/// Streaming latency optimisation level (0 = best quality).
pub const SYNTHESIS_STREAMING_LATENCY: u8 = 0;

pub const VOICE_STABILITY: f32 = 0.5;
pub const VOICE_SIMILARITY_BOOST: f32 = 0.8;
pub const VOICE_STYLE: f32 = 0.5;
pub const VOICE_USE_SPEAKER_BOOST: bool = true;

/// Request timeout for translation and synthesis calls.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Directory artifacts are written to, relative to the working directory.
pub const OUTPUT_DIR: &str = ".";

/// Default tracing level for the polyvox target.
pub const LOG_LEVEL: &str = "info";

/// Target languages used when the config file does not list any.
///
/// The order here is the output order.
pub const TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("es", "Spanish"),
    ("de", "German"),
    ("zh-CN", "Mandarin"),
    ("el", "Greek"),
];
