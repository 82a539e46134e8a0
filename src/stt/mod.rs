//! Speech-to-text transcription.

pub mod assemblyai;
pub mod transcriber;

pub use assemblyai::{AssemblyAiConfig, AssemblyAiTranscriber};
pub use transcriber::{MockTranscriber, Transcriber};
