//! Text-to-speech synthesis and artifact storage.

pub mod elevenlabs;
pub mod store;
pub mod synthesizer;

pub use elevenlabs::{ElevenLabsConfig, ElevenLabsSynthesizer};
pub use store::ArtifactStore;
pub use synthesizer::{MockSynthesizer, Synthesizer};
