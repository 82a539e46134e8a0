//! Text translation into target languages.

pub mod google;
pub mod languages;
pub mod translator;

pub use google::{GoogleTranslateConfig, GoogleTranslator};
pub use translator::{MockTranslator, Translator};
