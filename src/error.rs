//! Error types for polyvox.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolyvoxError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing credential {name} (set it in the config file or the environment)")]
    MissingCredential { name: String },

    // Pipeline stage errors
    #[error("Transcription failed: {detail}")]
    TranscriptionFailed { detail: String },

    #[error("Translation to {language} failed: {message}")]
    TranslationFailed { language: String, message: String },

    #[error("Speech synthesis for {language} failed: {message}")]
    SynthesisFailed { language: String, message: String },

    #[error("Empty input at {stage}")]
    EmptyInput { stage: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl PolyvoxError {
    /// Target language a branch-level failure belongs to, if any.
    pub fn language(&self) -> Option<&str> {
        match self {
            PolyvoxError::TranslationFailed { language, .. }
            | PolyvoxError::SynthesisFailed { language, .. } => Some(language),
            _ => None,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PolyvoxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = PolyvoxError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = PolyvoxError::ConfigInvalidValue {
            key: "synthesis.stability".to_string(),
            message: "must be between 0.0 and 1.0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for synthesis.stability: must be between 0.0 and 1.0"
        );
    }

    #[test]
    fn test_missing_credential_display() {
        let error = PolyvoxError::MissingCredential {
            name: "ELEVENLABS_API_KEY".to_string(),
        };
        assert!(error.to_string().contains("ELEVENLABS_API_KEY"));
    }

    #[test]
    fn test_transcription_failed_keeps_detail() {
        let error = PolyvoxError::TranscriptionFailed {
            detail: "audio too short".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription failed: audio too short");
    }

    #[test]
    fn test_translation_failed_display() {
        let error = PolyvoxError::TranslationFailed {
            language: "xx".to_string(),
            message: "unsupported target language".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Translation to xx failed: unsupported target language"
        );
    }

    #[test]
    fn test_synthesis_failed_display() {
        let error = PolyvoxError::SynthesisFailed {
            language: "de".to_string(),
            message: "quota exceeded".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech synthesis for de failed: quota exceeded"
        );
    }

    #[test]
    fn test_branch_errors_carry_language() {
        let translation = PolyvoxError::TranslationFailed {
            language: "es".to_string(),
            message: "boom".to_string(),
        };
        let synthesis = PolyvoxError::SynthesisFailed {
            language: "el".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(translation.language(), Some("es"));
        assert_eq!(synthesis.language(), Some("el"));
        assert_eq!(PolyvoxError::Other("x".to_string()).language(), None);
    }

    #[test]
    fn test_empty_input_display() {
        let error = PolyvoxError::EmptyInput {
            stage: "transcription".to_string(),
        };
        assert_eq!(error.to_string(), "Empty input at transcription");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: PolyvoxError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: PolyvoxError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: PolyvoxError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<PolyvoxError>();
        assert_sync::<PolyvoxError>();
    }
}
