//! Per-run pipeline states and their reporting.

use std::fmt;
use std::sync::Mutex;

/// Where a single pipeline run currently is.
///
/// `Translating` and `Synthesizing` are per branch; `index` is the target's
/// position in the target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    Transcribing,
    TranscriptionFailed { detail: String },
    Transcribed { chars: usize },
    Translating { index: usize, language: String },
    Synthesizing { index: usize, language: String },
    BranchFailed { index: usize, language: String },
    /// A fail-fast run stopped after `language`'s branch failed.
    Failed { language: String },
    Completed { artifacts: usize },
}

impl PipelineState {
    /// Whether no further transitions follow in this run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::TranscriptionFailed { .. }
                | PipelineState::Failed { .. }
                | PipelineState::Completed { .. }
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Received => write!(f, "received"),
            PipelineState::Transcribing => write!(f, "transcribing"),
            PipelineState::TranscriptionFailed { detail } => {
                write!(f, "transcription failed: {detail}")
            }
            PipelineState::Transcribed { chars } => write!(f, "transcribed ({chars} chars)"),
            PipelineState::Translating { index, language } => {
                write!(f, "translating [{index}] {language}")
            }
            PipelineState::Synthesizing { index, language } => {
                write!(f, "synthesizing [{index}] {language}")
            }
            PipelineState::BranchFailed { index, language } => {
                write!(f, "branch [{index}] {language} failed")
            }
            PipelineState::Failed { language } => write!(f, "failed at {language}"),
            PipelineState::Completed { artifacts } => write!(f, "completed ({artifacts} artifacts)"),
        }
    }
}

/// Trait for observing pipeline state transitions.
pub trait StageReporter: Send + Sync {
    fn report(&self, state: &PipelineState);
}

/// Reporter that emits every transition as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl StageReporter for LogReporter {
    fn report(&self, state: &PipelineState) {
        match state {
            PipelineState::TranscriptionFailed { .. }
            | PipelineState::BranchFailed { .. }
            | PipelineState::Failed { .. } => {
                tracing::warn!(state = %state, "pipeline state")
            }
            _ => tracing::debug!(state = %state, "pipeline state"),
        }
    }
}

/// Reporter that keeps every transition in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    states: Mutex<Vec<PipelineState>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<PipelineState> {
        self.states
            .lock()
            .map(|states| states.clone())
            .unwrap_or_default()
    }
}

impl StageReporter for RecordingReporter {
    fn report(&self, state: &PipelineState) {
        if let Ok(mut states) = self.states.lock() {
            states.push(state.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(PipelineState::Completed { artifacts: 0 }.is_terminal());
        assert!(
            PipelineState::TranscriptionFailed {
                detail: "x".to_string()
            }
            .is_terminal()
        );
        assert!(
            PipelineState::Failed {
                language: "es".to_string()
            }
            .is_terminal()
        );
        assert!(!PipelineState::Transcribing.is_terminal());
        assert!(
            !PipelineState::BranchFailed {
                index: 0,
                language: "es".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_state_display() {
        let state = PipelineState::Synthesizing {
            index: 2,
            language: "zh-CN".to_string(),
        };
        assert_eq!(state.to_string(), "synthesizing [2] zh-CN");
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.report(&PipelineState::Received);
        reporter.report(&PipelineState::Transcribing);
        assert_eq!(
            reporter.states(),
            vec![PipelineState::Received, PipelineState::Transcribing]
        );
    }

    #[test]
    fn test_log_reporter() {
        // Just ensure it doesn't panic without a subscriber
        LogReporter.report(&PipelineState::Received);
    }
}
