//! Terminal rendering of pipeline results.
//! Plain lines for humans, JSON for scripts.

use crate::pipeline::orchestrator::BranchOutcome;
use crate::pipeline::types::{AudioArtifact, LanguageTarget};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

#[derive(Debug, Serialize)]
struct ArtifactLine<'a> {
    language: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ArtifactLine<'a> {
    fn ok(target: &'a LanguageTarget, artifact: &AudioArtifact) -> Self {
        Self {
            language: &target.code,
            label: &target.label,
            path: Some(artifact.path.display().to_string()),
            bytes: Some(artifact.bytes.len()),
            error: None,
        }
    }

    fn failed(target: &'a LanguageTarget, error: String) -> Self {
        Self {
            language: &target.code,
            label: &target.label,
            path: None,
            bytes: None,
            error: Some(error),
        }
    }
}

/// One line per artifact: `Spanish (es)  ./<uuid>.mp3`.
pub fn format_artifact_line(target: &LanguageTarget, artifact: &AudioArtifact, color: bool) -> String {
    let label = target.to_string();
    let path = artifact.path.display().to_string();
    if color {
        format!("{:<24} {}", label.bold(), path.green())
    } else {
        format!("{label:<24} {path}")
    }
}

pub fn print_artifacts(targets: &[LanguageTarget], artifacts: &[AudioArtifact]) {
    let color = std::io::stdout().is_terminal();
    for (target, artifact) in targets.iter().zip(artifacts) {
        println!("{}", format_artifact_line(target, artifact, color));
    }
}

pub fn print_outcomes(outcomes: &[BranchOutcome]) {
    let color = std::io::stdout().is_terminal();
    for outcome in outcomes {
        match &outcome.result {
            Ok(artifact) => println!("{}", format_artifact_line(&outcome.target, artifact, color)),
            Err(e) => {
                let label = outcome.target.to_string();
                if color {
                    println!("{:<24} {}", label.bold(), e.red());
                } else {
                    println!("{label:<24} error: {e}");
                }
            }
        }
    }
}

pub fn artifacts_json(targets: &[LanguageTarget], artifacts: &[AudioArtifact]) -> String {
    let lines: Vec<ArtifactLine> = targets
        .iter()
        .zip(artifacts)
        .map(|(target, artifact)| ArtifactLine::ok(target, artifact))
        .collect();
    serde_json::to_string_pretty(&lines).unwrap_or_default()
}

pub fn outcomes_json(outcomes: &[BranchOutcome]) -> String {
    let lines: Vec<ArtifactLine> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(artifact) => ArtifactLine::ok(&outcome.target, artifact),
            Err(e) => ArtifactLine::failed(&outcome.target, e.to_string()),
        })
        .collect();
    serde_json::to_string_pretty(&lines).unwrap_or_default()
}

/// Render a target list for `polyvox languages`.
pub fn format_targets(targets: &[LanguageTarget]) -> String {
    targets
        .iter()
        .enumerate()
        .map(|(i, target)| format!("{:>2}. {:<8} {}\n", i + 1, target.code, target.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PolyvoxError;

    fn spanish() -> LanguageTarget {
        LanguageTarget::new("es", "Spanish")
    }

    #[test]
    fn test_plain_artifact_line() {
        let artifact = AudioArtifact::new("es", "out/abc.mp3", vec![1]);
        let line = format_artifact_line(&spanish(), &artifact, false);
        assert!(line.starts_with("Spanish (es)"));
        assert!(line.ends_with("out/abc.mp3"));
    }

    #[test]
    fn test_artifacts_json_keeps_order() {
        let targets = vec![spanish(), LanguageTarget::new("de", "German")];
        let artifacts = vec![
            AudioArtifact::new("es", "es.mp3", vec![0; 3]),
            AudioArtifact::new("de", "de.mp3", vec![]),
        ];

        let json: serde_json::Value =
            serde_json::from_str(&artifacts_json(&targets, &artifacts)).unwrap();

        assert_eq!(json[0]["language"], "es");
        assert_eq!(json[0]["bytes"], 3);
        assert_eq!(json[1]["path"], "de.mp3");
        assert!(json[1].get("error").is_none());
    }

    #[test]
    fn test_outcomes_json_reports_errors() {
        let outcomes = vec![BranchOutcome {
            target: spanish(),
            result: Err(PolyvoxError::SynthesisFailed {
                language: "es".to_string(),
                message: "quota exceeded".to_string(),
            }),
        }];

        let json: serde_json::Value = serde_json::from_str(&outcomes_json(&outcomes)).unwrap();

        assert!(json[0]["error"].as_str().unwrap().contains("quota exceeded"));
        assert!(json[0].get("path").is_none());
    }

    #[test]
    fn test_format_targets_numbers_lines() {
        let rendered = format_targets(&LanguageTarget::defaults());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(" 1. es"));
        assert!(lines[3].contains("Greek"));
    }
}
