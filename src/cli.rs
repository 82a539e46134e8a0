//! Command-line interface for polyvox
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Speak once, hear it back in several languages
#[derive(Parser, Debug)]
#[command(
    name = "polyvox",
    version,
    about = "Speak once, hear it back in several languages"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe an audio file or URL and synthesize it in every target language
    Translate {
        /// Audio file path or http(s) URL
        #[arg(value_name = "AUDIO")]
        audio: String,

        /// Comma-separated target codes replacing the configured list (e.g. es,de,zh-CN)
        #[arg(long, short = 't', value_name = "CODES", value_delimiter = ',')]
        targets: Option<Vec<String>>,

        /// Directory for the synthesized audio files
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Voice to synthesize with (overrides ELEVENLABS_VOICE_ID)
        #[arg(long, value_name = "ID")]
        voice_id: Option<String>,

        /// Keep the languages that succeeded when others fail
        #[arg(long)]
        keep_going: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Give up on transcription after this long (e.g. 90s, 5m)
        #[arg(long, value_name = "DURATION", value_parser = parse_duration_secs)]
        timeout: Option<u64>,
    },

    /// List target languages
    Languages {
        /// List every supported language instead of the configured targets
        #[arg(long)]
        all: bool,
    },

    /// View and initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command needs an existing config file.
    ///
    /// `config init` is the one command that creates it.
    pub fn reads_config(&self) -> bool {
        !matches!(
            self,
            Commands::Config {
                action: ConfigAction::Init { .. }
            }
        )
    }
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (credentials masked)
    Show,
    /// Print the configuration file path
    Path,
    /// Write a commented template to the configuration path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse a duration string into seconds.
///
/// Supports any duration format accepted by `humantime`, plus bare numbers
/// (seconds).
fn parse_duration_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_parses_target_list() {
        let cli = Cli::parse_from(["polyvox", "translate", "hello.wav", "-t", "es,de,zh-CN"]);
        match cli.command {
            Commands::Translate { audio, targets, .. } => {
                assert_eq!(audio, "hello.wav");
                assert_eq!(
                    targets,
                    Some(vec!["es".to_string(), "de".to_string(), "zh-CN".to_string()])
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["polyvox", "translate", "a.wav", "-vv", "--keep-going"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Translate {
                keep_going: true,
                ..
            }
        ));
    }

    #[test]
    fn test_translate_requires_audio() {
        assert!(Cli::try_parse_from(["polyvox", "translate"]).is_err());
    }

    #[test]
    fn test_parse_duration_secs() {
        assert_eq!(parse_duration_secs("90"), Ok(90));
        assert_eq!(parse_duration_secs("2m"), Ok(120));
        assert_eq!(parse_duration_secs("1h30m"), Ok(5400));
        assert!(parse_duration_secs("soon").is_err());
    }

    #[test]
    fn test_only_config_init_skips_loading() {
        let init = Cli::parse_from(["polyvox", "--config", "new.toml", "config", "init"]);
        assert!(!init.command.reads_config());

        let show = Cli::parse_from(["polyvox", "config", "show"]);
        assert!(show.command.reads_config());

        let translate = Cli::parse_from(["polyvox", "translate", "a.wav"]);
        assert!(translate.command.reads_config());
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::parse_from(["polyvox", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }
}
