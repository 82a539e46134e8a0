use anyhow::Result;
use clap::{CommandFactory, Parser};
use polyvox::app::{TranslateOptions, run_translate_command};
use polyvox::cli::{Cli, Commands, ConfigAction};
use polyvox::config::Config;
use polyvox::logging;
use polyvox::output;
use polyvox::pipeline::LanguageTarget;
use polyvox::translate::languages::SUPPORTED_LANGUAGES;

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = if cli.command.reads_config() {
        load_config(cli.config.as_deref())?
    } else {
        Config::default().with_env_overrides()
    };
    logging::init_logging(&logging::effective_level(
        &config.logging.level,
        cli.quiet,
        cli.verbose,
    ));

    match cli.command {
        Commands::Translate {
            audio,
            targets,
            output_dir,
            voice_id,
            keep_going,
            json,
            timeout,
        } => {
            let options = TranslateOptions {
                targets,
                output_dir,
                voice_id,
                timeout_secs: timeout,
                keep_going,
                json,
            };
            run_translate_command(config, &audio, options).await?;
        }
        Commands::Languages { all } => {
            if all {
                let targets: Vec<LanguageTarget> = SUPPORTED_LANGUAGES
                    .iter()
                    .map(|(code, label)| LanguageTarget::new(*code, *label))
                    .collect();
                print!("{}", output::format_targets(&targets));
            } else {
                print!("{}", output::format_targets(&config.targets));
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref(), &config)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "polyvox", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/polyvox/config.toml)
/// 3. Built-in defaults
///
/// Environment variables are applied on top in every case.
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)?
    };

    Ok(config.with_env_overrides())
}

fn handle_config_command(
    action: ConfigAction,
    custom_path: Option<&std::path::Path>,
    config: &Config,
) -> Result<()> {
    let config_path = custom_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Show => {
            print!("{}", config.to_display_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init { force } => {
            Config::write_template(&config_path, force)?;
            println!("Wrote {}", config_path.display());
        }
    }

    Ok(())
}
