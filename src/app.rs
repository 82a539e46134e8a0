//! Voice-to-voice application entry point.
//!
//! Composition root: turns configuration into long-lived service clients,
//! builds the pipeline once and runs it.

use crate::config::Config;
use crate::error::{PolyvoxError, Result};
use crate::output;
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig};
use crate::pipeline::types::{AudioInput, LanguageTarget, VoiceProfile};
use crate::stt::assemblyai::{AssemblyAiConfig, AssemblyAiTranscriber};
use crate::translate::google::{GoogleTranslateConfig, GoogleTranslator};
use crate::tts::elevenlabs::{ElevenLabsConfig, ElevenLabsSynthesizer};
use crate::tts::store::ArtifactStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command-line overrides for a translate run.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Target codes replacing the configured list.
    pub targets: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub voice_id: Option<String>,
    /// Transcription timeout in seconds.
    pub timeout_secs: Option<u64>,
    pub keep_going: bool,
    pub json: bool,
}

fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| PolyvoxError::Other(format!("Failed to create HTTP client: {e}")))
}

fn required(value: Option<&String>, name: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| PolyvoxError::MissingCredential {
            name: name.to_string(),
        })
}

/// Build the pipeline with real service clients.
///
/// Each client is constructed once here and reused for every call.
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let transcription_key = required(
        config.transcription.api_key.as_ref(),
        "ASSEMBLYAI_API_KEY",
    )?;
    let synthesis_key = required(config.synthesis.api_key.as_ref(), "ELEVENLABS_API_KEY")?;

    let transcriber = AssemblyAiTranscriber::new(
        // Uploads can be large; the transcriber's own timeout bounds the whole call.
        http_client(None)?,
        AssemblyAiConfig {
            api_key: transcription_key,
            base_url: config.transcription.base_url.clone(),
            language_code: config.transcription.language_code.clone(),
            poll_interval: config.transcription.poll_interval(),
            timeout: config.transcription.timeout(),
        },
    );

    let translator = GoogleTranslator::new(
        http_client(Some(Duration::from_secs(config.translation.timeout_secs)))?,
        GoogleTranslateConfig {
            base_url: config.translation.base_url.clone(),
            source_language: config.translation.source_language.clone(),
        },
    );

    let synthesizer = ElevenLabsSynthesizer::new(
        http_client(Some(Duration::from_secs(config.synthesis.timeout_secs)))?,
        ElevenLabsConfig {
            api_key: synthesis_key,
            base_url: config.synthesis.base_url.clone(),
            optimize_streaming_latency: config.synthesis.optimize_streaming_latency,
        },
        ArtifactStore::new(&config.output.dir),
    );

    Ok(Pipeline::new(
        Arc::new(transcriber),
        Arc::new(translator),
        Arc::new(synthesizer),
    )
    .with_config(PipelineConfig {
        reject_empty_transcript: config.pipeline.reject_empty_transcript,
    }))
}

/// Apply CLI overrides and work out targets and voice for a run.
pub fn prepare_run(
    mut config: Config,
    options: &TranslateOptions,
) -> Result<(Config, Vec<LanguageTarget>, VoiceProfile)> {
    if let Some(dir) = &options.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(voice_id) = &options.voice_id {
        config.synthesis.voice_id = Some(voice_id.clone());
    }
    if let Some(secs) = options.timeout_secs {
        config.transcription.timeout_secs = secs;
    }
    if options.keep_going {
        config.pipeline.keep_going = true;
    }
    config.validate()?;

    let targets = match &options.targets {
        Some(codes) => config.resolve_targets(codes)?,
        None => config.targets.clone(),
    };
    let voice_id = required(config.synthesis.voice_id.as_ref(), "ELEVENLABS_VOICE_ID")?;
    let voice = config.synthesis.voice_profile(&voice_id);
    Ok((config, targets, voice))
}

/// Run the translate command: transcribe → translate → synthesize → print.
pub async fn run_translate_command(
    config: Config,
    audio: &str,
    options: TranslateOptions,
) -> Result<()> {
    let (config, targets, voice) = prepare_run(config, &options)?;
    let pipeline = build_pipeline(&config)?;
    let audio = AudioInput::parse(audio);

    tracing::info!(
        version = %crate::version_string(),
        audio = %audio,
        targets = ?targets.iter().map(|t| t.code.as_str()).collect::<Vec<_>>(),
        output_dir = %config.output.dir.display(),
        "starting voice-to-voice run"
    );

    if config.pipeline.keep_going {
        let outcomes = pipeline.run_settled(&audio, &targets, &voice).await?;
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if options.json {
            println!("{}", output::outcomes_json(&outcomes));
        } else {
            output::print_outcomes(&outcomes);
        }
        if failed > 0 {
            return Err(PolyvoxError::Other(format!(
                "{failed} of {} targets failed",
                outcomes.len()
            )));
        }
        return Ok(());
    }

    let artifacts = pipeline.run(&audio, &targets, &voice).await?;
    if options.json {
        println!("{}", output::artifacts_json(&targets, &artifacts));
    } else {
        output::print_artifacts(&targets, &artifacts);
    }
    Ok(())
}
