use crate::defaults;
use crate::error::{PolyvoxError, Result};
use crate::pipeline::types::{LanguageTarget, VoiceProfile};
use crate::translate::languages;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub translation: TranslationConfig,
    pub synthesis: SynthesisConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineSection,
    pub logging: LoggingConfig,
    /// Output languages, in output order.
    pub targets: Vec<LanguageTarget>,
}

/// Speech-to-text service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Spoken language hint; unset lets the service decide.
    pub language_code: Option<String>,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub source_language: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Speech synthesis service and voice configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub base_url: String,
    pub model_id: String,
    pub output_format: String,
    pub optimize_streaming_latency: u8,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    pub timeout_secs: u64,
}

/// Where artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Pipeline behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PipelineSection {
    /// Treat an empty transcript as an error.
    pub reject_empty_transcript: bool,
    /// Return the targets that succeeded instead of failing the whole run.
    pub keep_going: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcription: TranscriptionConfig::default(),
            translation: TranslationConfig::default(),
            synthesis: SynthesisConfig::default(),
            output: OutputConfig::default(),
            pipeline: PipelineSection::default(),
            logging: LoggingConfig::default(),
            targets: LanguageTarget::defaults(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::ASSEMBLYAI_BASE_URL.to_string(),
            language_code: None,
            poll_interval_ms: defaults::TRANSCRIPTION_POLL_INTERVAL_MS,
            timeout_secs: defaults::TRANSCRIPTION_TIMEOUT_SECS,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            base_url: defaults::GOOGLE_TRANSLATE_BASE_URL.to_string(),
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: None,
            base_url: defaults::ELEVENLABS_BASE_URL.to_string(),
            model_id: defaults::SYNTHESIS_MODEL_ID.to_string(),
            output_format: defaults::SYNTHESIS_OUTPUT_FORMAT.to_string(),
            optimize_streaming_latency: defaults::SYNTHESIS_STREAMING_LATENCY,
            stability: defaults::VOICE_STABILITY,
            similarity_boost: defaults::VOICE_SIMILARITY_BOOST,
            style: defaults::VOICE_STYLE,
            use_speaker_boost: defaults::VOICE_USE_SPEAKER_BOOST,
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl TranscriptionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SynthesisConfig {
    /// Voice profile for a run, using `voice_id`.
    pub fn voice_profile(&self, voice_id: &str) -> VoiceProfile {
        VoiceProfile {
            voice_id: voice_id.to_string(),
            stability: self.stability,
            similarity_boost: self.similarity_boost,
            style: self.style,
            use_speaker_boost: self.use_speaker_boost,
            model_id: self.model_id.clone(),
            output_format: self.output_format.clone(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PolyvoxError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                PolyvoxError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(PolyvoxError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - ASSEMBLYAI_API_KEY → transcription.api_key
    /// - ELEVENLABS_API_KEY → synthesis.api_key
    /// - ELEVENLABS_VOICE_ID → synthesis.voice_id
    /// - POLYVOX_OUTPUT_DIR → output.dir
    /// - POLYVOX_LOG → logging.level
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = non_empty_env("ASSEMBLYAI_API_KEY") {
            self.transcription.api_key = Some(key);
        }
        if let Some(key) = non_empty_env("ELEVENLABS_API_KEY") {
            self.synthesis.api_key = Some(key);
        }
        if let Some(voice) = non_empty_env("ELEVENLABS_VOICE_ID") {
            self.synthesis.voice_id = Some(voice);
        }
        if let Some(dir) = non_empty_env("POLYVOX_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
        if let Some(level) = non_empty_env("POLYVOX_LOG") {
            self.logging.level = level;
        }
        self
    }

    /// Check values that TOML typing alone cannot rule out.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !languages::is_supported(&target.code) {
                return Err(PolyvoxError::ConfigInvalidValue {
                    key: "targets".to_string(),
                    message: format!("unsupported language code '{}'", target.code),
                });
            }
            if !seen.insert(target.code.to_ascii_lowercase()) {
                return Err(PolyvoxError::ConfigInvalidValue {
                    key: "targets".to_string(),
                    message: format!("language '{}' listed twice", target.code),
                });
            }
        }

        for (key, value) in [
            ("synthesis.stability", self.synthesis.stability),
            ("synthesis.similarity_boost", self.synthesis.similarity_boost),
            ("synthesis.style", self.synthesis.style),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolyvoxError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: format!("{value} is outside 0.0..=1.0"),
                });
            }
        }

        if self.synthesis.optimize_streaming_latency > 4 {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "synthesis.optimize_streaming_latency".to_string(),
                message: "must be between 0 and 4".to_string(),
            });
        }

        if self.transcription.poll_interval_ms == 0 {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "transcription.poll_interval_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }

        for (key, secs) in [
            ("transcription.timeout_secs", self.transcription.timeout_secs),
            ("translation.timeout_secs", self.translation.timeout_secs),
            ("synthesis.timeout_secs", self.synthesis.timeout_secs),
        ] {
            if secs == 0 {
                return Err(PolyvoxError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }

        let source = &self.translation.source_language;
        if source != defaults::AUTO_LANGUAGE && !languages::is_supported(source) {
            return Err(PolyvoxError::ConfigInvalidValue {
                key: "translation.source_language".to_string(),
                message: format!("unsupported language code '{source}'"),
            });
        }
        Ok(())
    }

    /// Resolve `--targets es,de` style codes to labeled targets.
    ///
    /// Labels come from the configured targets first, then from the language table.
    pub fn resolve_targets(&self, codes: &[String]) -> Result<Vec<LanguageTarget>> {
        codes
            .iter()
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .map(|code| {
                if let Some(target) = self
                    .targets
                    .iter()
                    .find(|t| t.code.eq_ignore_ascii_case(code))
                {
                    return Ok(target.clone());
                }
                match (languages::canonical_code(code), languages::display_name(code)) {
                    (Some(canonical), Some(name)) => Ok(LanguageTarget::new(canonical, name)),
                    _ => Err(PolyvoxError::ConfigInvalidValue {
                        key: "targets".to_string(),
                        message: format!("unsupported language code '{code}'"),
                    }),
                }
            })
            .collect()
    }

    /// Serialize the effective configuration, with credentials masked.
    pub fn to_display_toml(&self) -> Result<String> {
        let mut masked = self.clone();
        masked.transcription.api_key = masked.transcription.api_key.map(|k| mask(&k));
        masked.synthesis.api_key = masked.synthesis.api_key.map(|k| mask(&k));
        toml::to_string_pretty(&masked).map_err(|e| PolyvoxError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Commented template for `polyvox config init`.
    pub fn dump_template() -> String {
        let mut out = String::from(
            "# polyvox configuration\n\
             # Credentials can also come from ASSEMBLYAI_API_KEY, ELEVENLABS_API_KEY\n\
             # and ELEVENLABS_VOICE_ID (environment or a .env file).\n\n",
        );
        out.push_str(&toml::to_string_pretty(&Config::default()).unwrap_or_default());
        out
    }

    /// Write the template to `path`, creating parent directories.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn write_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(PolyvoxError::Other(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::dump_template())?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/polyvox/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("polyvox")
            .join("config.toml")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}
