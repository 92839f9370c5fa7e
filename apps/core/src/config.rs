//! Runtime configuration.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file) and are validated once at startup.

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_TURN_TIMEOUT_MS: u64 = 5_000;

pub const MODEL_FILENAME: &str = "model.json";
pub const WORDS_FILENAME: &str = "words.json";
pub const CLASSES_FILENAME: &str = "classes.json";
pub const INTENTS_FILENAME: &str = "intents.json";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Everything the binary needs to know before loading artifacts.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    /// Root data folder; artifact paths default to `<data_dir>/models/*`.
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    pub words_path: PathBuf,
    pub classes_path: PathBuf,
    pub intents_path: PathBuf,
    /// Optional list of known base forms for the lemmatizer.
    pub lexicon_path: Option<PathBuf>,
    /// Optional `[form, lemma]` pairs merged over the built-in irregular plurals.
    pub exceptions_path: Option<PathBuf>,
    /// Base URL of the web search opened by `search <query>`.
    #[validate(url)]
    pub search_url: String,
    /// Upper bound on a single turn, in milliseconds.
    #[validate(range(min = 1, max = 60000))]
    pub turn_timeout_ms: u64,
    pub log_format: LogFormat,
    /// Fixed seed for response selection; random when absent.
    pub rng_seed: Option<u64>,
}

impl AppConfig {
    /// Default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let models_dir = data_dir.join("models");
        Self {
            model_path: models_dir.join(MODEL_FILENAME),
            words_path: models_dir.join(WORDS_FILENAME),
            classes_path: models_dir.join(CLASSES_FILENAME),
            intents_path: models_dir.join(INTENTS_FILENAME),
            lexicon_path: None,
            exceptions_path: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            turn_timeout_ms: DEFAULT_TURN_TIMEOUT_MS,
            log_format: LogFormat::default(),
            rng_seed: None,
            data_dir,
        }
    }

    /// Reads `INTENTBOT_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();

        let data_dir = var("INTENTBOT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(PortablePathManager::data_dir);
        let mut config = Self::with_data_dir(data_dir);

        if let Some(path) = var("INTENTBOT_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = var("INTENTBOT_WORDS_PATH") {
            config.words_path = PathBuf::from(path);
        }
        if let Some(path) = var("INTENTBOT_CLASSES_PATH") {
            config.classes_path = PathBuf::from(path);
        }
        if let Some(path) = var("INTENTBOT_INTENTS_PATH") {
            config.intents_path = PathBuf::from(path);
        }
        config.lexicon_path = var("INTENTBOT_LEXICON_PATH").map(PathBuf::from);
        config.exceptions_path = var("INTENTBOT_EXCEPTIONS_PATH").map(PathBuf::from);
        if let Some(url) = var("INTENTBOT_SEARCH_URL") {
            config.search_url = url;
        }
        if let Some(ms) = var("INTENTBOT_TURN_TIMEOUT_MS") {
            config.turn_timeout_ms = ms.trim().parse()?;
        }
        if let Some(format) = var("INTENTBOT_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        if let Some(seed) = var("INTENTBOT_RNG_SEED") {
            config.rng_seed = Some(seed.trim().parse()?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Transcripts are written next to the data folder.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.data_dir.join("transcripts")
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
