//! Startup state: every trained artifact loaded once, cross-checked, and
//! shared read-only for the rest of the process.

use super::classifier::Classifier;
use super::model::{DenseNetwork, InferenceBackend};
use super::normalizer::{Lemmatizer, Normalizer};
use super::responses::ResponseRepository;
use super::vocabulary::{Classes, Vocabulary};
use crate::config::AppConfig;
use crate::error::AppError;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Immutable bundle handed by reference to every pipeline stage.
#[derive(Debug)]
pub struct ChatbotArtifacts {
    pub vocabulary: Vocabulary,
    pub classes: Classes,
    pub normalizer: Normalizer,
    pub classifier: Classifier,
    pub responses: ResponseRepository,
}

impl ChatbotArtifacts {
    /// Loads words, classes, model, intents corpus, and the optional lexicon and
    /// plural exceptions.
    ///
    /// Fails fast on any missing, corrupt or mismatched artifact.
    pub fn load(config: &AppConfig) -> Result<Self, AppError> {
        let start = Instant::now();

        let vocabulary = Vocabulary::new(load_string_list(&config.words_path, "vocabulary")?)?;
        let classes = Classes::new(load_string_list(&config.classes_path, "classes")?)?;
        let network = DenseNetwork::load(&config.model_path)?;
        let responses = ResponseRepository::load(&config.intents_path)?;

        let lexicon = match &config.lexicon_path {
            Some(path) => load_string_list(path, "lexicon")?,
            None => Vec::new(),
        };
        let mut lemmatizer = Lemmatizer::with_lexicon(lexicon);
        if let Some(path) = &config.exceptions_path {
            lemmatizer.extend_exceptions(load_exception_pairs(path)?);
        }

        let artifacts =
            Self::from_parts(vocabulary, classes, Arc::new(network), responses, lemmatizer)?;

        let lemmatizer = artifacts.normalizer.lemmatizer();
        info!(
            model_inputs = artifacts.classifier.input_dim(),
            model_outputs = artifacts.classifier.output_dim(),
            tags_with_responses = artifacts.responses.len(),
            lexicon = lemmatizer.lexicon_len(),
            exceptions = lemmatizer.exceptions_len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chatbot artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Assembles already-loaded parts. The vocabulary joins the lemmatizer lexicon.
    pub fn from_parts(
        vocabulary: Vocabulary,
        classes: Classes,
        backend: Arc<dyn InferenceBackend>,
        responses: ResponseRepository,
        mut lemmatizer: Lemmatizer,
    ) -> Result<Self, AppError> {
        let classifier = Classifier::new(backend, &vocabulary, &classes)?;
        lemmatizer.extend_lexicon(vocabulary.words().iter().cloned());

        for tag in classes.tags() {
            if responses.lookup(tag).is_empty() {
                warn!("Intent '{}' has no responses; it will get the fallback reply", tag);
            }
        }

        Ok(Self {
            normalizer: Normalizer::new(lemmatizer),
            vocabulary,
            classes,
            classifier,
            responses,
        })
    }
}

/// Reads a JSON array of strings.
pub fn load_string_list(path: &Path, kind: &str) -> Result<Vec<String>, AppError> {
    let json = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("Cannot read {} artifact {:?}: {}", kind, path, e)))?;
    serde_json::from_str(&json)
        .map_err(|e| AppError::Config(format!("Corrupt {} artifact {:?}: {}", kind, path, e)))
}

/// Reads a JSON array of `[form, lemma]` pairs.
pub fn load_exception_pairs(path: &Path) -> Result<Vec<(String, String)>, AppError> {
    let json = fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Cannot read exceptions artifact {:?}: {}", path, e))
    })?;
    serde_json::from_str(&json)
        .map_err(|e| AppError::Config(format!("Corrupt exceptions artifact {:?}: {}", path, e)))
}
