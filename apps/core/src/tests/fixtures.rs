//! Shared test fixtures.
//!
//! The fixture model is a single softmax layer where each vocabulary word
//! votes for exactly one class. With four classes, an utterance with no known
//! words scores 0.25 everywhere and therefore resolves to no intent.

use crate::brain::{
    Activation, ChatbotArtifacts, Classes, Clock, DenseLayer, DenseNetwork, DialogueOrchestrator,
    Lemmatizer, RandomSource, ResponseRepository, RngSource, Vocabulary,
};
use crate::config::AppConfig;
use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const VOCAB: [&str; 7] = ["hello", "hi", "flu", "symptom", "fever", "thanks", "mystery"];
pub const CLASSES: [&str; 4] = ["greeting", "flu", "thanks", "orphan"];

/// Class each vocabulary word votes for.
const WORD_CLASS: [usize; 7] = [0, 0, 1, 1, 1, 2, 3];
const VOTE_WEIGHT: f32 = 6.0;

pub const GREETING_RESPONSES: [&str; 2] = ["Hello!", "Hi there, how can I help?"];
pub const FLU_RESPONSE: &str = "Flu symptoms include fever, cough and fatigue.";
pub const THANKS_RESPONSE: &str = "You're welcome!";

pub const INTENTS_JSON: &str = r#"{
  "intents": [
    {
      "tag": "greeting",
      "patterns": ["Hi", "Hello"],
      "responses": ["Hello!", "Hi there, how can I help?"]
    },
    {
      "tag": "flu",
      "patterns": ["What are flu symptoms?"],
      "responses": ["Flu symptoms include fever, cough and fatigue."]
    },
    {"tag": "thanks", "patterns": ["Thanks"], "responses": ["You're welcome!"]}
  ]
}"#;

pub fn vocabulary() -> Vocabulary {
    Vocabulary::new(VOCAB.iter().map(|s| s.to_string()).collect()).unwrap()
}

pub fn classes() -> Classes {
    Classes::new(CLASSES.iter().map(|s| s.to_string()).collect()).unwrap()
}

pub fn network() -> DenseNetwork {
    let weights = WORD_CLASS
        .iter()
        .map(|&class| {
            (0..CLASSES.len())
                .map(|j| if j == class { VOTE_WEIGHT } else { 0.0 })
                .collect()
        })
        .collect();
    DenseNetwork::new(
        VOCAB.len(),
        vec![DenseLayer {
            weights,
            bias: vec![0.0; CLASSES.len()],
            activation: Activation::Softmax,
        }],
    )
    .unwrap()
}

pub fn responses() -> ResponseRepository {
    ResponseRepository::from_json_str(INTENTS_JSON).unwrap()
}

pub fn artifacts() -> Arc<ChatbotArtifacts> {
    Arc::new(
        ChatbotArtifacts::from_parts(
            vocabulary(),
            classes(),
            Arc::new(network()),
            responses(),
            Lemmatizer::new(),
        )
        .unwrap(),
    )
}

/// Always picks the first candidate.
pub struct FirstChoice;

impl RandomSource for FirstChoice {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}

/// Clock frozen at a given instant.
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self(Local.with_ymd_and_hms(2026, 1, 15, hour, minute, second).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

pub fn orchestrator_with(rng: Box<dyn RandomSource>) -> DialogueOrchestrator {
    DialogueOrchestrator::new(artifacts(), rng, Box::new(FixedClock::at(9, 5, 7)))
}

pub fn orchestrator() -> DialogueOrchestrator {
    orchestrator_with(Box::new(FirstChoice))
}

pub fn seeded_orchestrator(seed: u64) -> DialogueOrchestrator {
    orchestrator_with(Box::new(RngSource::seeded(seed)))
}

/// Writes all artifacts under `<dir>/models` and returns a matching config.
pub fn write_artifacts(dir: &Path) -> AppConfig {
    let config = AppConfig::with_data_dir(dir.to_path_buf());
    fs::create_dir_all(dir.join("models")).unwrap();
    fs::write(&config.words_path, serde_json::to_string(&VOCAB).unwrap()).unwrap();
    fs::write(&config.classes_path, serde_json::to_string(&CLASSES).unwrap()).unwrap();
    fs::write(&config.model_path, serde_json::to_string(&network()).unwrap()).unwrap();
    fs::write(&config.intents_path, INTENTS_JSON).unwrap();
    config
}
