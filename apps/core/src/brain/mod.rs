//! # Brain Module
//!
//! Intent classification and response resolution for intentbot.
//! No LLM involved: a pre-trained feed-forward model scores a bag-of-words
//! vector and a pre-authored response is picked for the winning intent.
//!
//! ## Components
//! - `normalizer`: Treebank-style tokenization and noun lemmatization
//! - `vocabulary`: frozen word and class orderings
//! - `vectorizer`: binary bag-of-words features
//! - `model`: inference backend trait and the bundled dense network
//! - `classifier`: dimension-checked wrapper producing class scores
//! - `intent`: threshold filtering and ranking
//! - `responses`: response corpus and selection policy
//! - `artifacts`: one-time loading of all of the above
//! - `dialogue`: per-turn orchestrator

pub mod artifacts;
pub mod classifier;
pub mod dialogue;
pub mod intent;
pub mod model;
pub mod normalizer;
pub mod responses;
pub mod vectorizer;
pub mod vocabulary;

// Re-export main types for convenience
pub use artifacts::ChatbotArtifacts;
#[allow(unused_imports)]
pub use classifier::{Classifier, ProbabilityVector};
#[allow(unused_imports)]
pub use dialogue::{Clock, DialogueOrchestrator, ObservedCommand, Reply, SystemClock, TurnState};
#[allow(unused_imports)]
pub use intent::{IntentResolver, RankedIntent, INTENT_THRESHOLD};
#[allow(unused_imports)]
pub use model::{Activation, DenseLayer, DenseNetwork, InferenceBackend};
#[allow(unused_imports)]
pub use normalizer::{Lemmatizer, Normalizer};
#[allow(unused_imports)]
pub use responses::{RandomSource, ResponseRepository, ResponseSelector, RngSource};
#[allow(unused_imports)]
pub use vectorizer::{bag_of_words, FeatureVector};
#[allow(unused_imports)]
pub use vocabulary::{Classes, Vocabulary};
