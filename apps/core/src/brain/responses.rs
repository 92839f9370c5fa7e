//! Pre-authored responses per intent tag, and the policy choosing one.

use super::intent::RankedIntent;
use crate::error::AppError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const NO_INTENT_FALLBACK: &str =
    "I'm not sure how to respond to that. Can you please rephrase your question?";
pub const UNMAPPED_INTENT_FALLBACK: &str =
    "I'm sorry, I don't have a specific response for that. Can you try asking something else?";

/// Injectable source of uniform choices.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Reproducible sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// One record of the intents corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    pub tag: String,
    /// Training utterances; unused at inference time.
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsFile {
    pub intents: Vec<IntentRecord>,
}

/// Tag → candidate responses, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ResponseRepository {
    responses: HashMap<String, Vec<String>>,
}

impl ResponseRepository {
    /// Records sharing a tag are merged in file order.
    pub fn from_records<I: IntoIterator<Item = IntentRecord>>(records: I) -> Self {
        let mut responses: HashMap<String, Vec<String>> = HashMap::new();
        for record in records {
            responses
                .entry(record.tag)
                .or_default()
                .extend(record.responses);
        }
        Self { responses }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let file: IntentsFile = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Corrupt intents corpus: {}", e)))?;
        Ok(Self::from_records(file.intents))
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read intents corpus {:?}: {}", path, e))
        })?;
        Self::from_json_str(&json)
    }

    /// Responses for `tag`; empty when the tag is unknown.
    pub fn lookup(&self, tag: &str) -> &[String] {
        self.responses.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Uniform pick among the responses for `tag`, `None` when there are none.
    pub fn select(&self, tag: &str, rng: &mut dyn RandomSource) -> Option<&str> {
        let candidates = self.lookup(tag);
        if candidates.is_empty() {
            return None;
        }
        let index = rng.pick(candidates.len()).min(candidates.len() - 1);
        Some(candidates[index].as_str())
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }
}

/// How a classified turn was answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Matched { tag: String, text: String },
    /// Nothing scored above the threshold.
    NoConfidentIntent,
    /// The top intent has no responses in the corpus.
    UnmappedIntent { tag: String },
}

impl ResponseOutcome {
    pub fn text(&self) -> &str {
        match self {
            ResponseOutcome::Matched { text, .. } => text,
            ResponseOutcome::NoConfidentIntent => NO_INTENT_FALLBACK,
            ResponseOutcome::UnmappedIntent { .. } => UNMAPPED_INTENT_FALLBACK,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ResponseOutcome::Matched { text, .. } => text,
            other => other.text().to_string(),
        }
    }
}

/// Answers from the top-ranked intent only.
///
/// Lower-ranked intents are left for alternative policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSelector;

impl ResponseSelector {
    pub fn new() -> Self {
        Self
    }

    pub fn select(
        &self,
        repository: &ResponseRepository,
        ranked: &[RankedIntent],
        rng: &mut dyn RandomSource,
    ) -> ResponseOutcome {
        let Some(top) = ranked.first() else {
            return ResponseOutcome::NoConfidentIntent;
        };

        match repository.select(&top.tag, rng) {
            Some(text) => ResponseOutcome::Matched {
                tag: top.tag.clone(),
                text: text.to_string(),
            },
            None => ResponseOutcome::UnmappedIntent {
                tag: top.tag.clone(),
            },
        }
    }
}
