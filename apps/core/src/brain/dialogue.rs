//! Dialogue orchestrator - one utterance in, one reply out.
//!
//! Cheap special-command checks run first; everything else goes through
//! normalize → vectorize → classify → resolve → select.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::artifacts::ChatbotArtifacts;
use super::intent::{IntentResolver, RankedIntent};
use super::responses::{RandomSource, ResponseOutcome, ResponseSelector};
use super::vectorizer::bag_of_words;
use crate::error::AppError;

pub const FAREWELL_RESPONSE: &str = "Goodbye! Have a great day!";
pub const INFERENCE_APOLOGY: &str =
    "I'm sorry, something went wrong while processing your message. Please try again.";

const FAREWELL_TRIGGERS: [&str; 3] = ["exit", "quit", "bye"];
const SEARCH_PREFIX: &str = "search ";
const TIME_TRIGGER: &str = "time";

/// Side effect the caller is expected to perform after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservedCommand {
    /// Regular classified reply.
    None,
    /// The user ended the conversation.
    Farewell,
    /// Open a web search for `query`.
    Search { query: String },
    /// The reply carries the current time.
    Time,
}

/// Phase of the per-turn state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Dispatching,
    SpecialCommand,
    Classifying,
    Responding,
}

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub command: ObservedCommand,
    /// Winning intent, when the turn went through classification and one passed the threshold.
    pub top_intent: Option<RankedIntent>,
}

impl Reply {
    fn command(text: String, command: ObservedCommand) -> Self {
        Self {
            text,
            command,
            top_intent: None,
        }
    }
}

/// Source of wall-clock time for the `time` command.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub struct DialogueOrchestrator {
    artifacts: Arc<ChatbotArtifacts>,
    resolver: IntentResolver,
    selector: ResponseSelector,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    state: TurnState,
}

impl DialogueOrchestrator {
    pub fn new(
        artifacts: Arc<ChatbotArtifacts>,
        rng: Box<dyn RandomSource>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            artifacts,
            resolver: IntentResolver::new(),
            selector: ResponseSelector::new(),
            rng,
            clock,
            state: TurnState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Handles one utterance. Never fails: errors become an apology reply.
    pub fn respond(&mut self, utterance: &str) -> Reply {
        let start = Instant::now();
        self.transition(TurnState::Dispatching);

        let reply = match self.dispatch_special(utterance) {
            Some(reply) => {
                self.transition(TurnState::SpecialCommand);
                reply
            }
            None => {
                self.transition(TurnState::Classifying);
                self.classified_reply(utterance)
            }
        };

        self.transition(TurnState::Responding);
        info!(
            command = ?reply.command,
            intent = reply.top_intent.as_ref().map(|i| i.tag.as_str()).unwrap_or("-"),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Turn answered"
        );
        self.transition(TurnState::Idle);
        reply
    }

    /// Normalize → vectorize → classify → resolve.
    pub fn classify(&self, utterance: &str) -> Result<Vec<RankedIntent>, AppError> {
        let artifacts = &self.artifacts;
        let tokens = artifacts.normalizer.normalize(utterance);
        let features = bag_of_words(&tokens, &artifacts.vocabulary);
        debug!(
            tokens = tokens.len(),
            known_words = features.count_ones(),
            "Utterance vectorized"
        );

        let probabilities = artifacts.classifier.predict(&features)?;
        Ok(self.resolver.resolve(&probabilities, &artifacts.classes))
    }

    fn dispatch_special(&self, utterance: &str) -> Option<Reply> {
        let lowered = utterance.to_lowercase();

        if FAREWELL_TRIGGERS.contains(&lowered.as_str()) {
            return Some(Reply::command(
                FAREWELL_RESPONSE.to_string(),
                ObservedCommand::Farewell,
            ));
        }

        if let Some(query) = strip_prefix_ignore_ascii_case(utterance, SEARCH_PREFIX) {
            return Some(Reply::command(
                format!("I've opened a web search for '{}'.", query),
                ObservedCommand::Search {
                    query: query.to_string(),
                },
            ));
        }

        if lowered == TIME_TRIGGER {
            let now = self.clock.now();
            return Some(Reply::command(
                format!("The current time is {}.", now.format("%H:%M:%S")),
                ObservedCommand::Time,
            ));
        }

        None
    }

    fn classified_reply(&mut self, utterance: &str) -> Reply {
        let ranked = match self.classify(utterance) {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("Classification failed for a turn: {}", e);
                return Reply::command(INFERENCE_APOLOGY.to_string(), ObservedCommand::None);
            }
        };

        let outcome = self
            .selector
            .select(&self.artifacts.responses, &ranked, self.rng.as_mut());
        match &outcome {
            ResponseOutcome::NoConfidentIntent => debug!("No intent above threshold"),
            ResponseOutcome::UnmappedIntent { tag } => debug!("Intent '{}' has no responses", tag),
            ResponseOutcome::Matched { .. } => {}
        }

        Reply {
            text: outcome.into_text(),
            command: ObservedCommand::None,
            top_intent: ranked.into_iter().next(),
        }
    }

    fn transition(&mut self, next: TurnState) {
        debug!(from = ?self.state, to = ?next, "turn state");
        self.state = next;
    }
}

fn strip_prefix_ignore_ascii_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}
