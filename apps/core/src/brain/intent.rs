//! Intent resolution: turns raw class scores into a ranked list of plausible intents.

use super::classifier::ProbabilityVector;
use super::vocabulary::Classes;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Minimum probability an intent must exceed to be kept.
pub const INTENT_THRESHOLD: f32 = 0.25;

/// An intent tag with the model's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIntent {
    pub tag: String,
    pub probability: f32,
}

impl fmt::Display for RankedIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.tag, self.probability)
    }
}

/// Filters and orders class scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentResolver;

impl IntentResolver {
    pub fn new() -> Self {
        Self
    }

    /// Keeps classes scoring strictly above the threshold, highest first.
    ///
    /// Equal scores keep their class order. An empty result is a normal outcome.
    pub fn resolve(
        &self,
        probabilities: &ProbabilityVector,
        classes: &Classes,
    ) -> Vec<RankedIntent> {
        let mut ranked: Vec<RankedIntent> = classes
            .tags()
            .iter()
            .zip(probabilities.values())
            .filter(|(_, p)| **p > INTENT_THRESHOLD)
            .map(|(tag, p)| RankedIntent {
                tag: tag.clone(),
                probability: *p,
            })
            .collect();

        // sort_by is stable: ties stay in class order.
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(tags: &[&str]) -> Classes {
        Classes::new(tags.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn tags(ranked: &[RankedIntent]) -> Vec<&str> {
        ranked.iter().map(|r| r.tag.as_str()).collect()
    }

    #[test]
    fn test_filters_at_or_below_threshold() {
        let classes = classes(&["a", "b", "c", "d"]);
        let probs = ProbabilityVector::new(vec![0.25, 0.26, 0.1, 0.39]);
        let ranked = IntentResolver::new().resolve(&probs, &classes);
        assert_eq!(tags(&ranked), vec!["d", "b"]);
        assert!(ranked.iter().all(|r| r.probability > INTENT_THRESHOLD));
    }

    #[test]
    fn test_sorted_descending() {
        let classes = classes(&["a", "b", "c"]);
        let probs = ProbabilityVector::new(vec![0.3, 0.9, 0.5]);
        let ranked = IntentResolver::new().resolve(&probs, &classes);
        assert_eq!(tags(&ranked), vec!["b", "c", "a"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_ties_keep_class_order() {
        let classes = classes(&["first", "second", "third", "fourth"]);
        let probs = ProbabilityVector::new(vec![0.3, 0.4, 0.3, 0.4]);
        let ranked = IntentResolver::new().resolve(&probs, &classes);
        assert_eq!(tags(&ranked), vec!["second", "fourth", "first", "third"]);
    }

    #[test]
    fn test_empty_when_nothing_confident() {
        let classes = classes(&["a", "b", "c", "d"]);
        let probs = ProbabilityVector::new(vec![0.25; 4]);
        assert!(IntentResolver::new().resolve(&probs, &classes).is_empty());
    }

    #[test]
    fn test_display() {
        let ranked = RankedIntent {
            tag: "flu".to_string(),
            probability: 0.876,
        };
        assert_eq!(ranked.to_string(), "flu (0.88)");
    }
}
