//! Ordered term lists frozen at load time: the feature vocabulary and the
//! intent classes. Positions are significant and must match the model.

use crate::error::AppError;
use std::collections::HashMap;

/// Ordered, duplicate-free list of strings with O(1) position lookup.
#[derive(Debug, Clone)]
struct OrderedTerms {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl OrderedTerms {
    fn new(kind: &str, terms: Vec<String>) -> Result<Self, AppError> {
        if terms.is_empty() {
            return Err(AppError::Config(format!("{} list is empty", kind)));
        }

        let mut positions = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if positions.insert(term.clone(), i).is_some() {
                return Err(AppError::Config(format!(
                    "Duplicate {} entry '{}' at position {}",
                    kind.to_lowercase(),
                    term,
                    i
                )));
            }
        }

        Ok(Self { terms, positions })
    }
}

/// The fixed feature vocabulary (`V` normalized words).
#[derive(Debug, Clone)]
pub struct Vocabulary {
    inner: OrderedTerms,
}

impl Vocabulary {
    pub fn new(words: Vec<String>) -> Result<Self, AppError> {
        Ok(Self {
            inner: OrderedTerms::new("Vocabulary", words)?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.terms.len()
    }

    pub fn position(&self, word: &str) -> Option<usize> {
        self.inner.positions.get(word).copied()
    }

    pub fn words(&self) -> &[String] {
        &self.inner.terms
    }
}

/// The fixed, ordered intent tags (`C` entries); index `i` is model output `i`.
#[derive(Debug, Clone)]
pub struct Classes {
    inner: OrderedTerms,
}

impl Classes {
    pub fn new(tags: Vec<String>) -> Result<Self, AppError> {
        Ok(Self {
            inner: OrderedTerms::new("Classes", tags)?,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.terms.len()
    }

    #[cfg(test)]
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        self.inner.positions.get(tag).copied()
    }

    pub fn tags(&self) -> &[String] {
        &self.inner.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_vocabulary_positions_follow_input_order() {
        let vocab = Vocabulary::new(strings(&["fever", "cough", "flu"])).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.position("fever"), Some(0));
        assert_eq!(vocab.position("flu"), Some(2));
        assert_eq!(vocab.position("cold"), None);
        assert_eq!(vocab.words()[1], "cough");
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = Vocabulary::new(strings(&["a", "b", "a"])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("'a'"));

        assert!(Classes::new(strings(&["greeting", "greeting"])).is_err());
    }

    #[test]
    fn test_empty_lists_rejected() {
        assert!(Vocabulary::new(vec![]).is_err());
        assert!(Classes::new(vec![]).is_err());
    }

    #[test]
    fn test_classes_lookup() {
        let classes = Classes::new(strings(&["greeting", "flu", "goodbye"])).unwrap();
        assert_eq!(classes.tags()[1], "flu");
        assert_eq!(classes.index_of("flu"), Some(1));
        assert_eq!(classes.index_of("cold"), None);
        assert_eq!(classes.index_of("goodbye"), Some(2));
    }
}
