//! Bag-of-words vectorization against the fixed vocabulary.

use super::vocabulary::Vocabulary;

/// Binary presence vector, one entry per vocabulary position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    bits: Vec<u8>,
}

impl FeatureVector {
    /// All-zero vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self { bits: vec![0; len] }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    /// Number of vocabulary words present.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Numeric input for the model.
    pub fn to_input(&self) -> Vec<f32> {
        self.bits.iter().map(|&b| f32::from(b)).collect()
    }
}

/// Sets bit `i` iff `vocabulary[i]` occurs anywhere in `tokens`.
///
/// Tokens outside the vocabulary are ignored; repeated tokens still set a single bit.
pub fn bag_of_words<S: AsRef<str>>(tokens: &[S], vocabulary: &Vocabulary) -> FeatureVector {
    let mut vector = FeatureVector::zeros(vocabulary.len());
    for token in tokens {
        if let Some(i) = vocabulary.position(token.as_ref()) {
            vector.bits[i] = 1;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(
            ["fever", "cough", "flu", "symptom"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_presence_bits() {
        let vector = bag_of_words(&["flu", "symptom"], &vocab());
        assert_eq!(vector.bits.as_slice(), &[0, 0, 1, 1]);
        assert_eq!(vector.count_ones(), 2);
    }

    #[test]
    fn test_length_always_matches_vocabulary() {
        let vocabulary = vocab();
        for tokens in [vec![], vec!["zzz"], vec!["fever", "fever", "fever"]] {
            assert_eq!(bag_of_words(&tokens, &vocabulary).len(), vocabulary.len());
        }
    }

    #[test]
    fn test_unknown_tokens_ignored() {
        let vector = bag_of_words(&["hello", "world", "?"], &vocab());
        assert_eq!(vector.count_ones(), 0);
    }

    #[test]
    fn test_order_independent_and_idempotent() {
        let vocabulary = vocab();
        let a = bag_of_words(&["cough", "fever"], &vocabulary);
        let b = bag_of_words(&["fever", "cough", "cough"], &vocabulary);
        assert_eq!(a, b);
        assert_eq!(a, bag_of_words(&["cough", "fever"], &vocabulary));
    }

    #[test]
    fn test_to_input() {
        let vector = bag_of_words(&["fever"], &vocab());
        assert_eq!(vector.to_input(), vec![1.0, 0.0, 0.0, 0.0]);
    }
}
