//! Intent classifier: feature vector in, per-class confidence out.

use super::model::InferenceBackend;
use super::vectorizer::FeatureVector;
use super::vocabulary::{Classes, Vocabulary};
use crate::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Per-class confidence scores, index-aligned with [`Classes`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector {
    values: Vec<f32>,
}

impl ProbabilityVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Wraps an inference backend whose dimensions were checked against the
/// vocabulary and classes it is paired with.
#[derive(Clone)]
pub struct Classifier {
    backend: Arc<dyn InferenceBackend>,
    input_dim: usize,
    output_dim: usize,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("input_dim", &self.input_dim)
            .field("output_dim", &self.output_dim)
            .finish()
    }
}

impl Classifier {
    /// Pairs a backend with its vocabulary and classes.
    ///
    /// Any dimension mismatch, or a probe inference that fails or returns the
    /// wrong shape, is a configuration error.
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        vocabulary: &Vocabulary,
        classes: &Classes,
    ) -> Result<Self, AppError> {
        if backend.input_dim() != vocabulary.len() {
            return Err(AppError::Config(format!(
                "Model expects {} input features but the vocabulary has {} words",
                backend.input_dim(),
                vocabulary.len()
            )));
        }
        if backend.output_dim() != classes.len() {
            return Err(AppError::Config(format!(
                "Model produces {} outputs but there are {} classes",
                backend.output_dim(),
                classes.len()
            )));
        }

        let classifier = Self {
            backend,
            input_dim: vocabulary.len(),
            output_dim: classes.len(),
        };

        classifier
            .predict(&FeatureVector::zeros(classifier.input_dim))
            .map_err(|e| AppError::Config(format!("Model probe failed: {}", e)))?;

        Ok(classifier)
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<ProbabilityVector, AppError> {
        if features.len() != self.input_dim {
            return Err(AppError::Inference(format!(
                "Feature vector has {} entries, expected {}",
                features.len(),
                self.input_dim
            )));
        }

        let start = Instant::now();
        let output = self.backend.predict(&features.to_input())?;
        debug!(elapsed_us = start.elapsed().as_micros() as u64, "inference done");

        if output.len() != self.output_dim {
            return Err(AppError::Inference(format!(
                "Model returned {} scores, expected {}",
                output.len(),
                self.output_dim
            )));
        }
        if output.iter().any(|p| *p < 0.0 || !p.is_finite()) {
            return Err(AppError::Inference(
                "Model returned a negative or non-finite score".to_string(),
            ));
        }

        Ok(ProbabilityVector::new(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::vectorizer::bag_of_words;

    /// Backend returning a fixed vector, whatever the input.
    struct FixedBackend {
        input_dim: usize,
        declared_output: usize,
        output: Vec<f32>,
    }

    impl InferenceBackend for FixedBackend {
        fn input_dim(&self) -> usize {
            self.input_dim
        }
        fn output_dim(&self) -> usize {
            self.declared_output
        }
        fn predict(&self, _input: &[f32]) -> Result<Vec<f32>, AppError> {
            Ok(self.output.clone())
        }
    }

    fn vocab() -> Vocabulary {
        Vocabulary::new(vec!["fever".into(), "cough".into()]).unwrap()
    }

    fn classes() -> Classes {
        Classes::new(vec!["flu".into(), "cold".into(), "greeting".into()]).unwrap()
    }

    #[test]
    fn test_predict_returns_class_aligned_scores() {
        let backend = Arc::new(FixedBackend {
            input_dim: 2,
            declared_output: 3,
            output: vec![0.7, 0.2, 0.1],
        });
        let classifier = Classifier::new(backend, &vocab(), &classes()).unwrap();
        let probs = classifier
            .predict(&bag_of_words(&["fever"], &vocab()))
            .unwrap();
        assert_eq!(probs.values(), &[0.7, 0.2, 0.1]);
    }

    #[test]
    fn test_input_dimension_mismatch_is_config_error() {
        let backend = Arc::new(FixedBackend {
            input_dim: 5,
            declared_output: 3,
            output: vec![0.0; 3],
        });
        let err = Classifier::new(backend, &vocab(), &classes()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_output_dimension_mismatch_is_config_error() {
        let backend = Arc::new(FixedBackend {
            input_dim: 2,
            declared_output: 4,
            output: vec![0.0; 4],
        });
        assert!(Classifier::new(backend, &vocab(), &classes()).is_err());
    }

    #[test]
    fn test_lying_backend_caught_at_startup() {
        let backend = Arc::new(FixedBackend {
            input_dim: 2,
            declared_output: 3,
            output: vec![1.0],
        });
        let err = Classifier::new(backend, &vocab(), &classes()).unwrap_err();
        assert!(err.to_string().contains("probe"));
    }

    #[test]
    fn test_wrong_feature_length_is_inference_error() {
        let backend = Arc::new(FixedBackend {
            input_dim: 2,
            declared_output: 3,
            output: vec![0.3, 0.3, 0.4],
        });
        let classifier = Classifier::new(backend, &vocab(), &classes()).unwrap();
        let err = classifier.predict(&FeatureVector::zeros(7)).unwrap_err();
        assert!(matches!(err, AppError::Inference(_)));
    }
}
