//! Pre-trained model inference.
//!
//! The classifier only depends on [`InferenceBackend`]; [`DenseNetwork`] is the
//! bundled backend, a feed-forward network exported as JSON after training.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Narrow capability interface over any numeric inference engine.
pub trait InferenceBackend: Send + Sync {
    /// Expected input length (`V`).
    fn input_dim(&self) -> usize;

    /// Produced output length (`C`).
    fn output_dim(&self) -> usize;

    /// Runs one forward pass. Must not mutate shared state.
    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Softmax,
    Sigmoid,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(&self, values: &mut [f32]) {
        match self {
            Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Sigmoid => values
                .iter_mut()
                .for_each(|v| *v = 1.0 / (1.0 + (-*v).exp())),
            Activation::Tanh => values.iter_mut().for_each(|v| *v = v.tanh()),
            Activation::Linear => {}
            Activation::Softmax => {
                let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let mut sum = 0.0;
                for v in values.iter_mut() {
                    *v = (*v - max).exp();
                    sum += *v;
                }
                if sum > 0.0 {
                    values.iter_mut().for_each(|v| *v /= sum);
                }
            }
        }
    }
}

/// One fully connected layer. `weights[i][j]` connects input `i` to output `j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn input_dim(&self) -> usize {
        self.weights.len()
    }

    fn output_dim(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut output = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            if *x == 0.0 {
                continue;
            }
            for (o, w) in output.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        self.activation.apply(&mut output);
        output
    }
}

/// Feed-forward network loaded from `model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    pub input_dim: usize,
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Builds a network, checking that layer shapes chain from `input_dim`.
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self, AppError> {
        let network = Self { input_dim, layers };
        network.validate()?;
        Ok(network)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let network: DenseNetwork = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Corrupt model artifact: {}", e)))?;
        Self::new(network.input_dim, network.layers)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read model artifact {:?}: {}", path, e))
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.input_dim == 0 {
            return Err(AppError::Config("Model input dimension is zero".to_string()));
        }
        if self.layers.is_empty() {
            return Err(AppError::Config("Model has no layers".to_string()));
        }

        let mut expected = self.input_dim;
        for (n, layer) in self.layers.iter().enumerate() {
            if layer.input_dim() != expected {
                return Err(AppError::Config(format!(
                    "Layer {} expects {} inputs but previous layer produces {}",
                    n,
                    layer.input_dim(),
                    expected
                )));
            }
            if layer.output_dim() == 0 {
                return Err(AppError::Config(format!("Layer {} has no outputs", n)));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != layer.output_dim()) {
                return Err(AppError::Config(format!(
                    "Layer {} weight row {} has {} columns, bias has {}",
                    n,
                    row,
                    layer.weights[row].len(),
                    layer.output_dim()
                )));
            }
            expected = layer.output_dim();
        }
        Ok(())
    }
}

impl InferenceBackend for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_dim)
    }

    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, AppError> {
        if input.len() != self.input_dim {
            return Err(AppError::Inference(format!(
                "Input has {} features, model expects {}",
                input.len(),
                self.input_dim
            )));
        }

        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        if activations.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Inference("Model produced non-finite output".to_string()));
        }
        Ok(activations)
    }
}
