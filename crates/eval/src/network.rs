//! Small feed-forward value network: tanh hidden layers, linear output.
//!
//! Weights are loaded from JSON of the form
//! `{"layers": [{"weights": [[..], ..], "biases": [..]}, ..]}` where
//! `weights[o][i]` connects input `i` to output `o`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::{Features, FEATURE_COUNT};
use crate::Evaluator;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid network json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network has no layers")]
    Empty,
    #[error("layer {layer}: expected {expected} inputs, found {found}")]
    Inputs {
        layer: usize,
        expected: usize,
        found: usize,
    },
    #[error("layer {layer}: {rows} weight rows but {biases} biases")]
    Biases {
        layer: usize,
        rows: usize,
        biases: usize,
    },
    #[error("output layer must have exactly one unit, found {0}")]
    Output(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

impl Layer {
    fn forward(&self, input: &[f32], out: &mut Vec<f32>, activate: bool) {
        out.clear();
        out.extend(self.weights.iter().zip(&self.biases).map(|(row, b)| {
            let z = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b;
            if activate {
                z.tanh()
            } else {
                z
            }
        }));
    }
}

#[derive(Serialize, Deserialize)]
struct RawNetwork {
    layers: Vec<Layer>,
}

/// Validated network; every layer's shape chains from the feature vector
/// down to a single output.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn new(layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::Empty);
        }
        let mut width = FEATURE_COUNT;
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(NetworkError::Biases {
                    layer: i,
                    rows: layer.weights.len(),
                    biases: layer.biases.len(),
                });
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                return Err(NetworkError::Inputs {
                    layer: i,
                    expected: width,
                    found: row.len(),
                });
            }
            width = layer.biases.len();
        }
        if width != 1 {
            return Err(NetworkError::Output(width));
        }
        Ok(Self { layers })
    }

    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        let raw: RawNetwork = serde_json::from_str(json)?;
        Self::new(raw.layers)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&RawNetwork {
            layers: self.layers.clone(),
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn forward(&self, input: &[f32]) -> f32 {
        let mut current = input.to_vec();
        let mut next = Vec::new();
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            layer.forward(&current, &mut next, i != last);
            std::mem::swap(&mut current, &mut next);
        }
        current.first().copied().unwrap_or(0.0)
    }
}

impl Evaluator for Network {
    fn evaluate(&self, features: &Features) -> f32 {
        self.forward(features.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_unit(weights: [f32; FEATURE_COUNT], bias: f32) -> Layer {
        Layer {
            weights: vec![weights.to_vec()],
            biases: vec![bias],
        }
    }

    #[test]
    fn test_output_layer_is_linear() {
        let net = Network::new(vec![single_unit([1.0, 2.0, 0.0, 0.0, 0.0, 0.0], 0.5)]).unwrap();
        let f = Features([3.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(net.evaluate(&f), 5.5);
    }

    #[test]
    fn test_hidden_layer_saturates() {
        let hidden = Layer {
            weights: vec![vec![100.0, 0.0, 0.0, 0.0, 0.0, 0.0]; 2],
            biases: vec![0.0, 0.0],
        };
        let output = Layer {
            weights: vec![vec![1.0, 1.0]],
            biases: vec![0.0],
        };
        let net = Network::new(vec![hidden, output]).unwrap();
        let value = net.forward(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((value - 2.0).abs() < 1e-4);
        let value = net.forward(&[-1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((value + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_json_round_trip() {
        let net = Network::new(vec![single_unit([0.1, -0.2, 0.3, -0.4, 0.5, -0.6], 1.0)]).unwrap();
        let parsed = Network::from_json(&net.to_json().unwrap()).unwrap();
        assert_eq!(parsed, net);
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(Network::new(vec![]), Err(NetworkError::Empty)));

        let narrow = Layer {
            weights: vec![vec![1.0; 3]],
            biases: vec![0.0],
        };
        assert!(matches!(
            Network::new(vec![narrow]),
            Err(NetworkError::Inputs { layer: 0, expected: 6, found: 3 })
        ));

        let wide = Layer {
            weights: vec![vec![1.0; FEATURE_COUNT]; 2],
            biases: vec![0.0; 2],
        };
        assert!(matches!(Network::new(vec![wide]), Err(NetworkError::Output(2))));

        let mismatched = Layer {
            weights: vec![vec![1.0; FEATURE_COUNT]],
            biases: vec![],
        };
        assert!(matches!(
            Network::new(vec![mismatched]),
            Err(NetworkError::Biases { .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Network::from_json("{\"layers\": 3}"),
            Err(NetworkError::Json(_))
        ));
    }
}
