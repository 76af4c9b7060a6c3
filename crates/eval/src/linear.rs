//! Hand-tuned linear evaluator.

use serde::{Deserialize, Serialize};

use crate::features::{Features, FEATURE_COUNT};
use crate::Evaluator;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearEvaluator {
    pub height: f32,
    pub caves: f32,
    pub pillars: f32,
    pub row_transitions: f32,
    pub column_transitions: f32,
    pub garbage: f32,
}

impl Default for LinearEvaluator {
    fn default() -> Self {
        Self {
            height: -0.2,
            caves: -1.0,
            pillars: -0.5,
            row_transitions: -0.3,
            column_transitions: -0.3,
            garbage: 1.0,
        }
    }
}

impl LinearEvaluator {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn weights(&self) -> [f32; FEATURE_COUNT] {
        [
            self.height,
            self.caves,
            self.pillars,
            self.row_transitions,
            self.column_transitions,
            self.garbage,
        ]
    }
}

impl Evaluator for LinearEvaluator {
    fn evaluate(&self, features: &Features) -> f32 {
        self.weights()
            .iter()
            .zip(features.as_slice())
            .map(|(w, f)| w * f)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacker_core::BoardMask;

    #[test]
    fn test_empty_board_score() {
        let eval = LinearEvaluator::default();
        let f = Features::extract(&BoardMask::EMPTY, 0.0);
        // only the floor's column transitions contribute
        assert!((eval.evaluate(&f) - (-3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_is_rewarded() {
        let eval = LinearEvaluator::default();
        let mask = BoardMask::from_rows(&[0x1FF]);
        let quiet = eval.evaluate(&Features::extract(&mask, 0.0));
        let loud = eval.evaluate(&Features::extract(&mask, 4.0));
        assert!(loud > quiet);
    }

    #[test]
    fn test_holes_are_penalised() {
        let eval = LinearEvaluator::default();
        let flat = BoardMask::from_rows(&[0x3FE, 0x3FE]);
        let holed = BoardMask::from_rows(&[0x3FC, 0x3FE]);
        assert!(
            eval.evaluate(&Features::extract(&flat, 0.0))
                > eval.evaluate(&Features::extract(&holed, 0.0))
        );
    }

    #[test]
    fn test_partial_json() {
        let eval = LinearEvaluator::from_json(r#"{"caves": -4.0}"#).unwrap();
        assert_eq!(eval.caves, -4.0);
        assert_eq!(eval.garbage, 1.0);
    }
}
