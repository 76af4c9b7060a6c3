//! stacker-eval - board evaluation.
//!
//! Features are extracted from the board mask alone; an [`Evaluator`] turns
//! them into a scalar where higher is better for the player.

pub mod features;
pub mod linear;
pub mod network;

pub use features::{Features, FEATURE_COUNT};
pub use linear::LinearEvaluator;
pub use network::{Layer, Network, NetworkError};

/// Scores a feature vector. Must be pure: equal features give equal values.
pub trait Evaluator {
    fn evaluate(&self, features: &Features) -> f32;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, features: &Features) -> f32 {
        (**self).evaluate(features)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&self, features: &Features) -> f32 {
        (**self).evaluate(features)
    }
}
