use std::time::Duration;

use serde::{Deserialize, Serialize};
use stacker_engine::zobrist::PIECE_SLOTS;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("discount must be in (0, 1], got {0}")]
    Discount(f32),
    #[error("threshold band is empty: min {min} > max {max}")]
    ThresholdBand { min: f32, max: f32 },
    #[error("cache_depth {0} exceeds the {} hashed preview slots", PIECE_SLOTS - 2)]
    CacheDepth(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    // Time and depth
    pub time_budget_ms: u64,
    pub max_depth: u32,
    /// Weight applied per ply to garbage sent further down the path
    pub discount: f32,

    // Pruning threshold, compared against (value - parent value)
    pub threshold: f32,
    pub threshold_min: f32,
    pub threshold_max: f32,
    pub spare_gain: f32,
    pub shortfall_gain: f32,
    pub target_depth: u32,

    // Caches
    pub cache_capacity: usize,
    pub cache_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 100,
            max_depth: 6,
            discount: 0.9,

            threshold: -4.0,
            threshold_min: -12.0,
            threshold_max: -0.25,
            spare_gain: 0.5,
            shortfall_gain: 0.25,
            target_depth: 4,

            cache_capacity: 1 << 20,
            cache_depth: 3,
        }
    }
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(ConfigError::Discount(self.discount));
        }
        if self.threshold_min > self.threshold_max {
            return Err(ConfigError::ThresholdBand {
                min: self.threshold_min,
                max: self.threshold_max,
            });
        }
        if self.cache_depth > PIECE_SLOTS - 2 {
            return Err(ConfigError::CacheDepth(self.cache_depth));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Threshold pinned to one value; adaptation becomes a no-op
    pub fn with_fixed_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self.threshold_min = threshold;
        self.threshold_max = threshold;
        self
    }
}
