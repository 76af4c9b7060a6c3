//! Garbage bookkeeping: combo and back-to-back streaks plus the per-clear
//! attack value.

use crate::config::AttackConfig;
use serde::{Deserialize, Serialize};
use stacker_core::SpinType;

/// Streak counters carried from one placement to the next
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreState {
    /// Consecutive clearing placements so far
    pub combo: u8,
    /// Consecutive hard clears (quad or any spin clear) so far
    pub b2b: u8,
}

fn base_attack(lines: u8, spin: SpinType, config: &AttackConfig) -> u32 {
    let garbage = match spin {
        SpinType::Full => config.tspin_garbage[(lines as usize).min(3)],
        SpinType::Mini => config.mini_garbage[(lines as usize).min(2)],
        SpinType::None => config.line_garbage[(lines as usize).min(4)],
    };
    garbage as u32
}

fn is_hard_clear(lines: u8, spin: SpinType) -> bool {
    lines >= 4 || spin != SpinType::None
}

impl ScoreState {
    /// Update the streaks for one placement and return the garbage it sends
    pub fn register(
        &mut self,
        lines: u8,
        spin: SpinType,
        perfect_clear: bool,
        config: &AttackConfig,
    ) -> u32 {
        if lines == 0 {
            self.combo = 0;
            return 0;
        }

        let mut garbage = base_attack(lines, spin, config);

        garbage += config.combo_table.bonus(self.combo) as u32;
        self.combo = self.combo.saturating_add(1);

        if is_hard_clear(lines, spin) {
            if self.b2b > 0 {
                garbage += config.b2b_bonus as u32;
            }
            self.b2b = self.b2b.saturating_add(1);
        } else {
            self.b2b = 0;
        }

        if perfect_clear {
            garbage += config.pc_garbage as u32;
        }

        garbage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AttackConfig {
        AttackConfig::guideline()
    }

    #[test]
    fn test_single_sends_nothing() {
        let mut score = ScoreState::default();
        assert_eq!(score.register(1, SpinType::None, false, &cfg()), 0);
        assert_eq!(score.combo, 1);
        assert_eq!(score.b2b, 0);
    }

    #[test]
    fn test_quad_then_quad_gets_b2b() {
        let mut score = ScoreState::default();
        assert_eq!(score.register(4, SpinType::None, false, &cfg()), 4);
        // combo bonus 1 + b2b 1
        assert_eq!(score.register(4, SpinType::None, false, &cfg()), 6);
        assert_eq!(score.b2b, 2);
    }

    #[test]
    fn test_soft_clear_breaks_b2b() {
        let mut score = ScoreState::default();
        score.register(2, SpinType::Full, false, &cfg());
        assert_eq!(score.b2b, 1);
        score.register(1, SpinType::None, false, &cfg());
        assert_eq!(score.b2b, 0);
    }

    #[test]
    fn test_no_clear_resets_combo_keeps_b2b() {
        let mut score = ScoreState { combo: 5, b2b: 3 };
        assert_eq!(score.register(0, SpinType::None, false, &cfg()), 0);
        assert_eq!(score, ScoreState { combo: 0, b2b: 3 });
    }

    #[test]
    fn test_tspin_tables() {
        let mut score = ScoreState::default();
        assert_eq!(score.register(3, SpinType::Full, false, &cfg()), 6);
        let mut score = ScoreState::default();
        assert_eq!(score.register(2, SpinType::Mini, false, &cfg()), 1);
    }

    #[test]
    fn test_perfect_clear_bonus() {
        let mut score = ScoreState::default();
        assert_eq!(score.register(4, SpinType::None, true, &cfg()), 14);
    }
}
