//! Garbage tables used by the score tracker.

use serde::{Deserialize, Serialize};

pub const CLASSIC_COMBO_TABLE: [u8; 11] = [0, 1, 1, 2, 2, 3, 3, 4, 4, 4, 5];
pub const MODERN_COMBO_TABLE: [u8; 13] = [0, 1, 1, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboTable {
    Classic,
    Modern,
    None,
}

impl ComboTable {
    /// Bonus for a clear made with `streak` consecutive clears before it
    pub fn bonus(self, streak: u8) -> u8 {
        let table: &[u8] = match self {
            ComboTable::Classic => &CLASSIC_COMBO_TABLE,
            ComboTable::Modern => &MODERN_COMBO_TABLE,
            ComboTable::None => return 0,
        };
        table[(streak as usize).min(table.len() - 1)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    /// Indexed by lines cleared (0..=4)
    pub line_garbage: [u8; 5],
    /// T-spin full, indexed by lines cleared (0..=3)
    pub tspin_garbage: [u8; 4],
    /// T-spin mini, indexed by lines cleared (0..=2)
    pub mini_garbage: [u8; 3],
    pub combo_table: ComboTable,
    pub b2b_bonus: u8,
    pub pc_garbage: u8,
}

impl AttackConfig {
    pub fn guideline() -> Self {
        Self {
            line_garbage: [0, 0, 1, 2, 4],
            tspin_garbage: [0, 2, 4, 6],
            mini_garbage: [0, 0, 1],
            combo_table: ComboTable::Classic,
            b2b_bonus: 1,
            pc_garbage: 10,
        }
    }

    pub fn modern() -> Self {
        Self {
            combo_table: ComboTable::Modern,
            ..Self::guideline()
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self::guideline()
    }
}
