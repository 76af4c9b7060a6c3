//! Value caches keyed by Zobrist hashes. Collisions are not chained: two
//! states sharing a key share a value.

use rustc_hash::FxHashMap;
use stacker_engine::zobrist::{board_hash, mix, slot_key};
use stacker_engine::BoardState;

#[derive(Debug, Default)]
pub struct SearchCache {
    /// Subtree values: position, queue window, remaining plies, garbage
    /// carried in and the weight of garbage sent below
    placements: FxHashMap<u64, f32>,
    /// Evaluator output: board and garbage
    terminals: FxHashMap<u64, f32>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything once either table has grown past `capacity`
    pub fn trim(&mut self, capacity: usize) -> bool {
        if self.placements.len() > capacity || self.terminals.len() > capacity {
            self.clear();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.placements.clear();
        self.terminals.clear();
    }

    pub fn len(&self) -> usize {
        self.placements.len() + self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn placement(&self, key: u64) -> Option<f32> {
        self.placements.get(&key).copied()
    }

    #[inline]
    pub fn store_placement(&mut self, key: u64, value: f32) {
        self.placements.insert(key, value);
    }

    #[inline]
    pub fn terminal(&self, key: u64) -> Option<f32> {
        self.terminals.get(&key).copied()
    }

    #[inline]
    pub fn store_terminal(&mut self, key: u64, value: f32) {
        self.terminals.insert(key, value);
    }
}

pub fn terminal_key(state: &BoardState, garbage: f32) -> u64 {
    mix(board_hash(state.mask()), garbage.to_bits() as u64)
}

/// Key of a subtree: board, current, hold, the next `window` previews,
/// remaining plies, combo/B2B, the garbage carried in and the weight
/// applied to garbage sent from this node down
pub fn node_key(state: &BoardState, window: usize, depth: u32, garbage: f32, weight: f32) -> u64 {
    let mut key = board_hash(state.mask());
    key ^= slot_key(0, state.current());
    key ^= slot_key(1, state.hold_piece());
    for (i, &kind) in state.queue().iter().take(window).enumerate() {
        key ^= slot_key(2 + i, Some(kind));
    }
    let score = state.score();
    key = mix(key, depth as u64);
    key = mix(key, ((score.combo as u64) << 8) | score.b2b as u64);
    key = mix(key, state.hold_used() as u64);
    key = mix(key, garbage.to_bits() as u64);
    mix(key, weight.to_bits() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacker_core::{BoardMask, PieceKind};

    fn state(rows: &[u16], queue: &[PieceKind]) -> BoardState {
        BoardState::from_parts(BoardMask::from_rows(rows), Some(PieceKind::T), None, queue)
    }

    #[test]
    fn test_node_key_sees_queue_window() {
        let a = state(&[0x1FF], &[PieceKind::I, PieceKind::O, PieceKind::S]);
        let b = state(&[0x1FF], &[PieceKind::I, PieceKind::O, PieceKind::Z]);
        assert_ne!(node_key(&a, 3, 2, 0.0, 0.9), node_key(&b, 3, 2, 0.0, 0.9));
        // beyond the window the difference is invisible
        assert_eq!(node_key(&a, 2, 2, 0.0, 0.9), node_key(&b, 2, 2, 0.0, 0.9));
    }

    #[test]
    fn test_node_key_sees_depth_and_garbage() {
        let s = state(&[0x1FF], &[PieceKind::I]);
        assert_ne!(node_key(&s, 1, 1, 0.0, 0.9), node_key(&s, 1, 2, 0.0, 0.9));
        assert_ne!(node_key(&s, 1, 1, 0.0, 0.9), node_key(&s, 1, 1, 0.9, 0.9));
    }

    #[test]
    fn test_node_key_sees_garbage_weight() {
        // same position reached one ply apart sends garbage at different weights
        let s = state(&[0x1FF], &[PieceKind::I]);
        assert_ne!(node_key(&s, 1, 1, 0.0, 0.9), node_key(&s, 1, 1, 0.0, 0.81));
        assert_eq!(node_key(&s, 1, 1, 0.0, 0.81), node_key(&s, 1, 1, 0.0, 0.81));
    }

    #[test]
    fn test_terminal_key_ignores_pieces() {
        let a = BoardState::from_parts(BoardMask::from_rows(&[0x0F0]), Some(PieceKind::T), None, &[]);
        let b = BoardState::from_parts(BoardMask::from_rows(&[0x0F0]), Some(PieceKind::L), None, &[]);
        assert_eq!(terminal_key(&a, 1.0), terminal_key(&b, 1.0));
        assert_ne!(terminal_key(&a, 1.0), terminal_key(&a, 2.0));
    }

    #[test]
    fn test_trim_over_capacity() {
        let mut cache = SearchCache::new();
        for key in 0..10 {
            cache.store_terminal(key, key as f32);
        }
        assert!(!cache.trim(10));
        assert_eq!(cache.terminal(3), Some(3.0));
        assert!(cache.trim(9));
        assert!(cache.is_empty());
    }
}
