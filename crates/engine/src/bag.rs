//! Seeded 7-bag randomizer feeding the preview queue. The same seed always
//! yields the same piece sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use stacker_core::PieceKind;

/// Seeded 7-bag: every run of seven pieces is a permutation of all kinds
#[derive(Clone, Debug)]
pub struct SevenBag {
    rng: StdRng,
    pieces: Vec<PieceKind>,
}

impl SevenBag {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            pieces: Vec::with_capacity(PieceKind::ALL.len()),
        }
    }

    fn refill(&mut self) {
        self.pieces.extend_from_slice(&PieceKind::ALL);
        self.pieces.shuffle(&mut self.rng);
    }

    pub fn next_piece(&mut self) -> PieceKind {
        if self.pieces.is_empty() {
            self.refill();
        }
        self.pieces.pop().unwrap_or(PieceKind::T)
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> usize {
        self.pieces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bag_is_a_permutation() {
        let mut bag = SevenBag::new(7);
        for _ in 0..5 {
            let mut seen: Vec<PieceKind> = (0..7).map(|_| bag.next_piece()).collect();
            seen.sort();
            assert_eq!(seen, PieceKind::ALL.to_vec());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SevenBag::new(42);
        let mut b = SevenBag::new(42);
        for _ in 0..21 {
            assert_eq!(a.next_piece(), b.next_piece());
        }
    }

    #[test]
    fn test_remaining() {
        let mut bag = SevenBag::new(1);
        assert_eq!(bag.remaining(), 0);
        bag.next_piece();
        assert_eq!(bag.remaining(), 6);
    }
}
