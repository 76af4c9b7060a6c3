//! perft - placement-tree node counts for verifying landing enumeration and
//! the place / unplace pair

use rayon::prelude::*;

use crate::move_list::PlacementList;
use crate::movegen::generate_placements;
use crate::state::BoardState;

fn perft_inner(state: &mut BoardState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if state.topped_out() {
        return 0;
    }

    let mut list = PlacementList::new();
    generate_placements(state, &mut list);
    if depth == 1 {
        return list.len() as u64;
    }

    let mut nodes = 0u64;
    for placement in &list {
        if let Some(clears) = state.place_at(placement) {
            nodes += perft_inner(state, depth - 1);
            state.unplace(&clears);
        }
    }
    nodes
}

/// Leaf count of the placement tree, hold branches included
pub fn perft(state: &BoardState, depth: u32) -> u64 {
    let mut local = state.clone();
    perft_inner(&mut local, depth)
}

/// Parallel perft - splits root placements across threads
pub fn perft_parallel(state: &BoardState, depth: u32) -> u64 {
    if depth <= 1 || state.topped_out() {
        return perft(state, depth);
    }

    let mut list = PlacementList::new();
    generate_placements(state, &mut list);

    list.as_slice()
        .par_iter()
        .map(|placement| {
            let mut local = state.clone();
            match local.place_at(placement) {
                Some(_) => perft_inner(&mut local, depth - 1),
                None => 0,
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacker_core::{BoardMask, PieceKind};

    /// Straight-drop landing counts per piece on an empty board
    const D1_PER_PIECE: [(PieceKind, u64); 7] = [
        (PieceKind::I, 17),
        (PieceKind::O, 9),
        (PieceKind::L, 34),
        (PieceKind::J, 34),
        (PieceKind::S, 17),
        (PieceKind::Z, 17),
        (PieceKind::T, 34),
    ];

    fn empty(current: PieceKind, queue: &[PieceKind]) -> BoardState {
        BoardState::from_parts(BoardMask::EMPTY, Some(current), None, queue)
    }

    #[test]
    fn test_depth_0_returns_1() {
        assert_eq!(perft(&empty(PieceKind::T, &[]), 0), 1);
    }

    #[test]
    fn test_d1_per_piece_counts() {
        for (kind, expected) in D1_PER_PIECE {
            assert_eq!(perft(&empty(kind, &[]), 1), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_d1_counts_hold_branch() {
        assert_eq!(perft(&empty(PieceKind::T, &[PieceKind::O]), 1), 34 + 9);
    }

    #[test]
    fn test_state_restored_after_perft() {
        let state = BoardState::with_seed(5, 3);
        let mut local = state.clone();
        perft_inner(&mut local, 3);
        assert_eq!(local.mask(), state.mask());
        assert_eq!(local.queue(), state.queue());
        assert_eq!(local.active(), state.active());
        assert_eq!(local.hold_piece(), state.hold_piece());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let state = BoardState::from_parts(
            BoardMask::from_rows(&[0x3DF, 0x10F]),
            Some(PieceKind::T),
            None,
            &[PieceKind::I, PieceKind::O],
        );
        assert_eq!(perft_parallel(&state, 3), perft(&state, 3));
    }
}
