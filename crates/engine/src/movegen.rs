//! Landing enumeration: every (rotation, x) straight drop plus up to two
//! follow-up spins per landing, deduplicated by occupied cells.

use rustc_hash::FxHashSet;
use stacker_core::{BoardMask, Piece, PieceKind, PieceMask, Placement, Rotation, SpinType, Turn};

use crate::geometry::PieceTable;
use crate::move_list::PlacementList;
use crate::spin::detect_tspin;
use crate::state::BoardState;

/// Follow-up rotations tried from each landing
const SPIN_DEPTH: usize = 2;

struct Collector<'a> {
    list: &'a mut PlacementList,
    seen: FxHashSet<(PieceMask, SpinType)>,
    table: &'static PieceTable,
    hold_used: bool,
}

impl Collector<'_> {
    fn push(&mut self, placement: Placement) {
        let Some(mask) = self.table.mask(placement.piece, placement.x, placement.y) else {
            return;
        };
        if self.seen.insert((*mask, placement.spin)) {
            let placement = if self.hold_used {
                placement.with_hold()
            } else {
                placement
            };
            self.list.push(placement);
        }
    }
}

/// Append every landing of `kind` on `board` to `list`
pub fn generate_landings(
    board: &BoardMask,
    height: u8,
    kind: PieceKind,
    hold_used: bool,
    list: &mut PlacementList,
) {
    let table = PieceTable::shared();
    let mut out = Collector {
        list,
        seen: FxHashSet::default(),
        table,
        hold_used,
    };

    for rotation in Rotation::ALL {
        let piece = Piece::new(kind, rotation);
        let g = table.geometry(piece);
        // lowest origin whose cells all sit above the stack
        let start_y = (height as i8 - g.bottom).clamp(g.y_min, g.y_max);
        for x in g.x_min..=g.x_max {
            if !table.fits(board, piece, x, start_y) {
                continue;
            }
            let y = table.drop_y(board, piece, x, start_y);
            out.push(Placement::new(piece, x, y));

            for turn in [Turn::Cw, Turn::Ccw] {
                let (mut p, mut px, mut py) = (piece, x, y);
                for _ in 0..SPIN_DEPTH {
                    let Some(r) = table.rotate(board, p, px, py, turn) else {
                        break;
                    };
                    if !table.fits(board, r.piece, r.x, r.y - 1) {
                        let spin = detect_tspin(board, r.piece, r.x, r.y, r.kick);
                        out.push(Placement::new(r.piece, r.x, r.y).with_spin(spin));
                    }
                    (p, px, py) = (r.piece, r.x, r.y);
                }
            }
        }
    }
}

/// Placements for the current piece, then for the hold swap when it
/// brings in a different kind
pub fn generate_placements(state: &BoardState, list: &mut PlacementList) {
    let Some(current) = state.current() else {
        return;
    };
    generate_landings(state.mask(), state.height(), current, false, list);
    if let Some(other) = state.hold_candidate() {
        if other != current {
            generate_landings(state.mask(), state.height(), other, true, list);
        }
    }
}

pub fn count_landings(board: &BoardMask, height: u8, kind: PieceKind) -> usize {
    let mut list = PlacementList::new();
    generate_landings(board, height, kind, false, &mut list);
    list.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landings(board: &BoardMask, kind: PieceKind) -> PlacementList {
        let mut list = PlacementList::new();
        generate_landings(board, board.stack_height(24) as u8, kind, false, &mut list);
        list
    }

    #[test]
    fn test_empty_board_counts() {
        let board = BoardMask::EMPTY;
        // T: 8 + 9 + 8 + 9 distinct footprints on the floor
        let t = landings(&board, PieceKind::T);
        assert!(t.iter().all(|p| p.spin == SpinType::None));
        assert_eq!(t.len(), 34);
        assert_eq!(landings(&board, PieceKind::O).len(), 9);
        assert_eq!(landings(&board, PieceKind::I).len(), 17);
    }

    #[test]
    fn test_every_landing_rests_and_fits() {
        let board = BoardMask::from_rows(&[0x3F7, 0x3E3, 0x201, 0x001]);
        let table = PieceTable::shared();
        for kind in PieceKind::ALL {
            for p in &landings(&board, kind) {
                assert!(table.fits(&board, p.piece, p.x, p.y), "{p:?}");
                assert!(!table.fits(&board, p.piece, p.x, p.y - 1), "{p:?}");
            }
        }
    }

    #[test]
    fn test_finds_tspin_double_slot() {
        // TSD slot: overhang at column 3 over a three-wide gap
        let rows = [0x3EF, 0x3C7, 0x00F];
        let board = BoardMask::from_rows(&rows);
        let list = landings(&board, PieceKind::T);
        let tsd = list
            .iter()
            .find(|p| p.piece.rotation == Rotation::South && p.x == 4 && p.y == 1);
        assert_eq!(tsd.map(|p| p.spin), Some(SpinType::Full));
    }

    #[test]
    fn test_hold_branch_flagged() {
        let state = BoardState::from_parts(
            BoardMask::EMPTY,
            Some(PieceKind::T),
            None,
            &[PieceKind::O],
        );
        let mut list = PlacementList::new();
        generate_placements(&state, &mut list);
        assert_eq!(list.len(), 34 + 9);
        assert!(list
            .iter()
            .all(|p| p.hold_used == (p.piece.kind == PieceKind::O)));
    }
}
