//! SRS kick tables for piece rotation (y up).
//! Every list starts with the unshifted position; candidates are tried in order.

use stacker_core::{PieceKind, Rotation, Turn};

pub type KickList = [(i8, i8); 5];

static IN_PLACE: [(i8, i8); 1] = [(0, 0)];
static NO_KICKS: KickList = [(0, 0); 5];

/// Kick candidates for a quarter turn. `Turn::Half` only tests in place.
pub fn get_kicks(kind: PieceKind, from: Rotation, turn: Turn) -> &'static [(i8, i8)] {
    match turn {
        Turn::Half => &IN_PLACE,
        Turn::Cw | Turn::Ccw => {
            let to = from.turn(turn);
            match kind {
                PieceKind::O => &IN_PLACE,
                PieceKind::I => i_kicks(from, to),
                _ => jlstz_kicks(from, to),
            }
        }
    }
}

fn jlstz_kicks(from: Rotation, to: Rotation) -> &'static KickList {
    use Rotation::*;
    match (from, to) {
        (North, East) => &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        (East, North) => &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        (East, South) => &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        (South, East) => &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        (South, West) => &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        (West, South) => &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        (West, North) => &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        (North, West) => &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        _ => &NO_KICKS,
    }
}

fn i_kicks(from: Rotation, to: Rotation) -> &'static KickList {
    use Rotation::*;
    match (from, to) {
        (North, East) => &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        (East, North) => &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        (East, South) => &[(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        (South, East) => &[(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        (South, West) => &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        (West, South) => &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        (West, North) => &[(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        (North, West) => &[(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        _ => &NO_KICKS,
    }
}
