//! T-spin detection by the three-corner rule.

use stacker_core::{BoardMask, Piece, PieceKind, Rotation, SpinType, HEIGHT, WIDTH};

// corner bits: 0 top-left, 1 top-right, 2 bottom-left, 3 bottom-right
const CORNERS: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

/// Corners on the side the T points at, per rotation
const FRONT: [u8; 4] = [0b0011, 0b1010, 0b1100, 0b0101];

/// Kick index that upgrades a mini to a full spin
const LAST_KICK: u8 = 4;

fn corner_filled(board: &BoardMask, x: i8, y: i8) -> bool {
    if x < 0 || x >= WIDTH as i8 || y < 0 || y >= HEIGHT as i8 {
        return true;
    }
    board.get(x as usize, y as usize)
}

/// Filled-corner pattern around the T centre at (x, y)
pub fn corner_pattern(board: &BoardMask, x: i8, y: i8) -> u8 {
    CORNERS
        .iter()
        .enumerate()
        .filter(|&(_, &(dx, dy))| corner_filled(board, x + dx, y + dy))
        .fold(0u8, |acc, (i, _)| acc | (1 << i))
}

/// Spin type of a piece that just rotated into (x, y) using kick `kick`
pub fn detect_tspin(board: &BoardMask, piece: Piece, x: i8, y: i8, kick: u8) -> SpinType {
    if piece.kind != PieceKind::T {
        return SpinType::None;
    }
    let pattern = corner_pattern(board, x, y);
    if pattern.count_ones() < 3 {
        return SpinType::None;
    }
    let front = front_corners(piece.rotation);
    if pattern & front == front || kick == LAST_KICK {
        SpinType::Full
    } else {
        SpinType::Mini
    }
}

#[inline(always)]
fn front_corners(rotation: Rotation) -> u8 {
    FRONT[rotation.index()]
}
