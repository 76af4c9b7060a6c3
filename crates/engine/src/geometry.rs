//! Precomputed piece geometry - legal origin ranges and a PieceMask for
//! every (piece, x, y), built once and shared read-only.

use std::sync::OnceLock;

use stacker_core::{BoardMask, Piece, PieceMask, Turn, HEIGHT, WIDTH};

use crate::kicks::get_kicks;

/// Geometry of one (kind, rotation) pair
#[derive(Clone, Debug)]
pub struct PieceGeometry {
    pub piece: Piece,
    pub minos: [(i8, i8); 4],
    pub x_min: i8,
    pub x_max: i8,
    pub y_min: i8,
    pub y_max: i8,
    /// Lowest cell offset below the origin (<= 0 for most shapes)
    pub bottom: i8,
    pub top: i8,
    masks: Vec<PieceMask>,
}

impl PieceGeometry {
    fn build(piece: Piece) -> Self {
        let minos = piece.minos();
        let (mut dx_min, mut dx_max, mut dy_min, mut dy_max) = (i8::MAX, i8::MIN, i8::MAX, i8::MIN);
        for &(dx, dy) in &minos {
            dx_min = dx_min.min(dx);
            dx_max = dx_max.max(dx);
            dy_min = dy_min.min(dy);
            dy_max = dy_max.max(dy);
        }
        let x_min = -dx_min;
        let x_max = WIDTH as i8 - 1 - dx_max;
        let y_min = -dy_min;
        let y_max = HEIGHT as i8 - 1 - dy_max;

        let mut masks = Vec::with_capacity(((x_max - x_min + 1) as usize) * ((y_max - y_min + 1) as usize));
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let cells = minos.map(|(dx, dy)| ((y + dy) as u32) * WIDTH as u32 + (x + dx) as u32);
                masks.push(PieceMask::from_cells(cells));
            }
        }

        Self {
            piece,
            minos,
            x_min,
            x_max,
            y_min,
            y_max,
            bottom: dy_min,
            top: dy_max,
            masks,
        }
    }

    #[inline(always)]
    pub fn in_range(&self, x: i8, y: i8) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// O(1) mask lookup; `None` outside the legal range
    #[inline(always)]
    pub fn mask(&self, x: i8, y: i8) -> Option<&PieceMask> {
        if !self.in_range(x, y) {
            return None;
        }
        let width = (self.x_max - self.x_min + 1) as usize;
        let idx = (y - self.y_min) as usize * width + (x - self.x_min) as usize;
        self.masks.get(idx)
    }

    /// Absolute cells of the piece at (x, y)
    pub fn cells(&self, x: i8, y: i8) -> [(i8, i8); 4] {
        self.minos.map(|(dx, dy)| (x + dx, y + dy))
    }
}

/// Outcome of a successful rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotated {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
    /// Index of the kick candidate that succeeded (0 = in place)
    pub kick: u8,
}

/// All 28 piece geometries, indexed by `Piece::index()`
#[derive(Debug)]
pub struct PieceTable {
    pieces: Vec<PieceGeometry>,
}

static TABLE: OnceLock<PieceTable> = OnceLock::new();

impl PieceTable {
    fn build() -> Self {
        Self {
            pieces: Piece::all().map(PieceGeometry::build).collect(),
        }
    }

    /// Process-wide table, built on first use
    pub fn shared() -> &'static PieceTable {
        TABLE.get_or_init(Self::build)
    }

    #[inline(always)]
    pub fn geometry(&self, piece: Piece) -> &PieceGeometry {
        &self.pieces[piece.index()]
    }

    #[inline(always)]
    pub fn mask(&self, piece: Piece, x: i8, y: i8) -> Option<&PieceMask> {
        self.geometry(piece).mask(x, y)
    }

    pub fn kicks(&self, piece: Piece, turn: Turn) -> &'static [(i8, i8)] {
        get_kicks(piece.kind, piece.rotation, turn)
    }

    /// In range and not overlapping the board
    #[inline(always)]
    pub fn fits(&self, board: &BoardMask, piece: Piece, x: i8, y: i8) -> bool {
        self.mask(piece, x, y).is_some_and(|m| !board.intersects(m))
    }

    /// First kick candidate that fits wins; `None` when all collide
    pub fn rotate(&self, board: &BoardMask, piece: Piece, x: i8, y: i8, turn: Turn) -> Option<Rotated> {
        let target = piece.turned(turn);
        self.kicks(piece, turn)
            .iter()
            .enumerate()
            .find_map(|(i, &(dx, dy))| {
                let (nx, ny) = (x + dx, y + dy);
                self.fits(board, target, nx, ny).then_some(Rotated {
                    piece: target,
                    x: nx,
                    y: ny,
                    kick: i as u8,
                })
            })
    }

    /// Lowest y reachable by falling straight down from (x, y)
    pub fn drop_y(&self, board: &BoardMask, piece: Piece, x: i8, y: i8) -> i8 {
        let mut y = y;
        while self.fits(board, piece, x, y - 1) {
            y -= 1;
        }
        y
    }
}
