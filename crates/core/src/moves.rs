//! Placements, spin results and primitive inputs.

use crate::{Piece, PieceKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum SpinType {
    #[default]
    None,
    Mini,
    Full,
}

/// One primitive input the replay layer can execute
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Input {
    Left,
    Right,
    DasLeft,
    DasRight,
    RotateCw,
    RotateCcw,
    Rotate180,
    SoftDrop,
    Hold,
    HardDrop,
}

impl Input {
    pub fn is_rotation(self) -> bool {
        matches!(self, Input::RotateCw | Input::RotateCcw | Input::Rotate180)
    }
}

/// A resting position for a piece
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
    pub hold_used: bool,
    pub spin: SpinType,
}

impl Placement {
    /// Placeholder used to fill fixed-size lists
    pub const ZERO: Placement = Placement::new(Piece::spawn(PieceKind::T), 0, 0);

    pub const fn new(piece: Piece, x: i8, y: i8) -> Self {
        Self {
            piece,
            x,
            y,
            hold_used: false,
            spin: SpinType::None,
        }
    }

    pub fn with_spin(mut self, spin: SpinType) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_hold(mut self) -> Self {
        self.hold_used = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rotation;

    #[test]
    fn test_placement_new() {
        let p = Placement::new(Piece::new(PieceKind::T, Rotation::North), 4, 0);
        assert_eq!(p.piece.kind, PieceKind::T);
        assert_eq!(p.x, 4);
        assert!(!p.hold_used);
        assert_eq!(p.spin, SpinType::None);
    }

    #[test]
    fn test_placement_builders() {
        let p = Placement::new(Piece::new(PieceKind::T, Rotation::South), 5, 2)
            .with_spin(SpinType::Full)
            .with_hold();
        assert_eq!(p.spin, SpinType::Full);
        assert!(p.hold_used);
    }

    #[test]
    fn test_rotation_inputs() {
        assert!(Input::Rotate180.is_rotation());
        assert!(!Input::SoftDrop.is_rotation());
    }
}
