//! stacker core crate - board bits, piece identity and move types.

mod mask;
mod moves;
mod piece;

pub use mask::{BoardMask, PieceMask, FULL_ROW, HEIGHT, WIDTH};
pub use moves::{Input, Placement, SpinType};
pub use piece::{Piece, PieceKind, Rotation, Turn};
