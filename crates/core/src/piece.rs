//! Piece kinds, rotation states and their SRS cell offsets.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    T,
    I,
    L,
    J,
    S,
    Z,
    O,
}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

/// Direction of a rotation input
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Turn {
    Cw,
    Ccw,
    Half,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub fn cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn ccw(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    pub fn turn(self, turn: Turn) -> Self {
        match turn {
            Turn::Cw => self.cw(),
            Turn::Ccw => self.ccw(),
            Turn::Half => self.flip(),
        }
    }

    /// East and West stand the piece on its side
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::T,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::O,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Cell offsets (x right, y up) relative to the rotation origin.
    pub fn minos(self, rot: Rotation) -> [(i8, i8); 4] {
        let idx = rot.index();
        match self {
            PieceKind::I => [
                [(-1, 0), (0, 0), (1, 0), (2, 0)],
                [(1, 1), (1, 0), (1, -1), (1, -2)],
                [(-1, -1), (0, -1), (1, -1), (2, -1)],
                [(0, 1), (0, 0), (0, -1), (0, -2)],
            ][idx],
            PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            PieceKind::T => [
                [(-1, 0), (0, 0), (1, 0), (0, 1)],
                [(0, -1), (0, 0), (0, 1), (1, 0)],
                [(-1, 0), (0, 0), (1, 0), (0, -1)],
                [(0, -1), (0, 0), (0, 1), (-1, 0)],
            ][idx],
            PieceKind::S => [
                [(-1, 0), (0, 0), (0, 1), (1, 1)],
                [(0, 1), (0, 0), (1, 0), (1, -1)],
                [(-1, -1), (0, -1), (0, 0), (1, 0)],
                [(-1, 1), (-1, 0), (0, 0), (0, -1)],
            ][idx],
            PieceKind::Z => [
                [(0, 0), (1, 0), (-1, 1), (0, 1)],
                [(0, -1), (0, 0), (1, 0), (1, 1)],
                [(0, -1), (1, -1), (-1, 0), (0, 0)],
                [(-1, -1), (-1, 0), (0, 0), (0, 1)],
            ][idx],
            PieceKind::J => [
                [(-1, 0), (0, 0), (1, 0), (-1, 1)],
                [(0, -1), (0, 0), (0, 1), (1, 1)],
                [(1, -1), (-1, 0), (0, 0), (1, 0)],
                [(-1, -1), (0, -1), (0, 0), (0, 1)],
            ][idx],
            PieceKind::L => [
                [(-1, 0), (0, 0), (1, 0), (1, 1)],
                [(0, -1), (0, 0), (0, 1), (1, -1)],
                [(-1, -1), (-1, 0), (0, 0), (1, 0)],
                [(-1, 1), (0, -1), (0, 0), (0, 1)],
            ][idx],
        }
    }

    /// Spawn x position (center column)
    pub fn spawn_x(self) -> i8 {
        4
    }

    /// Spawn y position, just above the 20 visible rows
    pub fn spawn_y(self) -> i8 {
        20
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::T => 'T',
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'T' => Some(PieceKind::T),
            'I' => Some(PieceKind::I),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'O' => Some(PieceKind::O),
            _ => None,
        }
    }
}

/// A piece kind in a specific rotation state
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
}

impl Piece {
    /// Number of distinct (kind, rotation) pairs
    pub const COUNT: usize = 28;

    pub const fn new(kind: PieceKind, rotation: Rotation) -> Self {
        Self { kind, rotation }
    }

    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
        }
    }

    /// Dense table index: kind * 4 + rotation
    #[inline(always)]
    pub fn index(self) -> usize {
        self.kind.index() * 4 + self.rotation.index()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let kind = PieceKind::from_index(index / 4)?;
        Some(Self::new(kind, Rotation::ALL[index % 4]))
    }

    pub fn minos(self) -> [(i8, i8); 4] {
        self.kind.minos(self.rotation)
    }

    pub fn turned(self, turn: Turn) -> Self {
        Self::new(self.kind, self.rotation.turn(turn))
    }

    pub fn all() -> impl Iterator<Item = Piece> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }
}
