//! Mutable game state: board, active piece, hold, preview queue and the
//! place / unplace pair used by the search.

use std::collections::VecDeque;
use std::fmt;

use stacker_core::{
    BoardMask, Input, Piece, PieceKind, Placement, SpinType, Turn, FULL_ROW, HEIGHT, WIDTH,
};

use crate::attack::ScoreState;
use crate::bag::SevenBag;
use crate::config::AttackConfig;
use crate::geometry::PieceTable;
use crate::spin::detect_tspin;

/// The falling piece and its origin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Active {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
}

impl Active {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            piece: Piece::spawn(kind),
            x: kind.spawn_x(),
            y: kind.spawn_y(),
        }
    }
}

/// Undo record of one `place`; consumed by `unplace`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clears {
    /// (start row, run length), highest chunk first
    chunks: [(u8, u8); 4],
    chunk_count: u8,
    pub lines: u8,
    pub garbage: u32,
    pub perfect_clear: bool,
    pub placement: Placement,
    prev_height: u8,
    prev_score: ScoreState,
    prev_active: Option<Active>,
    prev_hold: Option<PieceKind>,
    prev_hold_used: bool,
    prev_last_kick: Option<u8>,
    popped: [Option<PieceKind>; 2],
}

impl Clears {
    #[inline]
    pub fn chunks(&self) -> &[(u8, u8)] {
        &self.chunks[..self.chunk_count as usize]
    }

    #[inline]
    pub fn spin(&self) -> SpinType {
        self.placement.spin
    }
}

/// What a real lock did to the game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockOutcome {
    pub lines: u8,
    pub spin: SpinType,
    pub garbage: u32,
    pub perfect_clear: bool,
    pub game_over: bool,
}

#[derive(Clone, Debug)]
pub struct BoardState {
    mask: BoardMask,
    height: u8,
    active: Option<Active>,
    hold: Option<PieceKind>,
    hold_used: bool,
    queue: VecDeque<PieceKind>,
    previews: usize,
    bag: Option<SevenBag>,
    score: ScoreState,
    /// Kick index of the last action if it was a rotation
    last_kick: Option<u8>,
    attack: AttackConfig,
    table: &'static PieceTable,
}

impl BoardState {
    /// Empty board fed by a seeded 7-bag with `previews` visible pieces
    pub fn with_seed(seed: u64, previews: usize) -> Self {
        let mut bag = SevenBag::new(seed);
        let first = bag.next_piece();
        let queue = (0..previews).map(|_| bag.next_piece()).collect();
        Self {
            mask: BoardMask::EMPTY,
            height: 0,
            active: Some(Active::spawn(first)),
            hold: None,
            hold_used: false,
            queue,
            previews,
            bag: Some(bag),
            score: ScoreState::default(),
            last_kick: None,
            attack: AttackConfig::default(),
            table: PieceTable::shared(),
        }
    }

    /// State from an externally supplied board and queue; never refills
    pub fn from_parts(
        mask: BoardMask,
        current: Option<PieceKind>,
        hold: Option<PieceKind>,
        queue: &[PieceKind],
    ) -> Self {
        Self {
            mask,
            height: mask.stack_height(HEIGHT) as u8,
            active: current.map(Active::spawn),
            hold,
            hold_used: false,
            queue: queue.iter().copied().collect(),
            previews: queue.len(),
            bag: None,
            score: ScoreState::default(),
            last_kick: None,
            attack: AttackConfig::default(),
            table: PieceTable::shared(),
        }
    }

    pub fn with_attack(mut self, attack: AttackConfig) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_score(mut self, score: ScoreState) -> Self {
        self.score = score;
        self
    }

    #[inline(always)]
    pub fn mask(&self) -> &BoardMask {
        &self.mask
    }

    /// Highest occupied row + 1
    #[inline(always)]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    pub fn active(&self) -> Option<Active> {
        self.active
    }

    #[inline(always)]
    pub fn current(&self) -> Option<PieceKind> {
        self.active.map(|a| a.piece.kind)
    }

    #[inline(always)]
    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    #[inline(always)]
    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    #[inline(always)]
    pub fn queue(&self) -> &VecDeque<PieceKind> {
        &self.queue
    }

    #[inline(always)]
    pub fn score(&self) -> ScoreState {
        self.score
    }

    #[inline(always)]
    pub fn attack(&self) -> &AttackConfig {
        &self.attack
    }

    #[inline(always)]
    pub fn table(&self) -> &'static PieceTable {
        self.table
    }

    /// Piece kind a hold would bring in, if holding is allowed now
    pub fn hold_candidate(&self) -> Option<PieceKind> {
        if self.hold_used || self.active.is_none() {
            return None;
        }
        self.hold.or_else(|| self.queue.front().copied())
    }

    #[inline(always)]
    pub fn fits(&self, piece: Piece, x: i8, y: i8) -> bool {
        self.table.fits(&self.mask, piece, x, y)
    }

    /// Moving down one row would collide or leave the board
    pub fn on_ground(&self) -> bool {
        self.active
            .is_some_and(|a| !self.fits(a.piece, a.x, a.y - 1))
    }

    /// The active piece overlaps the stack (a blocked spawn)
    pub fn topped_out(&self) -> bool {
        self.active
            .is_some_and(|a| !self.fits(a.piece, a.x, a.y))
    }

    /// Put a fresh piece at its spawn position; false means it collides
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        let active = Active::spawn(kind);
        self.last_kick = None;
        if self.fits(active.piece, active.x, active.y) {
            self.active = Some(active);
            true
        } else {
            self.active = None;
            false
        }
    }

    pub fn try_rotate(&mut self, turn: Turn) -> bool {
        let Some(a) = self.active else {
            return false;
        };
        match self.table.rotate(&self.mask, a.piece, a.x, a.y, turn) {
            Some(r) => {
                self.active = Some(Active {
                    piece: r.piece,
                    x: r.x,
                    y: r.y,
                });
                self.last_kick = Some(r.kick);
                true
            }
            None => false,
        }
    }

    /// Slide up to |dx| cells, stopping at the first obstruction
    pub fn try_slide(&mut self, dx: i8) -> bool {
        let Some(mut a) = self.active else {
            return false;
        };
        let step = dx.signum();
        let mut moved = false;
        for _ in 0..dx.unsigned_abs() {
            if !self.fits(a.piece, a.x + step, a.y) {
                break;
            }
            a.x += step;
            moved = true;
        }
        if moved {
            self.active = Some(a);
            self.last_kick = None;
        }
        moved
    }

    /// Fall up to `dy` rows; returns rows actually moved
    pub fn try_drop(&mut self, dy: u8) -> u8 {
        let Some(mut a) = self.active else {
            return 0;
        };
        let mut moved = 0;
        while moved < dy && self.fits(a.piece, a.x, a.y - 1) {
            a.y -= 1;
            moved += 1;
        }
        if moved > 0 {
            self.active = Some(a);
            self.last_kick = None;
        }
        moved
    }

    pub fn sonic_drop(&mut self) -> u8 {
        self.try_drop(HEIGHT as u8)
    }

    /// Spin the active piece would score if locked now
    pub fn spin_status(&self) -> SpinType {
        match (self.active, self.last_kick) {
            (Some(a), Some(kick)) => detect_tspin(&self.mask, a.piece, a.x, a.y, kick),
            _ => SpinType::None,
        }
    }

    /// Hold once per piece; pulls from the queue when hold is empty
    pub fn hold(&mut self) -> bool {
        let Some(next) = self.hold_candidate() else {
            return false;
        };
        let Some(active) = self.active else {
            return false;
        };
        if self.hold.is_none() {
            self.queue.pop_front();
            self.refill();
        }
        self.hold = Some(active.piece.kind);
        self.hold_used = true;
        self.active = Some(Active::spawn(next));
        self.last_kick = None;
        true
    }

    fn refill(&mut self) {
        if let Some(bag) = self.bag.as_mut() {
            while self.queue.len() < self.previews {
                self.queue.push_back(bag.next_piece());
            }
        }
    }

    /// Commit the active piece where it is
    pub fn place(&mut self) -> Option<Clears> {
        let a = self.active?;
        let placement = Placement::new(a.piece, a.x, a.y).with_spin(self.spin_status());
        self.place_at(&placement)
    }

    /// Commit `placement` (swapping through hold first when flagged),
    /// clear full rows, score, and advance to the next piece.
    /// `None` leaves the state untouched.
    pub fn place_at(&mut self, placement: &Placement) -> Option<Clears> {
        let current = self.current()?;
        let kind = if placement.hold_used {
            self.hold_candidate()?
        } else {
            current
        };
        if kind != placement.piece.kind {
            return None;
        }
        let piece_mask = *self.table.mask(placement.piece, placement.x, placement.y)?;
        if self.mask.intersects(&piece_mask) {
            return None;
        }

        let mut clears = Clears {
            chunks: [(0, 0); 4],
            chunk_count: 0,
            lines: 0,
            garbage: 0,
            perfect_clear: false,
            placement: *placement,
            prev_height: self.height,
            prev_score: self.score,
            prev_active: self.active,
            prev_hold: self.hold,
            prev_hold_used: self.hold_used,
            prev_last_kick: self.last_kick,
            popped: [None; 2],
        };

        if placement.hold_used {
            if self.hold.is_none() {
                clears.popped[0] = self.queue.pop_front();
            }
            self.hold = Some(current);
        }

        self.mask.add_piece(&piece_mask);

        let geometry = self.table.geometry(placement.piece);
        let lo = (placement.y + geometry.bottom) as usize;
        let hi = (placement.y + geometry.top) as usize;

        let mut y = hi + 1;
        while y > lo {
            y -= 1;
            if self.mask.row_at(y) != FULL_ROW {
                continue;
            }
            let run_top = y;
            while y > lo && self.mask.row_at(y - 1) == FULL_ROW {
                y -= 1;
            }
            let len = run_top - y + 1;
            clears.chunks[clears.chunk_count as usize] = (y as u8, len as u8);
            clears.chunk_count += 1;
            clears.lines += len as u8;
        }
        for &(start, len) in clears.chunks() {
            self.mask = self.mask.remove_rows(start as usize, len as usize);
        }

        let top = (self.height as usize).max(hi + 1);
        self.height = self.mask.stack_height(top) as u8;
        clears.perfect_clear = clears.lines > 0 && self.mask.is_empty();
        clears.garbage = self.score.register(
            clears.lines,
            placement.spin,
            clears.perfect_clear,
            &self.attack,
        );

        clears.popped[1] = self.queue.pop_front();
        self.active = clears.popped[1].map(Active::spawn);
        self.hold_used = false;
        self.last_kick = None;

        Some(clears)
    }

    /// Exact inverse of the `place` / `place_at` that produced `clears`
    pub fn unplace(&mut self, clears: &Clears) {
        for &(start, len) in clears.chunks().iter().rev() {
            self.mask = self.mask.insert_full_rows(start as usize, len as usize);
        }
        let p = &clears.placement;
        if let Some(piece_mask) = self.table.mask(p.piece, p.x, p.y) {
            self.mask.toggle_piece(piece_mask);
        }
        for &kind in clears.popped.iter().rev().flatten() {
            self.queue.push_front(kind);
        }
        self.height = clears.prev_height;
        self.score = clears.prev_score;
        self.active = clears.prev_active;
        self.hold = clears.prev_hold;
        self.hold_used = clears.prev_hold_used;
        self.last_kick = clears.prev_last_kick;
    }

    /// Lock the active piece for real: place, refill, spawn the next piece
    pub fn lock(&mut self) -> LockOutcome {
        let Some(clears) = self.place() else {
            self.active = None;
            return LockOutcome {
                game_over: true,
                ..LockOutcome::default()
            };
        };
        self.refill();
        let game_over = match self.current() {
            Some(kind) => !self.spawn(kind),
            None => true,
        };
        LockOutcome {
            lines: clears.lines,
            spin: clears.spin(),
            garbage: clears.garbage,
            perfect_clear: clears.perfect_clear,
            game_over,
        }
    }

    /// Execute one primitive input; only `HardDrop` yields an outcome
    pub fn apply_input(&mut self, input: Input) -> Option<LockOutcome> {
        match input {
            Input::Left => {
                self.try_slide(-1);
            }
            Input::Right => {
                self.try_slide(1);
            }
            Input::DasLeft => {
                self.try_slide(-(WIDTH as i8));
            }
            Input::DasRight => {
                self.try_slide(WIDTH as i8);
            }
            Input::RotateCw => {
                self.try_rotate(Turn::Cw);
            }
            Input::RotateCcw => {
                self.try_rotate(Turn::Ccw);
            }
            Input::Rotate180 => {
                self.try_rotate(Turn::Half);
            }
            Input::SoftDrop => {
                self.sonic_drop();
            }
            Input::Hold => {
                self.hold();
            }
            Input::HardDrop => {
                self.sonic_drop();
                return Some(self.lock());
            }
        }
        None
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut falling = BoardMask::EMPTY;
        if let Some(a) = self.active {
            if let Some(m) = self.table.mask(a.piece, a.x, a.y) {
                falling.add_piece(m);
            }
        }
        let top = (self.height as usize).max(falling.stack_height(HEIGHT));
        for y in (0..top).rev() {
            let (row, piece_row) = (self.mask.row_at(y), falling.row_at(y));
            for x in 0..WIDTH {
                let cell = if (piece_row >> x) & 1 == 1 {
                    "()"
                } else if (row >> x) & 1 == 1 {
                    "[]"
                } else {
                    " ."
                };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        let name = |k: Option<PieceKind>| k.map_or('-', PieceKind::to_char);
        write!(f, "current {} hold {} next ", name(self.current()), name(self.hold))?;
        for kind in &self.queue {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}
