//! 256-bit board occupancy - four u64 words, row-major, 10 bits per row
//! row r lives at bits [10r, 10r + 10) and may straddle a word boundary

use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Cells per row
pub const WIDTH: usize = 10;
/// Playable rows (20 visible + 4 above for spawn and kicks)
pub const HEIGHT: usize = 24;
/// One full row as a 10-bit value
pub const FULL_ROW: u16 = 0x3FF;

const WORDS: usize = 4;
const BITS: u32 = 256;
const PLAYABLE_BITS: u32 = (WIDTH * HEIGHT) as u32;

/// Shape bits of one piece placement, tied to the BoardMask word it starts in.
/// `spill` carries the part of the shape that crosses into `word + 1`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct PieceMask {
    pub word: u8,
    pub bits: u64,
    pub spill: u64,
}

impl PieceMask {
    /// Build from absolute cell bit indices (10 * row + col).
    pub fn from_cells(cells: [u32; 4]) -> Self {
        let lowest = cells.iter().copied().min().unwrap_or(0);
        let word = lowest / 64;
        let mut pattern = 0u128;
        for bit in cells {
            pattern |= 1u128 << (bit - word * 64);
        }
        Self {
            word: word as u8,
            bits: pattern as u64,
            spill: (pattern >> 64) as u64,
        }
    }

    #[inline(always)]
    pub fn pop_count(&self) -> u32 {
        self.bits.count_ones() + self.spill.count_ones()
    }
}

/// 10-wide board as a 256-bit value
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardMask {
    words: [u64; WORDS],
}

impl BoardMask {
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    pub const fn from_words(words: [u64; WORDS]) -> Self {
        Self { words }
    }

    #[inline(always)]
    pub fn words(&self) -> &[u64; WORDS] {
        &self.words
    }

    /// Rows listed bottom-up, 10 low bits each
    pub fn from_rows(rows: &[u16]) -> Self {
        let mut mask = Self::EMPTY;
        for (y, &row) in rows.iter().take(HEIGHT).enumerate() {
            mask = mask | Self::row_mask(y, row);
        }
        mask
    }

    /// A single row value placed at height `y`
    pub fn row_mask(y: usize, row: u16) -> Self {
        let mut mask = Self::EMPTY;
        mask.words[0] = (row & FULL_ROW) as u64;
        mask.shl((y * WIDTH) as u32)
    }

    /// Bits [0, n) set
    pub fn low_bits(n: u32) -> Self {
        let mut words = [0u64; WORDS];
        for (i, word) in words.iter_mut().enumerate() {
            let start = i as u32 * 64;
            *word = if n >= start + 64 {
                !0
            } else if n > start {
                (1u64 << (n - start)) - 1
            } else {
                0
            };
        }
        Self { words }
    }

    /// `count` full rows starting at row `y`
    pub fn full_rows(y: usize, count: usize) -> Self {
        let lo = (y * WIDTH) as u32;
        let hi = ((y + count) * WIDTH) as u32;
        Self::low_bits(hi) & !Self::low_bits(lo)
    }

    #[inline(always)]
    fn bit_of(x: usize, y: usize) -> (usize, u32) {
        let bit = y * WIDTH + x;
        (bit / 64, (bit % 64) as u32)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (w, b) = Self::bit_of(x, y);
        (self.words[w] >> b) & 1 == 1
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        let (w, b) = Self::bit_of(x, y);
        self.words[w] |= 1u64 << b;
    }

    #[inline]
    pub fn clear(&mut self, x: usize, y: usize) {
        let (w, b) = Self::bit_of(x, y);
        self.words[w] &= !(1u64 << b);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// O(1) collision test against a piece placement
    #[inline(always)]
    pub fn intersects(&self, piece: &PieceMask) -> bool {
        let w = piece.word as usize;
        let mut hit = self.words[w] & piece.bits;
        if piece.spill != 0 && w + 1 < WORDS {
            hit |= self.words[w + 1] & piece.spill;
        }
        hit != 0
    }

    #[inline(always)]
    pub fn intersects_mask(&self, other: &BoardMask) -> bool {
        (*self & *other) != Self::EMPTY
    }

    /// OR the piece into the board
    #[inline(always)]
    pub fn add_piece(&mut self, piece: &PieceMask) {
        let w = piece.word as usize;
        self.words[w] |= piece.bits;
        if w + 1 < WORDS {
            self.words[w + 1] |= piece.spill;
        }
    }

    /// XOR the piece out of the board (caller guarantees its cells are set)
    #[inline(always)]
    pub fn toggle_piece(&mut self, piece: &PieceMask) {
        let w = piece.word as usize;
        self.words[w] ^= piece.bits;
        if w + 1 < WORDS {
            self.words[w + 1] ^= piece.spill;
        }
    }

    /// Shift toward higher bit indices (rows move up)
    pub fn shl(&self, n: u32) -> Self {
        if n >= BITS {
            return Self::EMPTY;
        }
        let word_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut words = [0u64; WORDS];
        for i in word_shift..WORDS {
            let src = i - word_shift;
            let mut v = self.words[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                v |= self.words[src - 1] >> (64 - bit_shift);
            }
            words[i] = v;
        }
        Self { words }
    }

    /// Shift toward lower bit indices (rows move down)
    pub fn shr(&self, n: u32) -> Self {
        if n >= BITS {
            return Self::EMPTY;
        }
        let word_shift = (n / 64) as usize;
        let bit_shift = n % 64;
        let mut words = [0u64; WORDS];
        for i in 0..WORDS - word_shift {
            let src = i + word_shift;
            let mut v = self.words[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < WORDS {
                v |= self.words[src + 1] << (64 - bit_shift);
            }
            words[i] = v;
        }
        Self { words }
    }

    /// 10-bit row value at height `y`, whichever word(s) it sits in
    #[inline]
    pub fn row_at(&self, y: usize) -> u16 {
        let bit = y * WIDTH;
        let w = bit / 64;
        let off = (bit % 64) as u32;
        let mut v = self.words[w] >> off;
        if off > 64 - WIDTH as u32 && w + 1 < WORDS {
            v |= self.words[w + 1] << (64 - off);
        }
        (v as u16) & FULL_ROW
    }

    /// Occupied playable cells; bits above the playfield are ignored
    pub fn pop_count(&self) -> u32 {
        (*self & Self::low_bits(PLAYABLE_BITS))
            .words
            .iter()
            .map(|w| w.count_ones())
            .sum()
    }

    /// Highest occupied row + 1, scanning down from `from`
    pub fn stack_height(&self, from: usize) -> usize {
        let mut y = from.min(HEIGHT);
        while y > 0 && self.row_at(y - 1) == 0 {
            y -= 1;
        }
        y
    }

    /// Per-column heights (highest occupied cell + 1)
    pub fn column_heights(&self) -> [u8; WIDTH] {
        let mut heights = [0u8; WIDTH];
        let top = self.stack_height(HEIGHT);
        for y in 0..top {
            let row = self.row_at(y);
            for (x, h) in heights.iter_mut().enumerate() {
                if (row >> x) & 1 == 1 {
                    *h = (y + 1) as u8;
                }
            }
        }
        heights
    }

    /// Remove `count` rows starting at `y`; rows above move down
    pub fn remove_rows(&self, y: usize, count: usize) -> Self {
        let below = Self::low_bits((y * WIDTH) as u32);
        (*self & below) | self.shr(((y + count) * WIDTH) as u32).shl((y * WIDTH) as u32)
    }

    /// Inverse of `remove_rows`: insert `count` full rows at `y`
    pub fn insert_full_rows(&self, y: usize, count: usize) -> Self {
        let below = Self::low_bits((y * WIDTH) as u32);
        (*self & below)
            | Self::full_rows(y, count)
            | (*self & !below).shl((count * WIDTH) as u32)
    }
}

impl BitOr for BoardMask {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        let mut words = self.words;
        for (w, r) in words.iter_mut().zip(rhs.words) {
            *w |= r;
        }
        Self { words }
    }
}

impl BitAnd for BoardMask {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        let mut words = self.words;
        for (w, r) in words.iter_mut().zip(rhs.words) {
            *w &= r;
        }
        Self { words }
    }
}

impl BitXor for BoardMask {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        let mut words = self.words;
        for (w, r) in words.iter_mut().zip(rhs.words) {
            *w ^= r;
        }
        Self { words }
    }
}

impl Not for BoardMask {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            words: self.words.map(|w| !w),
        }
    }
}

impl std::fmt::Debug for BoardMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoardMask({:016x} {:016x} {:016x} {:016x})",
            self.words[3], self.words[2], self.words[1], self.words[0]
        )
    }
}

impl std::fmt::Display for BoardMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let top = self.stack_height(HEIGHT);
        for y in (0..top).rev() {
            let row = self.row_at(y);
            for x in 0..WIDTH {
                write!(f, "{}", if (row >> x) & 1 == 1 { "[]" } else { " ." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_row_straddles_word_boundary() {
        // row 6 covers bits 60..70
        let mut m = BoardMask::EMPTY;
        for x in 0..WIDTH {
            m.set(x, 6);
        }
        assert_eq!(m.row_at(6), FULL_ROW);
        assert_eq!(m.words()[0] >> 60, 0xF);
        assert_eq!(m.words()[1] & 0x3F, 0x3F);
        assert_eq!(m.row_at(5), 0);
        assert_eq!(m.row_at(7), 0);
    }

    #[test]
    fn test_shift_by_whole_words() {
        let m = BoardMask::from_words([1, 2, 3, 4]);
        assert_eq!(m.shl(64), BoardMask::from_words([0, 1, 2, 3]));
        assert_eq!(m.shr(128), BoardMask::from_words([3, 4, 0, 0]));
        assert_eq!(m.shl(256), BoardMask::EMPTY);
        assert_eq!(m.shl(0), m);
    }

    #[test]
    fn test_shift_carries_between_words() {
        let m = BoardMask::from_words([1u64 << 63, 0, 0, 0]);
        assert_eq!(m.shl(1), BoardMask::from_words([0, 1, 0, 0]));
        assert_eq!(m.shl(1).shr(1), m);
        let top = BoardMask::from_words([0, 0, 0, 1]);
        assert_eq!(top.shr(65), BoardMask::from_words([0, 1u64 << 63, 0, 0]));
    }

    #[test]
    fn test_pop_count_ignores_padding() {
        let m = BoardMask::from_words([0, 0, 0, !0]);
        // word 3 holds bits 192..256, only 192..240 are playable
        assert_eq!(m.pop_count(), 48);
    }

    #[test]
    fn test_remove_and_insert_rows_round_trip() {
        let rows = [0x3FF, 0x3FF, 0x201, 0x3FF, 0x0F0, 0x00F];
        let m = BoardMask::from_rows(&rows);
        let removed = m.remove_rows(3, 1).remove_rows(0, 2);
        assert_eq!(removed.row_at(0), 0x201);
        assert_eq!(removed.row_at(1), 0x0F0);
        assert_eq!(removed.row_at(2), 0x00F);
        let restored = removed.insert_full_rows(0, 2).insert_full_rows(3, 1);
        assert_eq!(restored, m);
    }

    #[test]
    fn test_piece_mask_spill() {
        // cells on rows 5 and 6 straddle words 0 and 1
        let cells = [50, 51, 60, 70];
        let pm = PieceMask::from_cells(cells);
        assert_eq!(pm.word, 0);
        assert_ne!(pm.spill, 0);
        let mut m = BoardMask::EMPTY;
        m.add_piece(&pm);
        assert!(m.get(0, 5) && m.get(1, 5) && m.get(0, 6) && m.get(0, 7));
        assert_eq!(m.pop_count(), 4);
        assert!(m.intersects(&pm));
        m.toggle_piece(&pm);
        assert!(m.is_empty());
    }

    #[test]
    fn test_column_heights() {
        let m = BoardMask::from_rows(&[0x001, 0x001, 0x200]);
        let h = m.column_heights();
        assert_eq!(h[0], 2);
        assert_eq!(h[9], 3);
        assert_eq!(h[4], 0);
        assert_eq!(m.stack_height(HEIGHT), 3);
    }

    proptest! {
        #[test]
        fn shl_then_shr_keeps_retained_bits(
            w0 in any::<u64>(), w1 in any::<u64>(), w2 in any::<u64>(), w3 in any::<u64>(),
            n in 0u32..256,
        ) {
            let m = BoardMask::from_words([w0, w1, w2, w3]);
            let retained = m & BoardMask::low_bits(256 - n);
            prop_assert_eq!(m.shl(n).shr(n), retained);
        }

        #[test]
        fn shr_then_shl_keeps_high_bits(
            w0 in any::<u64>(), w1 in any::<u64>(), w2 in any::<u64>(), w3 in any::<u64>(),
            n in 0u32..256,
        ) {
            let m = BoardMask::from_words([w0, w1, w2, w3]);
            let retained = m & !BoardMask::low_bits(n);
            prop_assert_eq!(m.shr(n).shl(n), retained);
        }

        #[test]
        fn row_at_matches_cell_reads(y in 0usize..HEIGHT, row in 0u16..1024) {
            let m = BoardMask::row_mask(y, row);
            prop_assert_eq!(m.row_at(y), row);
            for x in 0..WIDTH {
                prop_assert_eq!(m.get(x, y), (row >> x) & 1 == 1);
            }
        }
    }
}
