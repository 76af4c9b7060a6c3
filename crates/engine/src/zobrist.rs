//! Zobrist keys for board contents and piece slots.
//! Tables are generated at compile time from a fixed xorshift64 seed so
//! hashes are identical across runs.

use stacker_core::{BoardMask, PieceKind};

/// Current piece, hold, then previews
pub const PIECE_SLOTS: usize = 16;

const CELLS: usize = 256;
// 7 kinds + empty
const KIND_KEYS: usize = 8;

const fn xorshift(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

const CELL_KEYS: [u64; CELLS] = {
    let mut table = [0u64; CELLS];
    let mut state: u64 = 0xdeadbeefcafe1234;
    let mut i = 0;
    while i < CELLS {
        state = xorshift(state);
        table[i] = state;
        i += 1;
    }
    table
};

const SLOT_KEYS: [[u64; KIND_KEYS]; PIECE_SLOTS] = {
    let mut table = [[0u64; KIND_KEYS]; PIECE_SLOTS];
    let mut state: u64 = 0x0bad5eed9e3779b9;
    let mut slot = 0;
    while slot < PIECE_SLOTS {
        let mut kind = 0;
        while kind < KIND_KEYS {
            state = xorshift(state);
            table[slot][kind] = state;
            kind += 1;
        }
        slot += 1;
    }
    table
};

/// XOR of the keys of every occupied cell
#[inline]
pub fn board_hash(mask: &BoardMask) -> u64 {
    let mut hash = 0u64;
    for (w, &word) in mask.words().iter().enumerate() {
        let mut bits = word;
        while bits != 0 {
            let bit = bits.trailing_zeros() as usize;
            hash ^= CELL_KEYS[w * 64 + bit];
            bits &= bits - 1;
        }
    }
    hash
}

/// Key of a piece (or no piece) sitting in queue slot `slot`
#[inline(always)]
pub fn slot_key(slot: usize, kind: Option<PieceKind>) -> u64 {
    let k = kind.map_or(KIND_KEYS - 1, PieceKind::index);
    SLOT_KEYS[slot % PIECE_SLOTS][k]
}

/// Mix a small integer into a hash
#[inline(always)]
pub fn mix(hash: u64, value: u64) -> u64 {
    (hash ^ value.wrapping_mul(0x9e3779b97f4a7c15)).rotate_left(23)
}
