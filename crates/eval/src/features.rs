//! Board feature extraction. Every value is derived from the BoardMask alone
//! (plus the path's garbage), in a fixed order, so equal inputs always give
//! bit-identical vectors.

use stacker_core::{BoardMask, FULL_ROW, HEIGHT, WIDTH};

pub const FEATURE_COUNT: usize = 6;

/// Well or tower depth that starts counting as a pillar
const PILLAR_MIN: u8 = 3;

/// Fixed-order feature vector fed to an evaluator
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Features(pub [f32; FEATURE_COUNT]);

impl Features {
    pub const HEIGHT: usize = 0;
    pub const CAVES: usize = 1;
    pub const PILLARS: usize = 2;
    pub const ROW_TRANSITIONS: usize = 3;
    pub const COLUMN_TRANSITIONS: usize = 4;
    pub const GARBAGE: usize = 5;

    pub fn extract(mask: &BoardMask, garbage: f32) -> Self {
        let heights = mask.column_heights();
        let top = mask.stack_height(HEIGHT);
        Self([
            height_rss(&heights),
            caves(mask, &heights),
            pillars(&heights),
            row_transitions(mask, top),
            column_transitions(mask, top),
            garbage,
        ])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

fn height_rss(heights: &[u8; WIDTH]) -> f32 {
    let sum: u32 = heights.iter().map(|&h| h as u32 * h as u32).sum();
    (sum as f32).sqrt()
}

/// Covered empty cells, each weighted by how many rows sit above it
fn caves(mask: &BoardMask, heights: &[u8; WIDTH]) -> f32 {
    let mut total = 0u32;
    for (x, &h) in heights.iter().enumerate() {
        for y in 0..h as usize {
            if !mask.get(x, y) {
                total += h as u32 - y as u32 - 1;
            }
        }
    }
    total as f32
}

/// One-wide wells and lone towers deeper than `PILLAR_MIN - 1`
fn pillars(heights: &[u8; WIDTH]) -> f32 {
    let mut total = 0u32;
    for x in 0..WIDTH {
        let h = heights[x];
        let left = if x == 0 { None } else { Some(heights[x - 1]) };
        let right = heights.get(x + 1).copied();

        // walls are infinitely tall for wells and flat for towers
        let well_rim = left.unwrap_or(u8::MAX).min(right.unwrap_or(u8::MAX));
        let tower_rim = left.unwrap_or(0).max(right.unwrap_or(0));

        let well = well_rim.saturating_sub(h);
        if well >= PILLAR_MIN {
            total += well as u32;
        }
        let tower = h.saturating_sub(tower_rim);
        if tower >= PILLAR_MIN {
            total += tower as u32;
        }
    }
    total as f32
}

/// Filled/empty changes along each occupied row, walls counted as filled
fn row_transitions(mask: &BoardMask, top: usize) -> f32 {
    let walls = 1u32 | (1 << (WIDTH + 1));
    let total: u32 = (0..top)
        .map(|y| {
            let row = ((mask.row_at(y) as u32) << 1) | walls;
            ((row ^ (row >> 1)) & 0x7FF).count_ones()
        })
        .sum();
    total as f32
}

/// Filled/empty changes up each column, floor filled and sky empty
fn column_transitions(mask: &BoardMask, top: usize) -> f32 {
    let mut prev = FULL_ROW;
    let mut total = 0u32;
    for y in 0..=top {
        let row = if y < top { mask.row_at(y) } else { 0 };
        total += (row ^ prev).count_ones();
        prev = row;
    }
    total as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let f = Features::extract(&BoardMask::EMPTY, 0.0);
        assert_eq!(f.0[Features::HEIGHT], 0.0);
        assert_eq!(f.0[Features::CAVES], 0.0);
        assert_eq!(f.0[Features::ROW_TRANSITIONS], 0.0);
        // floor against sky
        assert_eq!(f.0[Features::COLUMN_TRANSITIONS], 10.0);
    }

    #[test]
    fn test_flat_rows() {
        let mask = BoardMask::from_rows(&[0x3FF, 0x3FF]);
        let f = Features::extract(&mask, 1.5);
        assert_eq!(f.0[Features::HEIGHT], (10.0f32 * 4.0).sqrt());
        assert_eq!(f.0[Features::ROW_TRANSITIONS], 0.0);
        assert_eq!(f.0[Features::COLUMN_TRANSITIONS], 10.0);
        assert_eq!(f.0[Features::GARBAGE], 1.5);
    }

    #[test]
    fn test_caves_weighted_by_depth() {
        // column 0: hole at row 0 under two filled rows
        let mask = BoardMask::from_rows(&[0x000, 0x001, 0x001]);
        let f = Features::extract(&mask, 0.0);
        assert_eq!(f.0[Features::CAVES], 2.0);
    }

    #[test]
    fn test_row_transitions_count_walls() {
        // a lone cell in the middle: wall|empty, empty|cell, cell|empty, empty|wall
        let mask = BoardMask::from_rows(&[0x010]);
        let f = Features::extract(&mask, 0.0);
        assert_eq!(f.0[Features::ROW_TRANSITIONS], 4.0);
    }

    #[test]
    fn test_pillars() {
        // column 9 is a four-deep well against the wall
        let well = BoardMask::from_rows(&[0x1FF; 4]);
        assert_eq!(Features::extract(&well, 0.0).0[Features::PILLARS], 4.0);

        // a three-tall tower standing alone
        let tower = BoardMask::from_rows(&[0x010, 0x010, 0x010]);
        assert_eq!(Features::extract(&tower, 0.0).0[Features::PILLARS], 3.0);
    }

    #[test]
    fn test_deterministic() {
        let mask = BoardMask::from_rows(&[0x3EF, 0x2C7, 0x00F, 0x201]);
        assert_eq!(Features::extract(&mask, 0.25), Features::extract(&mask, 0.25));
    }
}
