//! Stack-allocated placement list for zero-allocation landing enumeration

use stacker_core::Placement;

/// Upper bound on placements per piece, spins included
pub const MAX_PLACEMENTS: usize = 256;

/// Fixed-capacity placement list - no heap allocation
#[derive(Clone)]
pub struct PlacementList {
    placements: [Placement; MAX_PLACEMENTS],
    len: usize,
}

impl PlacementList {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            placements: [Placement::ZERO; MAX_PLACEMENTS],
            len: 0,
        }
    }

    /// Push a placement; silently dropped once full
    #[inline(always)]
    pub fn push(&mut self, p: Placement) {
        debug_assert!(self.len < MAX_PLACEMENTS, "PlacementList overflow");
        if self.len < MAX_PLACEMENTS {
            self.placements[self.len] = p;
            self.len += 1;
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[Placement] {
        &self.placements[..self.len]
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.as_slice().iter()
    }
}

impl Default for PlacementList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a PlacementList {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::ops::Index<usize> for PlacementList {
    type Output = Placement;

    #[inline(always)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}
