use core::fmt;
use serde::{Deserialize, Serialize};

/// Largest number of distinct wire values a game may use.
///
/// Domains are bit-sets over value indices, so the limit is the width of
/// the backing word.
pub const MAX_VALUES: usize = 32;

/// Printed label of a wire value. Labels are ordered; wires in a hand are
/// sorted by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireValue(pub u16);

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bit-set of candidate value indices for a single slot.
///
/// Indices are positions in the config's sorted value list, so bit order
/// agrees with label order and `min`/`max` are cheap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValueSet(u32);

impl ValueSet {
    pub const EMPTY: Self = Self(0);

    /// Set containing every index below `len`.
    pub fn full(len: usize) -> Self {
        debug_assert!(len <= MAX_VALUES);
        if len == MAX_VALUES {
            Self(u32::MAX)
        } else {
            Self((1u32 << len) - 1)
        }
    }

    pub fn singleton(index: usize) -> Self {
        Self(1u32 << index)
    }

    pub fn contains(self, index: usize) -> bool {
        self.0 & (1u32 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        self.0 |= 1u32 << index;
    }

    pub fn remove(&mut self, index: usize) {
        self.0 &= !(1u32 << index);
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single element, when the set has exactly one.
    pub fn sole(self) -> Option<usize> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    pub fn min(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    pub fn max(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(31 - self.0.leading_zeros() as usize)
        }
    }

    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Mask of indices greater than or equal to `index`.
    pub fn at_least(index: usize) -> Self {
        Self(u32::MAX << index)
    }

    /// Mask of indices less than or equal to `index`.
    pub fn at_most(index: usize) -> Self {
        if index + 1 >= MAX_VALUES {
            Self(u32::MAX)
        } else {
            Self((1u32 << (index + 1)) - 1)
        }
    }

    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                None
            } else {
                let index = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(index)
            }
        })
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
