use core::fmt;
use serde::{Deserialize, Serialize};

/// Dense player index. Display names live outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn from_index(index: usize) -> Self {
        Self(index as u8)
    }

    /// All player ids of an `n`-player table, in seating order.
    pub fn seats(n: usize) -> impl Iterator<Item = PlayerId> {
        (0..n).map(PlayerId::from_index)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerId;

    #[test]
    fn index_roundtrip() {
        for index in 0..6 {
            assert_eq!(PlayerId::from_index(index).index(), index);
        }
    }

    #[test]
    fn seats_enumerates_in_order() {
        let seats: Vec<_> = PlayerId::seats(3).collect();
        assert_eq!(seats, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    }
}
