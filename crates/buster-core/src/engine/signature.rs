use crate::config::DeckLayout;
use crate::event::AdjacentRelation;
use crate::model::hand::Hand;
use crate::model::value::{ValueSet, MAX_VALUES};
use rustc_hash::FxHashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Instant;

/// How many search nodes pass between deadline checks.
const DEADLINE_STRIDE: u32 = 4096;

/// Fixed-length vector of per-value counts.
///
/// Doubles as a hand signature (Parikh vector, sums to the hand length)
/// and as a resource vector in the global solver (bounded by the deck).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CountVector {
    counts: [u8; MAX_VALUES],
    len: u8,
}

impl CountVector {
    pub fn zero(len: usize) -> Self {
        Self {
            counts: [0; MAX_VALUES],
            len: len as u8,
        }
    }

    /// Deck vector R: one entry per value with its printed copy count.
    pub fn deck(layout: &DeckLayout) -> Self {
        let mut vector = Self::zero(layout.value_count());
        for index in 0..layout.value_count() {
            vector.counts[index] = layout.copies(index);
        }
        vector
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> u8 {
        self.counts[index]
    }

    pub fn set(&mut self, index: usize, count: u8) {
        self.counts[index] = count;
    }

    pub fn bump(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    pub fn drop_one(&mut self, index: usize) {
        self.counts[index] -= 1;
    }

    pub fn total(&self) -> usize {
        self.counts[..self.len()].iter().map(|&c| c as usize).sum()
    }

    /// Element-wise sum, `None` when any entry would exceed `cap`.
    pub fn checked_add(&self, other: &Self, cap: &Self) -> Option<Self> {
        let mut out = *self;
        for index in 0..self.len() {
            let sum = self.counts[index] as u16 + other.counts[index] as u16;
            if sum > cap.counts[index] as u16 {
                return None;
            }
            out.counts[index] = sum as u8;
        }
        Some(out)
    }

    /// Element-wise difference, `None` when any entry would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let mut out = *self;
        for index in 0..self.len() {
            out.counts[index] = self.counts[index].checked_sub(other.counts[index])?;
        }
        Some(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts[..self.len()].iter().copied()
    }
}

impl Hash for CountVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Base-256 fold: for short value lists this is the exact packed
        // integer of the vector, beyond eight entries it wraps.
        let mut packed: u64 = 0;
        for index in 0..self.len() {
            packed = packed.wrapping_mul(256).wrapping_add(self.counts[index] as u64);
        }
        state.write_u64(packed);
    }
}

impl fmt::Debug for CountVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Everything that constrains one player's hand during enumeration.
pub struct HandConstraints<'a> {
    pub layout: &'a DeckLayout,
    pub domains: &'a [ValueSet],
    pub adjacency: &'a [(usize, AdjacentRelation)],
    pub copy_signals: &'a [(usize, u8)],
    /// Minimum copies per value (located singletons plus called copies).
    pub min_counts: CountVector,
    /// Per-value ceiling: printed copies minus copies revealed elsewhere.
    pub caps: CountVector,
}

/// Distinct signatures of all locally valid hands, with the sorted hand
/// realizing each. A sorted hand is uniquely determined by its signature,
/// so the two vectors line up one to one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureSet {
    pub signatures: Vec<CountVector>,
    pub hands: Vec<Hand>,
}

impl SignatureSet {
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Depth-first enumeration over positions, keeping the hand
/// non-decreasing via a running minimum value index.
pub fn enumerate_signatures(constraints: &HandConstraints<'_>) -> SignatureSet {
    enumerate_signatures_bounded(constraints, None).expect("unbounded search cannot expire")
}

/// As [`enumerate_signatures`], but gives up with `None` once `deadline`
/// passes. An incomplete signature set is useless to the solver, so
/// nothing partial is returned.
pub fn enumerate_signatures_bounded(
    constraints: &HandConstraints<'_>,
    deadline: Option<Instant>,
) -> Option<SignatureSet> {
    let hand_len = constraints.domains.len();
    let mut search = Search {
        constraints,
        hand_len,
        hand: Vec::with_capacity(hand_len),
        counts: CountVector::zero(constraints.layout.value_count()),
        seen: FxHashSet::default(),
        out: SignatureSet::default(),
        deadline,
        node_tick: 0,
        expired: false,
    };
    search.descend(0, 0);
    if search.expired {
        None
    } else {
        Some(search.out)
    }
}

struct Search<'a, 'b> {
    constraints: &'a HandConstraints<'b>,
    hand_len: usize,
    hand: Vec<usize>,
    counts: CountVector,
    seen: FxHashSet<CountVector>,
    out: SignatureSet,
    deadline: Option<Instant>,
    node_tick: u32,
    expired: bool,
}

impl Search<'_, '_> {
    fn descend(&mut self, position: usize, min_index: usize) {
        if self.expired {
            return;
        }
        if let Some(deadline) = self.deadline {
            self.node_tick += 1;
            if self.node_tick % DEADLINE_STRIDE == 0 && Instant::now() >= deadline {
                self.expired = true;
                return;
            }
        }

        // Outstanding minimum copies must still fit in the open slots.
        let outstanding: usize = (0..self.constraints.min_counts.len())
            .map(|index| {
                let need = self.constraints.min_counts.get(index);
                let have = self.counts.get(index);
                need.saturating_sub(have) as usize
            })
            .sum();
        if outstanding > self.hand_len - position {
            return;
        }

        if position == self.hand_len {
            if self.seen.insert(self.counts) {
                self.out.signatures.push(self.counts);
                self.out.hands.push(Hand::with_wires(
                    self.hand
                        .iter()
                        .map(|&index| self.constraints.layout.value(index))
                        .collect(),
                ));
            }
            return;
        }

        let domain = self.constraints.domains[position];
        let relation = self
            .constraints
            .adjacency
            .iter()
            .find(|&&(pos, _)| pos + 1 == position)
            .map(|&(_, relation)| relation);
        let class = self
            .constraints
            .copy_signals
            .iter()
            .find(|&&(pos, _)| pos == position)
            .map(|&(_, class)| class);

        for index in min_index..self.constraints.layout.value_count() {
            if !domain.contains(index) {
                continue;
            }
            if self.counts.get(index) >= self.constraints.caps.get(index) {
                continue;
            }
            if let Some(class) = class {
                if self.constraints.layout.copies(index) != class {
                    continue;
                }
            }
            if let Some(relation) = relation {
                let previous = *self.hand.last().expect("position > 0 when related");
                match relation {
                    AdjacentRelation::Equal if previous != index => continue,
                    AdjacentRelation::Distinct if previous == index => continue,
                    _ => {}
                }
            }

            self.hand.push(index);
            self.counts.bump(index);
            self.descend(position + 1, index);
            self.counts.drop_one(index);
            self.hand.pop();
        }
    }
}
