use crate::config::DeckLayout;
use crate::engine::error::Contradiction;
use crate::model::player::PlayerId;
use crate::model::value::ValueSet;

/// Where the copies of one value are, as far as this observer knows.
///
/// A copy is in exactly one bucket:
/// - `revealed`: position publicly confirmed;
/// - `certain`: position deduced, not publicly confirmed;
/// - `called`: owner demonstrated possession with a failed call, position
///   unknown;
/// - the remainder is uncertain.
///
/// Transitions only move towards more knowledge: called copies become
/// certain once a position is deduced, and anything becomes revealed when
/// confirmed in public.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueTracker {
    total: u8,
    revealed: Vec<(PlayerId, usize)>,
    certain: Vec<(PlayerId, usize)>,
    called: Vec<PlayerId>,
}

impl ValueTracker {
    pub fn new(total: u8) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn certain_count(&self) -> usize {
        self.certain.len()
    }

    pub fn called_count(&self) -> usize {
        self.called.len()
    }

    /// Copies whose owner is unknown. Negative means the state is
    /// contradictory; the table surfaces that as an error.
    pub fn uncertain(&self) -> i32 {
        self.total as i32
            - self.revealed.len() as i32
            - self.certain.len() as i32
            - self.called.len() as i32
    }

    pub fn add_revealed(&mut self, player: PlayerId, position: usize) {
        self.certain
            .retain(|&(p, pos)| !(p == player && pos == position));
        self.called.retain(|&p| p != player);
        if !self.revealed.contains(&(player, position)) {
            self.revealed.push((player, position));
        }
    }

    /// Records a deduced position. Returns false when the slot was
    /// already tracked.
    pub fn add_certain(&mut self, player: PlayerId, position: usize) -> bool {
        if self.revealed.contains(&(player, position))
            || self.certain.contains(&(player, position))
        {
            return false;
        }
        self.called.retain(|&p| p != player);
        self.certain.push((player, position));
        true
    }

    /// Records demonstrated possession without a position. A player who
    /// already has a revealed or certain copy proved nothing new, so the
    /// call is not double-counted.
    pub fn add_called(&mut self, player: PlayerId) {
        if self.revealed.iter().any(|&(p, _)| p == player)
            || self.certain.iter().any(|&(p, _)| p == player)
        {
            return;
        }
        if !self.called.contains(&player) {
            self.called.push(player);
        }
    }

    pub fn has_called(&self, player: PlayerId) -> bool {
        self.called.contains(&player)
    }

    pub fn remove_called(&mut self, player: PlayerId) {
        self.called.retain(|&p| p != player);
    }

    pub fn revealed_positions(&self, player: PlayerId) -> impl Iterator<Item = usize> + '_ {
        self.revealed
            .iter()
            .filter(move |&&(p, _)| p == player)
            .map(|&(_, pos)| pos)
    }

    pub fn certain_positions(&self, player: PlayerId) -> impl Iterator<Item = usize> + '_ {
        self.certain
            .iter()
            .filter(move |&&(p, _)| p == player)
            .map(|&(_, pos)| pos)
    }

    pub fn is_revealed_at(&self, player: PlayerId, position: usize) -> bool {
        self.revealed.contains(&(player, position))
    }

    fn shift_entries(&mut self, update: &SwapUpdate) {
        for entry in &mut self.revealed {
            if entry.0 == update.first {
                entry.1 = shifted_position(entry.1, update.init_first, update.final_first);
            } else if entry.0 == update.second {
                entry.1 = shifted_position(entry.1, update.init_second, update.final_second);
            }
        }

        let mut moved = Vec::new();
        self.certain.retain_mut(|entry| {
            if entry.0 == update.first && entry.1 == update.init_first {
                if !update.drop_into_second {
                    moved.push((update.second, update.final_second));
                }
                false
            } else if entry.0 == update.second && entry.1 == update.init_second {
                if !update.drop_into_first {
                    moved.push((update.first, update.final_first));
                }
                false
            } else {
                if entry.0 == update.first {
                    entry.1 = shifted_position(entry.1, update.init_first, update.final_first);
                } else if entry.0 == update.second {
                    entry.1 = shifted_position(entry.1, update.init_second, update.final_second);
                }
                true
            }
        });
        for entry in moved {
            let _ = self.add_certain(entry.0, entry.1);
        }
    }
}

/// One tracker per value, indexed like the layout's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerTable {
    trackers: Vec<ValueTracker>,
}

/// Everything the trackers need to follow a swap: position shifts for the
/// two participants and the old candidate sets of the surrendered slots.
#[derive(Debug, Clone, Copy)]
pub struct SwapUpdate {
    pub first: PlayerId,
    pub second: PlayerId,
    pub init_first: usize,
    pub init_second: usize,
    pub final_first: usize,
    pub final_second: usize,
    pub given_first: ValueSet,
    pub given_second: ValueSet,
    /// Set when the observer is the receiving side: the moved certain
    /// entry is dropped and replaced by direct knowledge of the wire.
    pub drop_into_first: bool,
    pub drop_into_second: bool,
}

impl TrackerTable {
    pub fn new(layout: &DeckLayout) -> Self {
        Self {
            trackers: (0..layout.value_count())
                .map(|index| ValueTracker::new(layout.copies(index)))
                .collect(),
        }
    }

    pub fn tracker(&self, index: usize) -> &ValueTracker {
        &self.trackers[index]
    }

    pub fn tracker_mut(&mut self, index: usize) -> &mut ValueTracker {
        &mut self.trackers[index]
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Total copies revealed anywhere except `player`'s hand.
    pub fn revealed_elsewhere(&self, index: usize, player: PlayerId) -> usize {
        self.trackers[index]
            .revealed
            .iter()
            .filter(|&&(p, _)| p != player)
            .count()
    }

    /// Values `player` has called without a located copy.
    pub fn called_set(&self, player: PlayerId) -> ValueSet {
        let mut set = ValueSet::EMPTY;
        for (index, tracker) in self.trackers.iter().enumerate() {
            if tracker.has_called(player) {
                set.insert(index);
            }
        }
        set
    }

    pub fn apply_swap(&mut self, update: &SwapUpdate) {
        for (index, tracker) in self.trackers.iter_mut().enumerate() {
            tracker.shift_entries(update);
            if update.given_first.contains(index) {
                tracker.remove_called(update.first);
            }
            if update.given_second.contains(index) {
                tracker.remove_called(update.second);
            }
        }
    }

    /// Every bucket total must stay within the printed copy count.
    pub fn check_conservation(&self, layout: &DeckLayout) -> Result<(), Contradiction> {
        for (index, tracker) in self.trackers.iter().enumerate() {
            if tracker.uncertain() < 0 {
                return Err(Contradiction::NegativeCounter {
                    value: layout.value(index),
                });
            }
        }
        Ok(())
    }
}

/// Where a wire that stayed in its owner's hand ends up after the owner
/// removed the wire at `init` and slotted the received one in at `fin`
/// (positions in the re-sorted hand).
pub fn shifted_position(old: usize, init: usize, fin: usize) -> usize {
    if old == init {
        return fin;
    }
    if old < init {
        if old < fin {
            old
        } else {
            old + 1
        }
    } else if old > fin {
        old
    } else {
        old - 1
    }
}
