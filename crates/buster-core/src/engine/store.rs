use crate::engine::tracker::shifted_position;
use crate::event::AdjacentRelation;
use crate::model::player::PlayerId;
use crate::model::value::ValueSet;

/// Candidate sets for every (player, position) slot, plus the public
/// annotations that constrain them.
///
/// Every mutation that narrows a slot marks it dirty; the orchestrator
/// drains the bits to invalidate caches and skip settled players.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefStore {
    hand_len: usize,
    domains: Vec<Vec<ValueSet>>,
    revealed: Vec<Vec<bool>>,
    dirty: Vec<Vec<bool>>,
    absent: Vec<ValueSet>,
    copy_signals: Vec<Vec<(usize, u8)>>,
    adjacency: Vec<Vec<(usize, AdjacentRelation)>>,
}

impl BeliefStore {
    pub fn new(players: usize, hand_len: usize, full: ValueSet) -> Self {
        Self {
            hand_len,
            domains: vec![vec![full; hand_len]; players],
            revealed: vec![vec![false; hand_len]; players],
            dirty: vec![vec![true; hand_len]; players],
            absent: vec![ValueSet::EMPTY; players],
            copy_signals: vec![Vec::new(); players],
            adjacency: vec![Vec::new(); players],
        }
    }

    pub fn players(&self) -> usize {
        self.domains.len()
    }

    pub fn hand_len(&self) -> usize {
        self.hand_len
    }

    pub fn domain(&self, player: PlayerId, position: usize) -> ValueSet {
        self.domains[player.index()][position]
    }

    pub fn domains_of(&self, player: PlayerId) -> &[ValueSet] {
        &self.domains[player.index()]
    }

    /// Narrows a slot. The new set must not add candidates back.
    pub fn set_domain(&mut self, player: PlayerId, position: usize, set: ValueSet) -> bool {
        let current = &mut self.domains[player.index()][position];
        debug_assert!(set.is_subset_of(*current), "domains only shrink");
        if *current == set {
            return false;
        }
        *current = set;
        self.dirty[player.index()][position] = true;
        true
    }

    pub fn collapse(&mut self, player: PlayerId, position: usize, index: usize) -> bool {
        let singleton = ValueSet::singleton(index);
        let current = &mut self.domains[player.index()][position];
        if *current == singleton {
            return false;
        }
        *current = singleton;
        self.dirty[player.index()][position] = true;
        true
    }

    pub fn remove_value(&mut self, player: PlayerId, position: usize, index: usize) -> bool {
        let current = &mut self.domains[player.index()][position];
        if !current.contains(index) {
            return false;
        }
        current.remove(index);
        self.dirty[player.index()][position] = true;
        true
    }

    pub fn mark_revealed(&mut self, player: PlayerId, position: usize) {
        self.revealed[player.index()][position] = true;
        self.dirty[player.index()][position] = true;
    }

    pub fn is_revealed(&self, player: PlayerId, position: usize) -> bool {
        self.revealed[player.index()][position]
    }

    pub fn record_absent(&mut self, player: PlayerId, index: usize) {
        self.absent[player.index()].insert(index);
    }

    pub fn absent(&self, player: PlayerId) -> ValueSet {
        self.absent[player.index()]
    }

    pub fn record_copy_signal(&mut self, player: PlayerId, position: usize, class: u8) {
        let signals = &mut self.copy_signals[player.index()];
        if !signals.contains(&(position, class)) {
            signals.push((position, class));
        }
    }

    pub fn copy_signals(&self, player: PlayerId) -> &[(usize, u8)] {
        &self.copy_signals[player.index()]
    }

    pub fn record_adjacency(&mut self, player: PlayerId, position: usize, relation: AdjacentRelation) {
        let signals = &mut self.adjacency[player.index()];
        if !signals.contains(&(position, relation)) {
            signals.push((position, relation));
        }
    }

    pub fn adjacency(&self, player: PlayerId) -> &[(usize, AdjacentRelation)] {
        &self.adjacency[player.index()]
    }

    /// Removes the domain at `init` and inserts `incoming` so it sits at
    /// `fin`, shifting everything in between. Returns the outgoing
    /// domain. Reveal flags travel with their wires; position-keyed
    /// signals are shifted alongside, and adjacency signals whose pair
    /// was torn apart are dropped.
    pub fn swap_rearrange(
        &mut self,
        player: PlayerId,
        init: usize,
        fin: usize,
        incoming: ValueSet,
    ) -> ValueSet {
        let row = &mut self.domains[player.index()];
        let outgoing = row.remove(init);
        row.insert(fin, incoming);

        let flags = &mut self.revealed[player.index()];
        flags.remove(init);
        flags.insert(fin, false);

        self.copy_signals[player.index()].retain_mut(|signal| {
            if signal.0 == init {
                return false;
            }
            signal.0 = shifted_position(signal.0, init, fin);
            true
        });
        self.adjacency[player.index()].retain_mut(|signal| {
            let left = signal.0;
            let right = signal.0 + 1;
            if left == init || right == init {
                return false;
            }
            let new_left = shifted_position(left, init, fin);
            if shifted_position(right, init, fin) != new_left + 1 {
                return false;
            }
            signal.0 = new_left;
            true
        });

        for position in 0..self.hand_len {
            self.dirty[player.index()][position] = true;
        }
        outgoing
    }

    pub fn player_dirty(&self, player: PlayerId) -> bool {
        self.dirty[player.index()].iter().any(|&bit| bit)
    }

    /// Players with pending dirty bits; clears the bits.
    pub fn drain_dirty(&mut self) -> Vec<PlayerId> {
        let mut players = Vec::new();
        for (index, row) in self.dirty.iter_mut().enumerate() {
            if row.iter().any(|&bit| bit) {
                players.push(PlayerId::from_index(index));
                row.iter_mut().for_each(|bit| *bit = false);
            }
        }
        players
    }
}

#[cfg(test)]
mod tests {
    use super::BeliefStore;
    use crate::event::AdjacentRelation;
    use crate::model::player::PlayerId;
    use crate::model::value::ValueSet;

    fn store() -> BeliefStore {
        BeliefStore::new(2, 4, ValueSet::full(5))
    }

    #[test]
    fn narrowing_marks_dirty() {
        let mut store = store();
        store.drain_dirty();
        assert!(!store.player_dirty(PlayerId(0)));

        assert!(store.remove_value(PlayerId(0), 1, 3));
        assert!(store.player_dirty(PlayerId(0)));
        assert!(!store.player_dirty(PlayerId(1)));
        assert!(!store.remove_value(PlayerId(0), 1, 3));
    }

    #[test]
    fn collapse_and_reveal() {
        let mut store = store();
        store.collapse(PlayerId(1), 2, 4);
        store.mark_revealed(PlayerId(1), 2);
        assert_eq!(store.domain(PlayerId(1), 2).sole(), Some(4));
        assert!(store.is_revealed(PlayerId(1), 2));
        assert!(!store.is_revealed(PlayerId(1), 1));
    }

    #[test]
    fn swap_rearranges_domains_and_flags() {
        let mut store = store();
        store.collapse(PlayerId(0), 0, 0);
        store.mark_revealed(PlayerId(0), 0);
        store.collapse(PlayerId(0), 3, 4);

        let incoming = ValueSet::singleton(2);
        let outgoing = store.swap_rearrange(PlayerId(0), 3, 1, incoming);
        assert_eq!(outgoing.sole(), Some(4));
        assert_eq!(store.domain(PlayerId(0), 1).sole(), Some(2));
        // the revealed wire at position 0 stays put
        assert!(store.is_revealed(PlayerId(0), 0));
        assert!(!store.is_revealed(PlayerId(0), 1));
    }

    #[test]
    fn swap_drops_torn_adjacency_signals() {
        let mut store = store();
        store.record_adjacency(PlayerId(0), 0, AdjacentRelation::Equal);
        store.record_adjacency(PlayerId(0), 2, AdjacentRelation::Distinct);
        store.record_copy_signal(PlayerId(0), 2, 3);

        // wire leaves position 3 and the received one lands at 0: the
        // (2,3) pair is torn, the (0,1) pair slides right intact
        store.swap_rearrange(PlayerId(0), 3, 0, ValueSet::full(5));
        assert_eq!(
            store.adjacency(PlayerId(0)),
            &[(1, AdjacentRelation::Equal)]
        );
        assert_eq!(store.copy_signals(PlayerId(0)), &[(3, 3)]);
    }
}
