//! The inference engine: one [`BeliefEngine`] per observing player.
//!
//! Composed of:
//! - `store`: candidate sets per slot plus public annotations.
//! - `tracker`: per-value revealed / certain / called bookkeeping.
//! - `filters`: local propagation passes run to a fixed point.
//! - `signature` / `global`: hand enumeration and the resource solver.
//! - `cache`: memoized signature sets keyed by constraint fingerprints.
//! - `metrics`: entropy snapshots of the belief state.

pub mod cache;
pub mod error;
pub mod filters;
pub mod global;
pub mod metrics;
pub mod signature;
pub mod store;
pub mod tracker;

pub use error::{Contradiction, EngineError, InvalidEvent};
pub use metrics::DeductionMetrics;

use crate::config::{DeckLayout, GameConfig, PlayMode};
use crate::engine::cache::{SignatureCache, SignatureCacheKey};
use crate::engine::filters::FilterOptions;
use crate::engine::global::GlobalHalt;
use crate::engine::signature::{
    enumerate_signatures_bounded, CountVector, HandConstraints, SignatureSet,
};
use crate::engine::store::BeliefStore;
use crate::engine::tracker::{SwapUpdate, TrackerTable};
use crate::event::{AdjacentRelation, Event, EventLog};
use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::value::{ValueSet, WireValue};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SIGNATURE_CACHE_CAPACITY: usize = 64;

/// Revealed / certain / called / uncertain copies of one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCounts {
    pub revealed: usize,
    pub certain: usize,
    pub called: usize,
    pub uncertain: usize,
}

/// Deduction state as seen by a single player.
///
/// Events are applied in submission order; each application runs the
/// local filters to a fixed point, optionally the global solver, then the
/// local filters again. A contradiction leaves the failing state in place
/// for inspection; recovery is replaying the log.
#[derive(Debug, Clone)]
pub struct BeliefEngine {
    config: GameConfig,
    layout: DeckLayout,
    perspective: PlayerId,
    own_hand: Hand,
    store: BeliefStore,
    trackers: TrackerTable,
    cache: SignatureCache,
    log: EventLog,
    wrong_calls: u32,
}

impl BeliefEngine {
    pub fn new(
        config: GameConfig,
        perspective: PlayerId,
        own_hand: Hand,
    ) -> Result<Self, EngineError> {
        let layout = config.layout()?;
        if perspective.index() >= layout.players() {
            return Err(InvalidEvent::UnknownPlayer(perspective).into());
        }
        if own_hand.len() != layout.hand_len() {
            return Err(EngineError::MalformedHand {
                expected: layout.hand_len(),
                actual: own_hand.len(),
            });
        }

        let mut store = BeliefStore::new(layout.players(), layout.hand_len(), layout.full_set());
        let mut trackers = TrackerTable::new(&layout);
        for (position, &wire) in own_hand.wires().iter().enumerate() {
            let index = layout
                .index_of(wire)
                .ok_or(InvalidEvent::UnknownValue(wire))?;
            store.collapse(perspective, position, index);
            trackers.tracker_mut(index).add_certain(perspective, position);
        }

        let mut engine = Self {
            config,
            layout,
            perspective,
            own_hand,
            store,
            trackers,
            cache: SignatureCache::new(SIGNATURE_CACHE_CAPACITY),
            log: EventLog::new(),
            wrong_calls: 0,
        };
        // Settle the initial state with local filters only; the global
        // solver first runs once events start narrowing hands.
        let filter_options = engine.filter_options();
        filters::run_to_fixed_point(
            &mut engine.store,
            &mut engine.trackers,
            &engine.layout,
            filter_options,
        )?;
        engine.drain_dirty_into_cache();
        Ok(engine)
    }

    /// Rebuilds the state an observer reaches after the logged events.
    pub fn replay(
        config: GameConfig,
        perspective: PlayerId,
        own_hand: Hand,
        log: &EventLog,
    ) -> Result<Self, EngineError> {
        let mut engine = Self::new(config, perspective, own_hand)?;
        for event in log.iter() {
            engine.apply(event.clone())?;
        }
        Ok(engine)
    }

    /// Validates, records, and propagates one public action.
    pub fn apply(&mut self, event: Event) -> Result<(), EngineError> {
        self.validate(&event)?;
        self.log.push(event.clone());
        self.mutate(&event)?;
        self.propagate()
    }

    /// Re-runs the whole propagation pipeline. A no-op on settled state;
    /// useful after toggling solver switches on a loaded engine.
    pub fn refilter(&mut self) -> Result<(), EngineError> {
        self.propagate()
    }

    // ------------------------------------------------------------------
    // queries

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    pub fn perspective(&self) -> PlayerId {
        self.perspective
    }

    pub fn own_hand(&self) -> &Hand {
        &self.own_hand
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn domain(&self, player: PlayerId, position: usize) -> ValueSet {
        self.store.domain(player, position)
    }

    /// Candidate labels for a slot, in value order.
    pub fn domain_values(&self, player: PlayerId, position: usize) -> Vec<WireValue> {
        self.store
            .domain(player, position)
            .iter()
            .map(|index| self.layout.value(index))
            .collect()
    }

    pub fn is_revealed(&self, player: PlayerId, position: usize) -> bool {
        self.store.is_revealed(player, position)
    }

    /// Slots whose value is pinned down, revealed or deduced.
    pub fn certain_slots(&self) -> Vec<(PlayerId, usize, WireValue)> {
        let mut slots = Vec::new();
        for player in PlayerId::seats(self.layout.players()) {
            for position in 0..self.layout.hand_len() {
                if let Some(index) = self.store.domain(player, position).sole() {
                    slots.push((player, position, self.layout.value(index)));
                }
            }
        }
        slots
    }

    pub fn value_counts(&self, value: WireValue) -> Option<ValueCounts> {
        let index = self.layout.index_of(value)?;
        let tracker = self.trackers.tracker(index);
        Some(ValueCounts {
            revealed: tracker.revealed_count(),
            certain: tracker.certain_count(),
            called: tracker.called_count(),
            uncertain: tracker.uncertain().max(0) as usize,
        })
    }

    pub fn is_win(&self) -> bool {
        PlayerId::seats(self.layout.players()).all(|player| {
            (0..self.layout.hand_len())
                .all(|position| self.store.domain(player, position).len() == 1)
        })
    }

    pub fn is_lost(&self) -> bool {
        self.wrong_calls >= self.config.max_wrong_calls
    }

    pub fn wrong_calls(&self) -> u32 {
        self.wrong_calls
    }

    pub fn metrics(&self) -> DeductionMetrics {
        DeductionMetrics::from_store(&self.store)
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hit_count(), self.cache.miss_count())
    }

    /// All locally valid hands for a player, via the signature cache.
    /// `None` when the enumeration blows the configured budget; callers
    /// fall back to approximations over the raw domains.
    pub fn enumerate_hands(&mut self, player: PlayerId) -> Option<Vec<Hand>> {
        let key = self.fingerprint(player);
        if let Some(set) = self.cache.get(&key) {
            return Some(set.hands.clone());
        }
        let deadline = self.solver_deadline();
        let set = Arc::new(enumerate_signatures_bounded(
            &constraints_of(&self.layout, &key),
            deadline,
        )?);
        let hands = set.hands.clone();
        self.cache.insert(key, set);
        Some(hands)
    }

    /// Clone of this engine with a hypothetical call outcome applied and
    /// propagated. Used by suggesters to score candidate calls.
    pub fn hypothesize(
        &self,
        target: PlayerId,
        position: usize,
        value: WireValue,
        success: bool,
    ) -> Result<BeliefEngine, EngineError> {
        let index = self
            .layout
            .index_of(value)
            .ok_or(InvalidEvent::UnknownValue(value))?;
        let mut clone = self.clone();
        if success {
            clone.narrow_to(target, position, index)?;
        } else {
            clone.strike_out(target, position, index)?;
        }
        clone.propagate()?;
        Ok(clone)
    }

    // ------------------------------------------------------------------
    // event application

    fn validate(&self, event: &Event) -> Result<(), InvalidEvent> {
        let hand_len = self.layout.hand_len();
        let check_player = |player: PlayerId| {
            if player.index() >= self.layout.players() {
                Err(InvalidEvent::UnknownPlayer(player))
            } else {
                Ok(())
            }
        };
        let check_position = |position: usize| {
            if position >= hand_len {
                Err(InvalidEvent::PositionOutOfRange {
                    position,
                    hand_len,
                })
            } else {
                Ok(())
            }
        };
        let check_value = |value: WireValue| {
            self.layout
                .index_of(value)
                .map(|_| ())
                .ok_or(InvalidEvent::UnknownValue(value))
        };

        match *event {
            Event::Call {
                caller,
                target,
                position,
                value,
                caller_position,
                ..
            } => {
                check_player(caller)?;
                check_player(target)?;
                check_position(position)?;
                check_value(value)?;
                if let Some(own) = caller_position {
                    check_position(own)?;
                }
                if caller == target {
                    return Err(InvalidEvent::SelfCall);
                }
                if self.config.mode == PlayMode::Simulation
                    && caller == self.perspective
                    && !self.own_hand.contains(value)
                {
                    return Err(InvalidEvent::CallerLacksValue { caller, value });
                }
                Ok(())
            }
            Event::DoubleReveal {
                player,
                value,
                first,
                second,
            } => {
                check_player(player)?;
                check_value(value)?;
                check_position(first)?;
                check_position(second)?;
                if first == second {
                    return Err(InvalidEvent::DuplicatePosition);
                }
                Ok(())
            }
            Event::Swap {
                first,
                second,
                init_first,
                init_second,
                final_first,
                final_second,
                gave_first,
                gave_second,
            } => {
                check_player(first)?;
                check_player(second)?;
                if first == second {
                    return Err(InvalidEvent::SelfSwap);
                }
                check_position(init_first)?;
                check_position(init_second)?;
                check_position(final_first)?;
                check_position(final_second)?;
                check_value(gave_first)?;
                check_value(gave_second)?;
                for (player, position) in [(first, init_first), (second, init_second)] {
                    if self.store.is_revealed(player, position) {
                        return Err(InvalidEvent::RevealedSwapSlot { player, position });
                    }
                }
                Ok(())
            }
            Event::SignalCertain {
                player,
                position,
                value,
            } => {
                check_player(player)?;
                check_position(position)?;
                check_value(value)
            }
            Event::SignalAbsent { player, value } => {
                check_player(player)?;
                check_value(value)
            }
            Event::SignalCopyCount {
                player,
                position,
                class,
            } => {
                check_player(player)?;
                check_position(position)?;
                if self.layout.class_set(class).is_empty() {
                    return Err(InvalidEvent::UnknownCopyClass(class));
                }
                Ok(())
            }
            Event::SignalAdjacency {
                player, position, ..
            } => {
                check_player(player)?;
                check_position(position)?;
                if position + 1 >= hand_len {
                    return Err(InvalidEvent::NoRightNeighbour(position));
                }
                Ok(())
            }
        }
    }

    fn mutate(&mut self, event: &Event) -> Result<(), EngineError> {
        match *event {
            Event::Call {
                caller,
                target,
                position,
                value,
                success,
                caller_position,
            } => {
                let index = self.index_of(value);
                if success {
                    self.narrow_to(target, position, index)?;
                    self.store.mark_revealed(target, position);
                    self.trackers.tracker_mut(index).add_revealed(target, position);
                    if let Some(own) = caller_position {
                        self.narrow_to(caller, own, index)?;
                        self.store.mark_revealed(caller, own);
                        self.trackers.tracker_mut(index).add_revealed(caller, own);
                    }
                } else {
                    self.wrong_calls += 1;
                    self.strike_out(target, position, index)?;
                    // The caller committed to holding the value. Our own
                    // failed calls teach us nothing about our hand.
                    if caller != self.perspective {
                        self.trackers.tracker_mut(index).add_called(caller);
                    }
                }
            }
            Event::DoubleReveal {
                player,
                value,
                first,
                second,
            } => {
                let index = self.index_of(value);
                for position in [first, second] {
                    self.narrow_to(player, position, index)?;
                    self.store.mark_revealed(player, position);
                    self.trackers.tracker_mut(index).add_revealed(player, position);
                }
            }
            Event::Swap { .. } => self.mutate_swap(event)?,
            Event::SignalCertain {
                player,
                position,
                value,
            } => {
                let index = self.index_of(value);
                self.narrow_to(player, position, index)?;
                self.trackers.tracker_mut(index).add_certain(player, position);
            }
            Event::SignalAbsent { player, value } => {
                let index = self.index_of(value);
                self.store.record_absent(player, index);
                for position in 0..self.layout.hand_len() {
                    self.strike_out(player, position, index)?;
                }
            }
            Event::SignalCopyCount {
                player,
                position,
                class,
            } => {
                self.store.record_copy_signal(player, position, class);
                let narrowed = self
                    .store
                    .domain(player, position)
                    .intersect(self.layout.class_set(class));
                if narrowed.is_empty() {
                    return Err(Contradiction::EmptyDomain { player, position }.into());
                }
                self.store.set_domain(player, position, narrowed);
            }
            Event::SignalAdjacency {
                player,
                position,
                relation,
            } => {
                self.store.record_adjacency(player, position, relation);
                match relation {
                    AdjacentRelation::Equal => {
                        let shared = self
                            .store
                            .domain(player, position)
                            .intersect(self.store.domain(player, position + 1));
                        if shared.is_empty() {
                            return Err(Contradiction::EmptyDomain { player, position }.into());
                        }
                        self.store.set_domain(player, position, shared);
                        self.store.set_domain(player, position + 1, shared);
                    }
                    AdjacentRelation::Distinct => {
                        if let Some(index) = self.store.domain(player, position).sole() {
                            self.strike_out(player, position + 1, index)?;
                        }
                        if let Some(index) = self.store.domain(player, position + 1).sole() {
                            self.strike_out(player, position, index)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn mutate_swap(&mut self, event: &Event) -> Result<(), EngineError> {
        let Event::Swap {
            first,
            second,
            init_first,
            init_second,
            final_first,
            final_second,
            gave_first,
            gave_second,
        } = *event
        else {
            unreachable!("mutate_swap is only called for swap events");
        };
        let given_first = self.store.domain(first, init_first);
        let given_second = self.store.domain(second, init_second);
        let idx_first = self.index_of(gave_first);
        let idx_second = self.index_of(gave_second);

        self.trackers.apply_swap(&SwapUpdate {
            first,
            second,
            init_first,
            init_second,
            final_first,
            final_second,
            given_first,
            given_second,
            drop_into_first: self.perspective == first,
            drop_into_second: self.perspective == second,
        });

        // Participants know what they received; everyone else inherits
        // the candidate set that travelled with the wire.
        let incoming_first = if self.perspective == first {
            ValueSet::singleton(idx_second)
        } else {
            given_second
        };
        let incoming_second = if self.perspective == second {
            ValueSet::singleton(idx_first)
        } else {
            given_first
        };
        self.store
            .swap_rearrange(first, init_first, final_first, incoming_first);
        self.store
            .swap_rearrange(second, init_second, final_second, incoming_second);

        if self.perspective == first {
            self.trackers
                .tracker_mut(idx_second)
                .add_certain(first, final_first);
            self.own_hand.apply_swap(init_first, final_first, gave_second);
        }
        if self.perspective == second {
            self.trackers
                .tracker_mut(idx_first)
                .add_certain(second, final_second);
            self.own_hand.apply_swap(init_second, final_second, gave_first);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // propagation

    fn propagate(&mut self) -> Result<(), EngineError> {
        let filter_options = self.filter_options();
        let rounds = filters::run_to_fixed_point(
            &mut self.store,
            &mut self.trackers,
            &self.layout,
            filter_options,
        )?;

        if self.config.global_solver {
            match self.global_step() {
                Ok(()) => {
                    let filter_options = self.filter_options();
                    filters::run_to_fixed_point(
                        &mut self.store,
                        &mut self.trackers,
                        &self.layout,
                        filter_options,
                    )?;
                }
                Err(GlobalHalt::OutOfBudget) => {
                    warn!("global solver out of budget, keeping local-only domains");
                }
                Err(GlobalHalt::Contradiction(contradiction)) => {
                    return Err(contradiction.into());
                }
            }
        }

        debug!(rounds, "propagation settled");
        self.drain_dirty_into_cache();
        Ok(())
    }

    fn global_step(&mut self) -> Result<(), GlobalHalt> {
        let deadline = self.solver_deadline();
        let players = self.layout.players();
        let mut sets: Vec<Option<Arc<SignatureSet>>> = vec![None; players];
        let mut pending: Vec<(usize, SignatureCacheKey)> = Vec::new();
        for player in PlayerId::seats(players) {
            let key = self.fingerprint(player);
            match self.cache.get(&key) {
                Some(hit) => sets[player.index()] = Some(hit),
                None => pending.push((player.index(), key)),
            }
        }

        // Workers receive the fingerprint itself: plain data, no shared
        // mutable state, outputs keyed by player index.
        let layout = &self.layout;
        let generated: Vec<(usize, SignatureCacheKey, Option<SignatureSet>)> = pending
            .into_par_iter()
            .map(|(index, key)| {
                let set = enumerate_signatures_bounded(&constraints_of(layout, &key), deadline);
                (index, key, set)
            })
            .collect();

        for (index, key, set) in generated {
            let Some(set) = set else {
                return Err(GlobalHalt::OutOfBudget);
            };
            let set = Arc::new(set);
            self.cache.insert(key, Arc::clone(&set));
            sets[index] = Some(set);
        }
        let sets: Vec<Arc<SignatureSet>> = sets
            .into_iter()
            .map(|set| set.expect("every player enumerated"))
            .collect();

        let projection = global::solve(&self.layout, &sets, deadline)?;
        for (index, domains) in projection.domains.into_iter().enumerate() {
            let Some(domains) = domains else { continue };
            let player = PlayerId::from_index(index);
            for (position, projected) in domains.into_iter().enumerate() {
                let narrowed = self.store.domain(player, position).intersect(projected);
                if narrowed.is_empty() {
                    return Err(GlobalHalt::Contradiction(Contradiction::EmptyDomain {
                        player,
                        position,
                    }));
                }
                self.store.set_domain(player, position, narrowed);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // helpers

    fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            chain_filter: self.config.chain_filter,
            max_subset_len: self.config.max_subset_len,
        }
    }

    fn solver_deadline(&self) -> Option<Instant> {
        self.config
            .global_budget_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms))
    }

    fn index_of(&self, value: WireValue) -> usize {
        self.layout
            .index_of(value)
            .expect("values are validated before mutation")
    }

    fn narrow_to(
        &mut self,
        player: PlayerId,
        position: usize,
        index: usize,
    ) -> Result<(), Contradiction> {
        let narrowed = self
            .store
            .domain(player, position)
            .intersect(ValueSet::singleton(index));
        if narrowed.is_empty() {
            return Err(Contradiction::EmptyDomain { player, position });
        }
        self.store.set_domain(player, position, narrowed);
        Ok(())
    }

    fn strike_out(
        &mut self,
        player: PlayerId,
        position: usize,
        index: usize,
    ) -> Result<(), Contradiction> {
        let domain = self.store.domain(player, position);
        if !domain.contains(index) {
            return Ok(());
        }
        let narrowed = domain.difference(ValueSet::singleton(index));
        if narrowed.is_empty() {
            return Err(Contradiction::EmptyDomain { player, position });
        }
        self.store.set_domain(player, position, narrowed);
        Ok(())
    }

    /// Complete enumeration fingerprint for one player, also the cache
    /// key. Minimum counts come from located singletons plus called
    /// copies; caps subtract copies revealed in other hands.
    fn fingerprint(&self, player: PlayerId) -> SignatureCacheKey {
        let value_count = self.layout.value_count();
        let domains = self.store.domains_of(player).to_vec();
        let called = self.trackers.called_set(player);

        let mut min_counts = CountVector::zero(value_count);
        for domain in &domains {
            if let Some(index) = domain.sole() {
                min_counts.bump(index);
            }
        }
        for index in called.iter() {
            min_counts.bump(index);
        }

        let mut caps = CountVector::zero(value_count);
        for index in 0..value_count {
            let elsewhere = self.trackers.revealed_elsewhere(index, player);
            caps.set(
                index,
                (self.layout.copies(index) as usize).saturating_sub(elsewhere) as u8,
            );
        }

        SignatureCacheKey {
            player,
            domains,
            copy_signals: self.store.copy_signals(player).to_vec(),
            adjacency: self.store.adjacency(player).to_vec(),
            absent: self.store.absent(player),
            called,
            min_counts,
            caps,
        }
    }

    fn drain_dirty_into_cache(&mut self) {
        for player in self.store.drain_dirty() {
            self.cache.invalidate_player(player);
        }
    }
}

fn constraints_of<'a>(layout: &'a DeckLayout, key: &'a SignatureCacheKey) -> HandConstraints<'a> {
    HandConstraints {
        layout,
        domains: &key.domains,
        adjacency: &key.adjacency,
        copy_signals: &key.copy_signals,
        min_counts: key.min_counts,
        caps: key.caps,
    }
}

#[cfg(test)]
mod tests {
    use super::{BeliefEngine, EngineError, InvalidEvent};
    use crate::config::GameConfig;
    use crate::event::Event;
    use crate::model::hand::Hand;
    use crate::model::player::PlayerId;
    use crate::model::value::WireValue;

    fn hand(labels: &[u16]) -> Hand {
        Hand::with_wires(labels.iter().copied().map(WireValue).collect())
    }

    fn three_player_config() -> GameConfig {
        GameConfig::with_distribution(3, [(1, 2), (2, 3), (3, 3), (4, 3), (5, 1)])
    }

    fn engine() -> BeliefEngine {
        BeliefEngine::new(three_player_config(), PlayerId(0), hand(&[1, 2, 3, 4])).unwrap()
    }

    #[test]
    fn own_hand_starts_as_singletons() {
        let engine = engine();
        for (position, &wire) in engine.own_hand().wires().iter().enumerate() {
            assert_eq!(engine.domain_values(PlayerId(0), position), vec![wire]);
        }
        assert!(engine.domain(PlayerId(1), 0).len() > 1);
    }

    #[test]
    fn malformed_hand_is_rejected() {
        let result = BeliefEngine::new(three_player_config(), PlayerId(0), hand(&[1, 2]));
        assert!(matches!(
            result,
            Err(EngineError::MalformedHand {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn failed_call_strikes_and_registers_possession() {
        let mut engine = engine();
        engine
            .apply(Event::Call {
                caller: PlayerId(1),
                target: PlayerId(2),
                position: 0,
                value: WireValue(3),
                success: false,
                caller_position: None,
            })
            .unwrap();

        assert_eq!(engine.wrong_calls(), 1);
        assert!(!engine.is_lost());
        let counts = engine.value_counts(WireValue(3)).unwrap();
        assert_eq!(counts.called, 1);
        assert!(!engine
            .domain_values(PlayerId(2), 0)
            .contains(&WireValue(3)));
    }

    #[test]
    fn own_failed_call_does_not_count_as_possession() {
        let mut engine = engine();
        engine
            .apply(Event::Call {
                caller: PlayerId(0),
                target: PlayerId(1),
                position: 0,
                value: WireValue(2),
                success: false,
                caller_position: None,
            })
            .unwrap();
        // our copy of 2 is already certain at our own slot
        let counts = engine.value_counts(WireValue(2)).unwrap();
        assert_eq!(counts.called, 0);
    }

    #[test]
    fn simulation_mode_rejects_calls_without_the_value() {
        let mut engine = engine();
        let result = engine.apply(Event::Call {
            caller: PlayerId(0),
            target: PlayerId(1),
            position: 0,
            value: WireValue(5),
            success: false,
            caller_position: None,
        });
        assert!(matches!(
            result,
            Err(EngineError::InvalidEvent(InvalidEvent::CallerLacksValue { .. }))
        ));
        // rejected before mutation: no strike, no log entry
        assert_eq!(engine.wrong_calls(), 0);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn copy_count_signal_restricts_slot() {
        let mut engine = engine();
        engine
            .apply(Event::SignalCopyCount {
                player: PlayerId(1),
                position: 3,
                class: 1,
            })
            .unwrap();
        // only the 5 has a single copy
        assert_eq!(engine.domain_values(PlayerId(1), 3), vec![WireValue(5)]);
    }

    #[test]
    fn hypothesize_leaves_the_original_untouched() {
        let engine = engine();
        let before = engine.domain(PlayerId(1), 2);
        let outcome = engine
            .hypothesize(PlayerId(1), 2, WireValue(4), true)
            .unwrap();
        assert_eq!(engine.domain(PlayerId(1), 2), before);
        assert_eq!(outcome.domain_values(PlayerId(1), 2), vec![WireValue(4)]);
    }
}
