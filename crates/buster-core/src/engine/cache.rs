use crate::engine::signature::{CountVector, SignatureSet};
use crate::event::AdjacentRelation;
use crate::model::player::PlayerId;
use crate::model::value::ValueSet;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Full constraint fingerprint of one player's hand enumeration. Two
/// identical keys always enumerate to the same signature set, so a hit
/// can never go stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureCacheKey {
    pub player: PlayerId,
    pub domains: Vec<ValueSet>,
    pub copy_signals: Vec<(usize, u8)>,
    pub adjacency: Vec<(usize, AdjacentRelation)>,
    pub absent: ValueSet,
    pub called: ValueSet,
    pub min_counts: CountVector,
    pub caps: CountVector,
}

/// Keeps recent signature sets with LRU eviction.
#[derive(Debug, Clone, Default)]
pub struct SignatureCache {
    entries: FxHashMap<SignatureCacheKey, Arc<SignatureSet>>,
    order: VecDeque<SignatureCacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl SignatureCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &SignatureCacheKey) -> Option<Arc<SignatureSet>> {
        match self.entries.get(key) {
            Some(set) => {
                self.hits += 1;
                Some(Arc::clone(set))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: SignatureCacheKey, set: Arc<SignatureSet>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), set).is_none() {
            self.order.push_back(key);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Drops every entry belonging to `player`. Hygiene only: keys are
    /// complete fingerprints, so stale entries are unreachable anyway.
    pub fn invalidate_player(&mut self, player: PlayerId) {
        self.entries.retain(|key, _| key.player != player);
        self.order.retain(|key| key.player != player);
    }

    pub fn hit_count(&self) -> u64 {
        self.hits
    }

    pub fn miss_count(&self) -> u64 {
        self.misses
    }
}
