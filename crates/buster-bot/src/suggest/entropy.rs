use crate::suggest::{rank_calls, CallOption};
use buster_core::engine::BeliefEngine;
use rayon::prelude::*;
use tracing::debug;

/// Scored outcome of simulating one candidate call both ways.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyOutcome {
    pub call: CallOption,
    pub expected_entropy: f64,
    pub information_gain: f64,
    pub success_entropy: f64,
    pub failure_entropy: f64,
    pub success_probability: f64,
}

/// Ranks candidate calls by expected information gain.
///
/// For each candidate the engine is cloned twice: once with the call
/// succeeding (slot collapses), once failing (value removed). Both
/// clones propagate to a fixed point and the resulting system entropies
/// are mixed with the uniform success probability `1 / |D|`.
pub struct EntropySuggester<'a> {
    engine: &'a BeliefEngine,
    max_uncertainty: usize,
}

impl<'a> EntropySuggester<'a> {
    pub fn new(engine: &'a BeliefEngine) -> Self {
        Self {
            engine,
            max_uncertainty: 3,
        }
    }

    /// Only slots with at most this many candidates are simulated.
    pub fn with_max_uncertainty(mut self, max_uncertainty: usize) -> Self {
        self.max_uncertainty = max_uncertainty;
        self
    }

    pub fn best_call(&self) -> Option<EntropyOutcome> {
        self.ranked().into_iter().next()
    }

    /// All simulated candidates, best information gain first. Candidates
    /// fan out over the worker pool; each simulation is independent.
    pub fn ranked(&self) -> Vec<EntropyOutcome> {
        let current_entropy = self.engine.metrics().system_entropy;
        let board = rank_calls(self.engine);
        let candidates: Vec<CallOption> = board
            .uncertain
            .into_iter()
            .filter(|option| option.candidates <= self.max_uncertainty)
            .collect();
        debug!(
            candidates = candidates.len(),
            current_entropy, "simulating candidate calls"
        );

        let mut outcomes: Vec<EntropyOutcome> = candidates
            .into_par_iter()
            .map(|call| {
                let success_probability = 1.0 / call.candidates as f64;
                let success_entropy = self.outcome_entropy(call, true);
                let failure_entropy = self.outcome_entropy(call, false);
                let expected_entropy = success_probability * success_entropy
                    + (1.0 - success_probability) * failure_entropy;
                EntropyOutcome {
                    call,
                    expected_entropy,
                    information_gain: current_entropy - expected_entropy,
                    success_entropy,
                    failure_entropy,
                    success_probability,
                }
            })
            .collect();

        outcomes.sort_by(|a, b| b.information_gain.total_cmp(&a.information_gain));
        outcomes
    }

    fn outcome_entropy(&self, call: CallOption, success: bool) -> f64 {
        match self
            .engine
            .hypothesize(call.target, call.position, call.value, success)
        {
            Ok(settled) => settled.metrics().system_entropy,
            // An impossible branch resolves everything it touches; its
            // entropy contribution is nil.
            Err(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntropySuggester;
    use buster_core::config::GameConfig;
    use buster_core::engine::BeliefEngine;
    use buster_core::event::Event;
    use buster_core::model::hand::Hand;
    use buster_core::model::player::PlayerId;
    use buster_core::model::value::WireValue;

    fn engine() -> BeliefEngine {
        let config = GameConfig::with_distribution(3, [(1, 2), (2, 3), (3, 3), (4, 3), (5, 1)]);
        let hand = Hand::with_wires(vec![1, 2, 3, 4].into_iter().map(WireValue).collect());
        BeliefEngine::new(config, PlayerId(0), hand).unwrap()
    }

    #[test]
    fn every_simulated_call_gains_information() {
        let mut engine = engine();
        engine
            .apply(Event::SignalAbsent {
                player: PlayerId(1),
                value: WireValue(4),
            })
            .unwrap();

        let outcomes = EntropySuggester::new(&engine).with_max_uncertainty(4).ranked();
        assert!(!outcomes.is_empty());
        for outcome in &outcomes {
            assert!(outcome.information_gain >= 0.0);
            assert!(outcome.success_probability > 0.0 && outcome.success_probability <= 1.0);
        }
        for pair in outcomes.windows(2) {
            assert!(pair[0].information_gain >= pair[1].information_gain);
        }
    }

    #[test]
    fn narrow_slots_are_preferred_candidates() {
        let mut engine = engine();
        engine
            .apply(Event::SignalCopyCount {
                player: PlayerId(2),
                position: 0,
                class: 2,
            })
            .unwrap();

        let outcomes = EntropySuggester::new(&engine).ranked();
        for outcome in &outcomes {
            assert!(outcome.call.candidates <= 3);
        }
    }
}
