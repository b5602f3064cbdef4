//! Deductions only the resource solver can make: adjacency signals are
//! invisible to the local filters, so joint feasibility across hands is
//! the global solver's job.

use buster_core::config::GameConfig;
use buster_core::engine::{BeliefEngine, EngineError};
use buster_core::event::{AdjacentRelation, Event};
use buster_core::model::hand::Hand;
use buster_core::model::player::PlayerId;
use buster_core::model::value::WireValue;

fn hand(labels: &[u16]) -> Hand {
    Hand::with_wires(labels.iter().copied().map(WireValue).collect())
}

/// P0 holds both 3s, leaving {1,1,2,2} for P1 and P2. Both announce an
/// equal pair, then P1 pins its pair to 1s: the solver must conclude P2
/// holds the 2s, and a later claim that P2 also has a 1 is refuted.
fn pair_signals() -> Vec<Event> {
    vec![
        Event::SignalAdjacency {
            player: PlayerId(1),
            position: 0,
            relation: AdjacentRelation::Equal,
        },
        Event::SignalAdjacency {
            player: PlayerId(2),
            position: 0,
            relation: AdjacentRelation::Equal,
        },
        Event::SignalCertain {
            player: PlayerId(1),
            position: 0,
            value: WireValue(1),
        },
        Event::SignalCertain {
            player: PlayerId(2),
            position: 0,
            value: WireValue(1),
        },
    ]
}

fn observer(global: bool) -> BeliefEngine {
    let mut config = GameConfig::with_distribution(3, [(1, 2), (2, 2), (3, 2)]);
    config.global_solver = global;
    BeliefEngine::new(config, PlayerId(0), hand(&[3, 3])).unwrap()
}

#[test]
fn solver_projects_the_paired_hands_apart() {
    let mut engine = observer(true);
    let events = pair_signals();
    for event in &events[..3] {
        engine.apply(event.clone()).unwrap();
    }

    // P1's pair is 1-1, so the solver hands P2 the 2s. No local filter
    // reasons about adjacency, making this a solver-only deduction.
    assert_eq!(engine.domain_values(PlayerId(1), 1), vec![WireValue(1)]);
    assert_eq!(engine.domain_values(PlayerId(2), 0), vec![WireValue(2)]);
    assert_eq!(engine.domain_values(PlayerId(2), 1), vec![WireValue(2)]);
    assert!(engine.is_win());

    // global pruning is permanent: another full pass changes nothing
    let settled: Vec<_> = (0..3)
        .map(|p| {
            (0..2)
                .map(|j| engine.domain_values(PlayerId(p), j))
                .collect::<Vec<_>>()
        })
        .collect();
    engine.refilter().unwrap();
    for (p, row) in settled.iter().enumerate() {
        for (j, values) in row.iter().enumerate() {
            assert_eq!(engine.domain_values(PlayerId(p as u8), j), *values);
        }
    }
}

#[test]
fn conflicting_pair_claims_are_refuted() {
    let mut engine = observer(true);
    let events = pair_signals();
    for event in &events[..3] {
        engine.apply(event.clone()).unwrap();
    }
    let result = engine.apply(events[3].clone());
    assert!(
        matches!(result, Err(EngineError::Contradiction(_))),
        "both pairs cannot contain a 1, got {result:?}"
    );
}

#[test]
fn local_only_pipeline_misses_the_conflict() {
    let mut engine = observer(false);
    let events = pair_signals();
    for event in &events[..3] {
        engine
            .apply(event.clone())
            .expect("adjacency is invisible to local filters");
    }
    // Where the solver pins P1's pair, local filters leave the second
    // wire open...
    assert_eq!(
        engine.domain_values(PlayerId(1), 1),
        vec![WireValue(1), WireValue(2)]
    );
    // ...and the pair-breaking claim slips through entirely.
    engine
        .apply(events[3].clone())
        .expect("the joint conflict is invisible to local filters");
}
