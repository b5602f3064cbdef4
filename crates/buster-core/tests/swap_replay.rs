//! Swaps move candidate sets between hands, participants learn what
//! they received, and replaying the log reproduces the state only
//! because the swapped wire values are recorded in the event.

use buster_core::config::GameConfig;
use buster_core::engine::BeliefEngine;
use buster_core::event::{Event, EventLog};
use buster_core::model::hand::Hand;
use buster_core::model::player::PlayerId;
use buster_core::model::value::{ValueSet, WireValue};

fn hand(labels: &[u16]) -> Hand {
    Hand::with_wires(labels.iter().copied().map(WireValue).collect())
}

fn config() -> GameConfig {
    GameConfig::with_distribution(3, [(1, 2), (2, 3), (3, 3), (4, 3), (5, 1)])
}

fn dealt_hands() -> [Hand; 3] {
    [
        hand(&[1, 2, 3, 4]),
        hand(&[1, 2, 3, 5]),
        hand(&[2, 3, 4, 4]),
    ]
}

/// P0 calls P2's first wire (a 2), then trades its 4 for P1's 1.
fn scripted_events() -> Vec<Event> {
    vec![
        Event::Call {
            caller: PlayerId(0),
            target: PlayerId(2),
            position: 0,
            value: WireValue(2),
            success: true,
            caller_position: Some(1),
        },
        Event::Swap {
            first: PlayerId(0),
            second: PlayerId(1),
            init_first: 3,
            init_second: 0,
            final_first: 1,
            final_second: 2,
            gave_first: WireValue(4),
            gave_second: WireValue(1),
        },
    ]
}

fn table() -> Vec<BeliefEngine> {
    dealt_hands()
        .into_iter()
        .enumerate()
        .map(|(index, own)| {
            BeliefEngine::new(config(), PlayerId::from_index(index), own).unwrap()
        })
        .collect()
}

fn domain_matrix(engine: &BeliefEngine) -> Vec<Vec<ValueSet>> {
    (0..engine.layout().players())
        .map(|p| {
            (0..engine.layout().hand_len())
                .map(|j| engine.domain(PlayerId::from_index(p), j))
                .collect()
        })
        .collect()
}

#[test]
fn participants_learn_their_received_wire() {
    let mut engines = table();
    for event in scripted_events() {
        for engine in &mut engines {
            engine.apply(event.clone()).unwrap();
        }
    }

    // P0 gave its 4 away and received P1's 1
    assert_eq!(engines[0].own_hand().wires(), hand(&[1, 1, 2, 3]).wires());
    assert_eq!(engines[0].domain_values(PlayerId(0), 1), vec![WireValue(1)]);
    // P1 received the 4 at its final slot
    assert_eq!(engines[1].own_hand().wires(), hand(&[2, 3, 4, 5]).wires());
    assert_eq!(engines[1].domain_values(PlayerId(1), 2), vec![WireValue(4)]);

    // the publicly revealed 2 travelled with P0's shrinking hand
    for engine in &engines {
        assert!(engine.is_revealed(PlayerId(0), 2));
        assert_eq!(engine.domain_values(PlayerId(0), 2), vec![WireValue(2)]);
    }

    // true hands stay inside every observer's domains
    let truth = [
        hand(&[1, 1, 2, 3]),
        hand(&[2, 3, 4, 5]),
        hand(&[2, 3, 4, 4]),
    ];
    for engine in &engines {
        for (player, hand) in truth.iter().enumerate() {
            for (position, &wire) in hand.wires().iter().enumerate() {
                assert!(
                    engine
                        .domain_values(PlayerId::from_index(player), position)
                        .contains(&wire),
                    "{} excluded truth at P{player}[{position}]",
                    engine.perspective()
                );
            }
        }
    }

    // ordering invariant holds after the rearrangement
    for engine in &engines {
        for player in PlayerId::seats(3) {
            for position in 1..4 {
                let left = engine.domain(player, position - 1);
                let right = engine.domain(player, position);
                assert!(left.min() <= right.min());
                assert!(left.max() <= right.max());
            }
        }
    }
}

#[test]
fn replay_reproduces_the_swap_exactly() {
    let mut engines = table();
    for event in scripted_events() {
        for engine in &mut engines {
            engine.apply(event.clone()).unwrap();
        }
    }

    let mut log = EventLog::new();
    for event in scripted_events() {
        log.push(event);
    }

    for (index, own) in dealt_hands().into_iter().enumerate() {
        let replayed =
            BeliefEngine::replay(config(), PlayerId::from_index(index), own, &log).unwrap();
        assert_eq!(
            domain_matrix(&replayed),
            domain_matrix(&engines[index]),
            "replay diverged for perspective {index}"
        );
        assert_eq!(replayed.wrong_calls(), engines[index].wrong_calls());
        for value in [1u16, 2, 3, 4, 5] {
            assert_eq!(
                replayed.value_counts(WireValue(value)),
                engines[index].value_counts(WireValue(value))
            );
        }
    }
}

#[test]
fn misrecorded_swap_values_break_replay() {
    let mut live = table();
    for event in scripted_events() {
        for engine in &mut live {
            engine.apply(event.clone()).unwrap();
        }
    }

    let mut tampered = EventLog::new();
    for event in scripted_events() {
        tampered.push(match event {
            // claim P1 handed over a 2 instead of the 1 it really gave
            Event::Swap {
                first,
                second,
                init_first,
                init_second,
                final_first,
                final_second,
                gave_first,
                ..
            } => Event::Swap {
                first,
                second,
                init_first,
                init_second,
                final_first,
                final_second,
                gave_first,
                gave_second: WireValue(2),
            },
            other => other,
        });
    }

    // The recipient's knowledge depends on the recorded wire value:
    // replay either lands on different domains or refutes itself.
    match BeliefEngine::replay(config(), PlayerId(0), dealt_hands()[0].clone(), &tampered) {
        Ok(replayed) => assert_ne!(domain_matrix(&replayed), domain_matrix(&live[0])),
        Err(_) => {}
    }
}
