//! A successful call reveals both ends, and a unique value signalled
//! certain disappears from every other hand.

use buster_core::config::GameConfig;
use buster_core::engine::BeliefEngine;
use buster_core::event::Event;
use buster_core::model::hand::Hand;
use buster_core::model::player::PlayerId;
use buster_core::model::value::WireValue;

fn hand(labels: &[u16]) -> Hand {
    Hand::with_wires(labels.iter().copied().map(WireValue).collect())
}

fn table() -> Vec<BeliefEngine> {
    let config = GameConfig::with_distribution(3, [(1, 2), (2, 3), (3, 3), (4, 3), (5, 1)]);
    let hands = [
        hand(&[1, 2, 3, 4]),
        hand(&[1, 2, 3, 5]),
        hand(&[2, 3, 4, 4]),
    ];
    hands
        .into_iter()
        .enumerate()
        .map(|(index, own)| {
            BeliefEngine::new(config.clone(), PlayerId::from_index(index), own).unwrap()
        })
        .collect()
}

#[test]
fn successful_call_reveals_both_ends() {
    let mut engines = table();
    let call = Event::Call {
        caller: PlayerId(0),
        target: PlayerId(2),
        position: 0,
        value: WireValue(2),
        success: true,
        caller_position: Some(1),
    };
    for engine in &mut engines {
        engine.apply(call.clone()).unwrap();
    }

    // P1 is a bystander: both revealed slots collapse in its view.
    let observer = &engines[1];
    assert_eq!(observer.domain_values(PlayerId(2), 0), vec![WireValue(2)]);
    assert!(observer.is_revealed(PlayerId(2), 0));
    assert_eq!(observer.domain_values(PlayerId(0), 1), vec![WireValue(2)]);
    assert!(observer.is_revealed(PlayerId(0), 1));

    let counts = observer.value_counts(WireValue(2)).unwrap();
    assert_eq!(counts.revealed, 2);
}

#[test]
fn unique_value_vanishes_from_other_hands() {
    let mut engines = table();
    let events = [
        Event::Call {
            caller: PlayerId(0),
            target: PlayerId(2),
            position: 0,
            value: WireValue(2),
            success: true,
            caller_position: Some(1),
        },
        Event::SignalCertain {
            player: PlayerId(1),
            position: 3,
            value: WireValue(5),
        },
    ];
    for engine in &mut engines {
        for event in &events {
            engine.apply(event.clone()).unwrap();
        }
    }

    let observer = &engines[0];
    assert_eq!(observer.domain_values(PlayerId(1), 3), vec![WireValue(5)]);
    // the 5 is unique, so no other slot anywhere may hold it
    for player in PlayerId::seats(3) {
        for position in 0..4 {
            if player == PlayerId(1) && position == 3 {
                continue;
            }
            assert!(
                !observer
                    .domain_values(player, position)
                    .contains(&WireValue(5)),
                "{player}[{position}] still admits the unique 5"
            );
        }
    }
}

#[test]
fn truth_stays_inside_every_domain() {
    let mut engines = table();
    let truth = [
        hand(&[1, 2, 3, 4]),
        hand(&[1, 2, 3, 5]),
        hand(&[2, 3, 4, 4]),
    ];
    let events = [
        Event::Call {
            caller: PlayerId(0),
            target: PlayerId(2),
            position: 0,
            value: WireValue(2),
            success: true,
            caller_position: Some(1),
        },
        Event::Call {
            caller: PlayerId(1),
            target: PlayerId(0),
            position: 0,
            value: WireValue(3),
            success: false,
            caller_position: None,
        },
        Event::SignalAbsent {
            player: PlayerId(2),
            value: WireValue(1),
        },
        Event::SignalCertain {
            player: PlayerId(1),
            position: 3,
            value: WireValue(5),
        },
    ];

    for event in &events {
        for engine in &mut engines {
            engine.apply(event.clone()).unwrap();
        }
        for engine in &engines {
            for (player, hand) in truth.iter().enumerate() {
                for (position, &wire) in hand.wires().iter().enumerate() {
                    assert!(
                        engine
                            .domain_values(PlayerId::from_index(player), position)
                            .contains(&wire),
                        "truth {wire} excluded at P{player}[{position}] after {event:?}"
                    );
                }
            }
        }
    }
}
