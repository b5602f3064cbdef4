use crate::suggest::playable_values;
use buster_core::engine::BeliefEngine;
use buster_core::model::player::PlayerId;
use buster_core::model::value::WireValue;
use std::collections::HashMap;
use tracing::debug;

/// Pick two slots of one target and a value; the attempt succeeds when
/// either slot holds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleChance {
    pub target: PlayerId,
    pub positions: (usize, usize),
    pub value: WireValue,
    pub probability: f64,
    /// Only exact enumeration may claim certainty.
    pub certain: bool,
}

/// Scores every two-slot attempt, exact where the target's hands can be
/// enumerated within budget, by slot-independence approximation
/// otherwise. Sorted best first.
pub fn double_chance_suggestions(engine: &mut BeliefEngine) -> Vec<DoubleChance> {
    let me = engine.perspective();
    let my_values = playable_values(engine);
    let mut suggestions = Vec::new();
    if my_values.is_empty() {
        return suggestions;
    }

    for target in PlayerId::seats(engine.layout().players()) {
        if target == me {
            continue;
        }
        match engine.enumerate_hands(target) {
            Some(hands) if !hands.is_empty() => {
                debug!(%target, hands = hands.len(), "exact double-chance scoring");
                score_exact(engine, target, &my_values, &hands, &mut suggestions);
            }
            Some(_) => {}
            None => {
                debug!(%target, "hand space too large, approximating");
                score_approximate(engine, target, &my_values, &mut suggestions);
            }
        }
    }

    suggestions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    suggestions
}

fn score_exact(
    engine: &BeliefEngine,
    target: PlayerId,
    my_values: &[WireValue],
    hands: &[buster_core::model::hand::Hand],
    suggestions: &mut Vec<DoubleChance>,
) {
    let hand_len = engine.layout().hand_len();
    let mut successes: HashMap<(usize, usize, WireValue), usize> = HashMap::new();

    for hand in hands {
        for first in 0..hand_len {
            if engine.is_revealed(target, first) {
                continue;
            }
            for second in first + 1..hand_len {
                if engine.is_revealed(target, second) {
                    continue;
                }
                for &value in my_values {
                    if hand.wire(first) == Some(value) || hand.wire(second) == Some(value) {
                        *successes.entry((first, second, value)).or_default() += 1;
                    }
                }
            }
        }
    }

    let total = hands.len() as f64;
    for ((first, second, value), count) in successes {
        let probability = count as f64 / total;
        suggestions.push(DoubleChance {
            target,
            positions: (first, second),
            value,
            probability,
            certain: count == hands.len(),
        });
    }
}

fn score_approximate(
    engine: &BeliefEngine,
    target: PlayerId,
    my_values: &[WireValue],
    suggestions: &mut Vec<DoubleChance>,
) {
    let hand_len = engine.layout().hand_len();
    for first in 0..hand_len {
        if engine.is_revealed(target, first) {
            continue;
        }
        for second in first + 1..hand_len {
            if engine.is_revealed(target, second) {
                continue;
            }
            let first_domain = engine.domain_values(target, first);
            let second_domain = engine.domain_values(target, second);
            for &value in my_values {
                let p_first = if first_domain.contains(&value) {
                    1.0 / first_domain.len() as f64
                } else {
                    0.0
                };
                let p_second = if second_domain.contains(&value) {
                    1.0 / second_domain.len() as f64
                } else {
                    0.0
                };
                let probability = p_first + p_second - p_first * p_second;
                if probability > 0.0 {
                    suggestions.push(DoubleChance {
                        target,
                        positions: (first, second),
                        value,
                        probability,
                        certain: false,
                    });
                }
            }
        }
    }
}
