use buster_core::engine::BeliefEngine;
use buster_core::model::player::PlayerId;
use buster_core::model::value::WireValue;

/// One call the observer could make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOption {
    pub target: PlayerId,
    pub position: usize,
    pub value: WireValue,
    /// Candidate-set size of the target slot; 1 means a sure hit.
    pub candidates: usize,
}

/// Calls split by certainty; uncertain ones sorted narrowest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallBoard {
    pub certain: Vec<CallOption>,
    pub uncertain: Vec<CallOption>,
}

impl CallBoard {
    pub fn best(&self) -> Option<&CallOption> {
        self.certain.first().or_else(|| self.uncertain.first())
    }
}

/// Values the observer still holds unrevealed; only these may be called.
pub fn playable_values(engine: &BeliefEngine) -> Vec<WireValue> {
    let me = engine.perspective();
    let mut values: Vec<WireValue> = engine
        .own_hand()
        .wires()
        .iter()
        .enumerate()
        .filter(|&(position, _)| !engine.is_revealed(me, position))
        .map(|(_, &wire)| wire)
        .collect();
    values.sort_unstable();
    values.dedup();
    values
}

/// Every callable slot of every other player, certain hits first, the
/// rest ordered by how narrow the target slot already is.
pub fn rank_calls(engine: &BeliefEngine) -> CallBoard {
    let me = engine.perspective();
    let my_values = playable_values(engine);
    let mut board = CallBoard::default();
    if my_values.is_empty() {
        return board;
    }

    for target in PlayerId::seats(engine.layout().players()) {
        if target == me {
            continue;
        }
        for position in 0..engine.layout().hand_len() {
            if engine.is_revealed(target, position) {
                continue;
            }
            let domain = engine.domain_values(target, position);
            for &value in &domain {
                if !my_values.contains(&value) {
                    continue;
                }
                let option = CallOption {
                    target,
                    position,
                    value,
                    candidates: domain.len(),
                };
                if domain.len() == 1 {
                    board.certain.push(option);
                } else {
                    board.uncertain.push(option);
                }
            }
        }
    }

    board.uncertain.sort_by_key(|option| option.candidates);
    board
}
