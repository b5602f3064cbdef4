use crate::engine::store::BeliefStore;
use crate::model::player::PlayerId;

/// Shannon entropy of the current belief state, `log2 |D|` per slot
/// under a uniform prior.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionMetrics {
    pub entropy_per_player: Vec<f64>,
    pub system_entropy: f64,
    pub settled_slots: usize,
    pub open_slots: usize,
}

impl DeductionMetrics {
    pub fn from_store(store: &BeliefStore) -> Self {
        let mut entropy_per_player = Vec::with_capacity(store.players());
        let mut settled_slots = 0;
        let mut open_slots = 0;

        for player in PlayerId::seats(store.players()) {
            let mut player_entropy = 0.0;
            for position in 0..store.hand_len() {
                let size = store.domain(player, position).len();
                if size <= 1 {
                    settled_slots += 1;
                } else {
                    open_slots += 1;
                    player_entropy += (size as f64).log2();
                }
            }
            entropy_per_player.push(player_entropy);
        }

        Self {
            system_entropy: entropy_per_player.iter().sum(),
            entropy_per_player,
            settled_slots,
            open_slots,
        }
    }
}
