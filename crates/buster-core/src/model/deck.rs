use crate::config::DeckLayout;
use crate::model::hand::Hand;
use crate::model::value::WireValue;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Deals the configured multiset into one sorted hand per player.
///
/// Deterministic for a given seed; used by the simulation driver and by
/// tests that need reproducible games.
pub fn deal_hands(layout: &DeckLayout, seed: u64) -> Vec<Hand> {
    let mut deck: Vec<WireValue> = Vec::with_capacity(layout.total_wires());
    for index in 0..layout.value_count() {
        for _ in 0..layout.copies(index) {
            deck.push(layout.value(index));
        }
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    deck.shuffle(&mut rng);

    deck.chunks(layout.hand_len())
        .map(|chunk| Hand::with_wires(chunk.to_vec()))
        .collect()
}
