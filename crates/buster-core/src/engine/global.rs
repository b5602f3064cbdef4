use crate::config::DeckLayout;
use crate::engine::error::Contradiction;
use crate::engine::signature::{CountVector, SignatureSet};
use crate::model::player::PlayerId;
use crate::model::value::ValueSet;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Why the solver stopped short of a full projection.
#[derive(Debug)]
pub enum GlobalHalt {
    Contradiction(Contradiction),
    /// The wall-clock budget ran out before the passes finished. The
    /// local-only domains remain sound.
    OutOfBudget,
}

impl From<Contradiction> for GlobalHalt {
    fn from(contradiction: Contradiction) -> Self {
        GlobalHalt::Contradiction(contradiction)
    }
}

/// Per-player domains rebuilt from globally valid signatures. `None`
/// marks a player whose projection was skipped on budget.
#[derive(Debug)]
pub struct GlobalProjection {
    pub domains: Vec<Option<Vec<ValueSet>>>,
}

/// Forward/backward reachability over resource vectors.
///
/// `alpha[i]` holds every vector of copies players `0..i` can jointly
/// consume; `beta[i]` every vector players `i..` still need. A signature
/// survives iff some split `a + sig + b` hits the deck vector exactly.
pub fn solve(
    layout: &DeckLayout,
    signatures: &[Arc<SignatureSet>],
    deadline: Option<Instant>,
) -> Result<GlobalProjection, GlobalHalt> {
    let players = layout.players();
    debug_assert_eq!(signatures.len(), players);
    let deck = CountVector::deck(layout);
    let zero = CountVector::zero(layout.value_count());

    for (index, set) in signatures.iter().enumerate() {
        if set.is_empty() {
            return Err(Contradiction::NoFeasibleHand {
                player: PlayerId::from_index(index),
            }
            .into());
        }
    }

    let mut alpha: Vec<FxHashSet<CountVector>> = Vec::with_capacity(players + 1);
    alpha.push(std::iter::once(zero).collect());
    for i in 0..players {
        out_of_time(deadline)?;
        let mut next = FxHashSet::default();
        for previous in &alpha[i] {
            for signature in &signatures[i].signatures {
                if let Some(sum) = previous.checked_add(signature, &deck) {
                    next.insert(sum);
                }
            }
        }
        if next.is_empty() {
            return Err(Contradiction::UnreachableDeck.into());
        }
        alpha.push(next);
    }

    if !alpha[players].contains(&deck) {
        return Err(Contradiction::UnreachableDeck.into());
    }

    let mut beta: Vec<FxHashSet<CountVector>> = vec![FxHashSet::default(); players + 1];
    beta[players] = std::iter::once(zero).collect();
    for i in (0..players).rev() {
        out_of_time(deadline)?;
        let mut needed = FxHashSet::default();
        for rest in &beta[i + 1] {
            for signature in &signatures[i].signatures {
                if let Some(sum) = rest.checked_add(signature, &deck) {
                    needed.insert(sum);
                }
            }
        }
        beta[i] = needed;
    }

    debug!(
        alpha_peak = alpha.iter().map(|states| states.len()).max().unwrap_or(0),
        beta_peak = beta.iter().map(|states| states.len()).max().unwrap_or(0),
        "resource passes complete"
    );

    let domains: Vec<Option<Vec<ValueSet>>> = (0..players)
        .into_par_iter()
        .map(|player| {
            if out_of_time(deadline).is_err() {
                return None;
            }
            Some(project_player(
                layout,
                &signatures[player],
                &alpha[player],
                &beta[player + 1],
                &deck,
            ))
        })
        .collect();

    if domains.iter().any(Option::is_none) {
        warn!("global solver budget exhausted during projection");
    }

    Ok(GlobalProjection { domains })
}

/// A signature is globally valid when the rest of the deck splits into a
/// reachable prefix and a needed suffix. Valid hands then vote candidate
/// values back into each position.
fn project_player(
    layout: &DeckLayout,
    signatures: &SignatureSet,
    before: &FxHashSet<CountVector>,
    after: &FxHashSet<CountVector>,
    deck: &CountVector,
) -> Vec<ValueSet> {
    let mut domains = vec![ValueSet::EMPTY; layout.hand_len()];

    for (signature, hand) in signatures.signatures.iter().zip(&signatures.hands) {
        let Some(remainder) = deck.checked_sub(signature) else {
            continue;
        };

        // Probe from the smaller side, look up in the larger.
        let feasible = if before.len() <= after.len() {
            before
                .iter()
                .any(|a| remainder.checked_sub(a).is_some_and(|need| after.contains(&need)))
        } else {
            after
                .iter()
                .any(|b| remainder.checked_sub(b).is_some_and(|need| before.contains(&need)))
        };
        if !feasible {
            continue;
        }

        for (position, &wire) in hand.wires().iter().enumerate() {
            if let Some(index) = layout.index_of(wire) {
                domains[position].insert(index);
            }
        }
    }

    domains
}

fn out_of_time(deadline: Option<Instant>) -> Result<(), GlobalHalt> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(GlobalHalt::OutOfBudget),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{solve, GlobalHalt};
    use crate::config::GameConfig;
    use crate::engine::signature::{enumerate_signatures, CountVector, HandConstraints, SignatureSet};
    use crate::model::value::ValueSet;
    use std::sync::Arc;
    use std::time::Instant;

    fn all_hands(layout: &crate::config::DeckLayout, domains: &[ValueSet]) -> SignatureSet {
        let constraints = HandConstraints {
            layout,
            domains,
            adjacency: &[],
            copy_signals: &[],
            min_counts: CountVector::zero(layout.value_count()),
            caps: CountVector::deck(layout),
        };
        enumerate_signatures(&constraints)
    }

    #[test]
    fn unconstrained_game_projects_full_domains() {
        let config = GameConfig::with_distribution(2, [(1, 2), (2, 2), (3, 2)]);
        let layout = config.layout().unwrap();
        let open = vec![layout.full_set(); layout.hand_len()];
        let signatures = vec![
            Arc::new(all_hands(&layout, &open)),
            Arc::new(all_hands(&layout, &open)),
        ];
        let projection = solve(&layout, &signatures, None).unwrap();
        for domains in projection.domains.iter().map(|d| d.as_ref().unwrap()) {
            for domain in domains {
                assert_eq!(*domain, layout.full_set());
            }
        }
    }

    #[test]
    fn resource_conflict_is_detected() {
        // Both players locked to hands demanding both copies of value 1:
        // the deck cannot cover them jointly.
        let config = GameConfig::with_distribution(2, [(1, 2), (2, 2)]);
        let layout = config.layout().unwrap();
        let greedy = vec![ValueSet::singleton(0); layout.hand_len()];
        let signatures = vec![
            Arc::new(all_hands(&layout, &greedy)),
            Arc::new(all_hands(&layout, &greedy)),
        ];
        let result = solve(&layout, &signatures, None);
        assert!(matches!(result, Err(GlobalHalt::Contradiction(_))));
    }

    #[test]
    fn infeasible_signatures_are_projected_away() {
        // P0 may hold one or two 1s locally, but P1 is locked to one 1,
        // so hands of P0 with two 1s cannot survive globally.
        let config = GameConfig::with_distribution(2, [(1, 2), (2, 2)]);
        let layout = config.layout().unwrap();
        let open = vec![layout.full_set(); layout.hand_len()];
        let mut locked = vec![ValueSet::EMPTY; 2];
        locked[0].insert(0);
        locked[1].insert(1);
        let signatures = vec![
            Arc::new(all_hands(&layout, &open)),
            Arc::new(all_hands(&layout, &locked)),
        ];
        let projection = solve(&layout, &signatures, None).unwrap();
        let p0 = projection.domains[0].as_ref().unwrap();
        // P0's first slot must be a 1, second slot must be a 2
        assert_eq!(p0[0].sole(), Some(0));
        assert_eq!(p0[1].sole(), Some(1));
    }

    #[test]
    fn expired_budget_skips_projection() {
        let config = GameConfig::with_distribution(2, [(1, 2), (2, 2), (3, 2)]);
        let layout = config.layout().unwrap();
        let open = vec![layout.full_set(); layout.hand_len()];
        let signatures = vec![
            Arc::new(all_hands(&layout, &open)),
            Arc::new(all_hands(&layout, &open)),
        ];
        let result = solve(&layout, &signatures, Some(Instant::now()));
        assert!(matches!(result, Err(GlobalHalt::OutOfBudget)));
    }
}
