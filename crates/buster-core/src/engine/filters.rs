use crate::config::DeckLayout;
use crate::engine::error::Contradiction;
use crate::engine::store::BeliefStore;
use crate::engine::tracker::TrackerTable;
use crate::model::player::PlayerId;
use crate::model::value::ValueSet;
use tracing::warn;

/// Switches the orchestrator forwards from the config.
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub chain_filter: bool,
    pub max_subset_len: usize,
}

/// One pending narrowing: intersect the slot's domain with `keep`.
#[derive(Debug, Clone, Copy)]
pub struct DomainPatch {
    pub player: PlayerId,
    pub position: usize,
    pub keep: ValueSet,
}

fn apply(store: &mut BeliefStore, patches: &[DomainPatch]) -> Result<bool, Contradiction> {
    let mut changed = false;
    for patch in patches {
        let narrowed = store.domain(patch.player, patch.position).intersect(patch.keep);
        if narrowed.is_empty() {
            return Err(Contradiction::EmptyDomain {
                player: patch.player,
                position: patch.position,
            });
        }
        changed |= store.set_domain(patch.player, patch.position, narrowed);
    }
    Ok(changed)
}

/// Runs the filters round-robin until nothing changes, promotes freshly
/// deduced singletons into the trackers, and repeats until the promotion
/// pass is also quiet. Returns the number of filter rounds.
pub fn run_to_fixed_point(
    store: &mut BeliefStore,
    trackers: &mut TrackerTable,
    layout: &DeckLayout,
    options: FilterOptions,
) -> Result<u32, Contradiction> {
    // Each effective round clears at least one candidate bit.
    let round_guard = (store.players() * store.hand_len() * layout.value_count()) as u32 + 8;
    let mut rounds = 0;

    loop {
        loop {
            rounds += 1;
            let mut changed = false;
            changed |= apply(store, &ordering(store, layout))?;
            changed |= apply(store, &sliding_window(store, trackers, layout))?;
            changed |= apply(store, &position_value(store, trackers, layout))?;
            changed |= apply(
                store,
                &subset_cardinality(store, trackers, layout, options.max_subset_len),
            )?;
            if options.chain_filter {
                changed |= apply(store, &chain_forcing(store, trackers, layout))?;
            }
            changed |= apply(store, &called_values(store, trackers, layout)?)?;

            if !changed {
                break;
            }
            if rounds > round_guard {
                warn!(rounds, "filter loop exceeded its lattice bound");
                break;
            }
        }

        if !promote_certainties(store, trackers) {
            break;
        }
        trackers.check_conservation(layout)?;
    }

    trackers.check_conservation(layout)?;
    Ok(rounds)
}

/// Newly singleton slots become certain copies in the trackers.
fn promote_certainties(store: &BeliefStore, trackers: &mut TrackerTable) -> bool {
    let mut promoted = false;
    for player in PlayerId::seats(store.players()) {
        for position in 0..store.hand_len() {
            if let Some(index) = store.domain(player, position).sole() {
                promoted |= trackers.tracker_mut(index).add_certain(player, position);
            }
        }
    }
    promoted
}

/// F1: hands are non-decreasing, so a slot's minimum bounds everything to
/// its right and its maximum everything to its left.
fn ordering(store: &BeliefStore, layout: &DeckLayout) -> Vec<DomainPatch> {
    let mut patches = Vec::new();
    let hand_len = store.hand_len();

    for player in PlayerId::seats(store.players()) {
        // An untouched player is still at its previous ordering fixed
        // point; the dirty bits let us skip it.
        if !store.player_dirty(player) {
            continue;
        }

        let mut narrowed: Vec<ValueSet> = store.domains_of(player).to_vec();
        let mut floor = 0usize;
        for set in narrowed.iter_mut() {
            *set = set.intersect(ValueSet::at_least(floor));
            if let Some(min) = set.min() {
                floor = min;
            }
        }
        let mut ceiling = layout.value_count().saturating_sub(1);
        for set in narrowed.iter_mut().rev() {
            *set = set.intersect(ValueSet::at_most(ceiling));
            if let Some(max) = set.max() {
                ceiling = max;
            }
        }

        for position in 0..hand_len {
            if narrowed[position] != store.domain(player, position) {
                patches.push(DomainPatch {
                    player,
                    position,
                    keep: narrowed[position],
                });
            }
        }
    }
    patches
}

/// F2: all copies of a value inside one hand sit within a window as wide
/// as the copies that could possibly be there. Any position no valid
/// window covers cannot hold the value.
fn sliding_window(
    store: &BeliefStore,
    trackers: &TrackerTable,
    layout: &DeckLayout,
) -> Vec<DomainPatch> {
    let mut patches = Vec::new();
    let hand_len = store.hand_len();

    for player in PlayerId::seats(store.players()) {
        for index in 0..layout.value_count() {
            let tracker = trackers.tracker(index);
            let mut required = vec![false; hand_len];
            let mut any_required = false;
            for position in tracker
                .certain_positions(player)
                .chain(tracker.revealed_positions(player))
            {
                required[position] = true;
                any_required = true;
            }
            if !any_required {
                continue;
            }

            let here = tracker.certain_positions(player).count()
                + tracker.revealed_positions(player).count();
            let width = here
                + tracker.uncertain().max(0) as usize
                + usize::from(tracker.has_called(player));
            if width >= hand_len {
                continue;
            }

            let mut covered = vec![false; hand_len];
            for start in 0..=hand_len - width {
                let end = start + width;
                let fits = required[..hand_len]
                    .iter()
                    .enumerate()
                    .all(|(pos, &need)| !need || (start <= pos && pos < end));
                if fits {
                    covered[start..end].iter_mut().for_each(|slot| *slot = true);
                }
            }

            for (position, &ok) in covered.iter().enumerate() {
                if !ok && store.domain(player, position).contains(index) {
                    patches.push(DomainPatch {
                        player,
                        position,
                        keep: store.domain(player, position).difference(ValueSet::singleton(index)),
                    });
                }
            }
        }
    }
    patches
}

/// F3: bounds each value by the copies a player could still hold. A zero
/// allowance erases the value from the hand; otherwise cumulative
/// allowances from the top and bottom of the value order pin down the
/// interval of positions where it can appear.
fn position_value(
    store: &BeliefStore,
    trackers: &TrackerTable,
    layout: &DeckLayout,
) -> Vec<DomainPatch> {
    let mut patches = Vec::new();
    let hand_len = store.hand_len();
    let value_count = layout.value_count();

    for player in PlayerId::seats(store.players()) {
        let allowance: Vec<usize> = (0..value_count)
            .map(|index| {
                let tracker = trackers.tracker(index);
                tracker.uncertain().max(0) as usize
                    + usize::from(tracker.has_called(player))
                    + tracker.certain_positions(player).count()
                    + tracker.revealed_positions(player).count()
            })
            .collect();

        let mut strip = vec![ValueSet::EMPTY; hand_len];

        for (index, &count) in allowance.iter().enumerate() {
            if count == 0 {
                for mask in strip.iter_mut() {
                    mask.insert(index);
                }
            }
        }

        // High values with few available copies cannot start too early...
        let mut threshold = hand_len as i64;
        for index in (0..value_count).rev() {
            if allowance[index] == 0 {
                continue;
            }
            threshold -= allowance[index] as i64;
            if threshold > 0 && (threshold as usize) < hand_len {
                for mask in strip.iter_mut().take(threshold as usize) {
                    mask.insert(index);
                }
            }
        }
        // ...and low values cannot reach too far right.
        let mut threshold = 0i64;
        for (index, &count) in allowance.iter().enumerate() {
            if count == 0 {
                continue;
            }
            threshold += count as i64;
            if threshold > 0 && (threshold as usize) < hand_len {
                for mask in strip.iter_mut().skip(threshold as usize) {
                    mask.insert(index);
                }
            }
        }

        for (position, mask) in strip.iter().enumerate() {
            let domain = store.domain(player, position);
            if !domain.intersect(*mask).is_empty() {
                patches.push(DomainPatch {
                    player,
                    position,
                    keep: domain.difference(*mask),
                });
            }
        }
    }
    patches
}

/// F4: hidden-subset elimination across all hands. When the unrevealed
/// slots confined to a value set S number exactly the remaining copies of
/// S, those slots absorb every copy and S disappears from the rest of the
/// table.
fn subset_cardinality(
    store: &BeliefStore,
    trackers: &TrackerTable,
    layout: &DeckLayout,
    max_subset_len: usize,
) -> Vec<DomainPatch> {
    let mut patches = Vec::new();
    let value_count = layout.value_count();

    let remaining: Vec<usize> = (0..value_count)
        .map(|index| {
            (layout.copies(index) as usize).saturating_sub(trackers.tracker(index).revealed_count())
        })
        .collect();

    let mut slots: Vec<(PlayerId, usize, ValueSet)> = Vec::new();
    let mut present = ValueSet::EMPTY;
    for player in PlayerId::seats(store.players()) {
        for position in 0..store.hand_len() {
            if store.is_revealed(player, position) {
                continue;
            }
            let domain = store.domain(player, position);
            slots.push((player, position, domain));
            present = present.union(domain);
        }
    }

    let candidates: Vec<usize> = present
        .iter()
        .filter(|&index| remaining[index] > 0)
        .collect();

    let mut stack = Vec::new();
    subsets(&candidates, 0, max_subset_len, &mut stack, &mut |subset| {
        let mut mask = ValueSet::EMPTY;
        let mut copies = 0usize;
        for &index in subset {
            mask.insert(index);
            copies += remaining[index];
        }

        let confined = slots
            .iter()
            .filter(|(_, _, domain)| domain.is_subset_of(mask))
            .count();
        if confined != copies {
            return;
        }

        for &(player, position, domain) in &slots {
            if !domain.is_subset_of(mask) && !domain.intersect(mask).is_empty() {
                patches.push(DomainPatch {
                    player,
                    position,
                    keep: domain.difference(mask),
                });
            }
        }
    });

    patches
}

fn subsets(
    candidates: &[usize],
    start: usize,
    max_len: usize,
    stack: &mut Vec<usize>,
    visit: &mut impl FnMut(&[usize]),
) {
    if !stack.is_empty() {
        visit(stack);
    }
    if stack.len() == max_len {
        return;
    }
    for offset in start..candidates.len() {
        stack.push(candidates[offset]);
        subsets(candidates, offset + 1, max_len, stack, visit);
        stack.pop();
    }
}

/// F5: hypothesizing a value at a slot forces every neighbouring slot
/// whose bound pins it to the same value. If the forced chain needs more
/// copies than could possibly be in this hand, the hypothesis dies.
fn chain_forcing(
    store: &BeliefStore,
    trackers: &TrackerTable,
    _layout: &DeckLayout,
) -> Vec<DomainPatch> {
    let mut patches = Vec::new();
    let hand_len = store.hand_len();

    for player in PlayerId::seats(store.players()) {
        for position in 0..hand_len {
            let domain = store.domain(player, position);
            if domain.len() <= 1 {
                continue;
            }
            for index in domain.iter() {
                let mut required = 1usize;
                let mut lo = position;
                let mut hi = position;
                while lo > 0 && store.domain(player, lo - 1).min() == Some(index) {
                    lo -= 1;
                    required += 1;
                }
                while hi + 1 < hand_len && store.domain(player, hi + 1).max() == Some(index) {
                    hi += 1;
                    required += 1;
                }

                let tracker = trackers.tracker(index);
                let inside = tracker
                    .certain_positions(player)
                    .chain(tracker.revealed_positions(player))
                    .filter(|&pos| lo <= pos && pos <= hi)
                    .count();
                let available = tracker.uncertain().max(0) as usize
                    + inside
                    + usize::from(tracker.has_called(player));

                if required > available {
                    patches.push(DomainPatch {
                        player,
                        position,
                        keep: domain.difference(ValueSet::singleton(index)),
                    });
                }
            }
        }
    }
    patches
}

/// F6: a called value must land somewhere. A single candidate slot is
/// forced; none at all is a contradiction. Announced-absent values are
/// re-stripped (swaps may reintroduce them).
fn called_values(
    store: &BeliefStore,
    trackers: &TrackerTable,
    layout: &DeckLayout,
) -> Result<Vec<DomainPatch>, Contradiction> {
    let mut patches = Vec::new();
    let hand_len = store.hand_len();

    for player in PlayerId::seats(store.players()) {
        let absent = store.absent(player);
        if !absent.is_empty() {
            for position in 0..hand_len {
                let domain = store.domain(player, position);
                if !domain.intersect(absent).is_empty() {
                    patches.push(DomainPatch {
                        player,
                        position,
                        keep: domain.difference(absent),
                    });
                }
            }
        }

        for index in 0..layout.value_count() {
            if !trackers.tracker(index).has_called(player) {
                continue;
            }
            let candidates: Vec<usize> = (0..hand_len)
                .filter(|&position| store.domain(player, position).contains(index))
                .collect();
            match candidates.as_slice() {
                [] => {
                    return Err(Contradiction::UnplaceableCall {
                        player,
                        value: layout.value(index),
                    })
                }
                [position] => patches.push(DomainPatch {
                    player,
                    position: *position,
                    keep: ValueSet::singleton(index),
                }),
                _ => {}
            }
        }
    }
    Ok(patches)
}
