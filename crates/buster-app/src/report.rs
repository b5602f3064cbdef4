use buster_bot::suggest::{CallBoard, DoubleChance, EntropyOutcome};
use buster_core::engine::BeliefEngine;
use buster_core::model::player::PlayerId;

/// Renders the observer's belief table: one line per slot, revealed and
/// deduced slots flagged.
pub fn belief_table(engine: &BeliefEngine) -> String {
    let mut out = String::new();
    let me = engine.perspective();

    for player in PlayerId::seats(engine.layout().players()) {
        if player == me {
            out.push_str(&format!("{player} (you):\n"));
        } else {
            out.push_str(&format!("{player}:\n"));
        }
        for position in 0..engine.layout().hand_len() {
            let values = engine.domain_values(player, position);
            let rendered = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let marker = if engine.is_revealed(player, position) {
                "  revealed"
            } else if values.len() == 1 {
                "  certain"
            } else {
                ""
            };
            out.push_str(&format!("  [{position}] {{{rendered}}}{marker}\n"));
        }
    }
    out
}

pub fn status_line(engine: &BeliefEngine) -> String {
    let metrics = engine.metrics();
    let (hits, misses) = engine.cache_stats();
    format!(
        "events={} strikes={} settled={}/{} entropy={:.2} bits cache={}h/{}m win={} lost={}",
        engine.log().len(),
        engine.wrong_calls(),
        metrics.settled_slots,
        metrics.settled_slots + metrics.open_slots,
        metrics.system_entropy,
        hits,
        misses,
        engine.is_win(),
        engine.is_lost(),
    )
}

pub fn value_counts_table(engine: &BeliefEngine) -> String {
    let mut out = String::from("value  revealed certain called uncertain\n");
    for index in 0..engine.layout().value_count() {
        let value = engine.layout().value(index);
        if let Some(counts) = engine.value_counts(value) {
            out.push_str(&format!(
                "{value:>5}  {:>8} {:>7} {:>6} {:>9}\n",
                counts.revealed, counts.certain, counts.called, counts.uncertain
            ));
        }
    }
    out
}

pub fn call_board(board: &CallBoard) -> String {
    let mut out = String::new();
    if board.certain.is_empty() && board.uncertain.is_empty() {
        return String::from("no callable slots\n");
    }
    for option in &board.certain {
        out.push_str(&format!(
            "sure   {}[{}] = {}\n",
            option.target, option.position, option.value
        ));
    }
    for option in &board.uncertain {
        out.push_str(&format!(
            "1/{}    {}[{}] = {}\n",
            option.candidates, option.target, option.position, option.value
        ));
    }
    out
}

pub fn double_chances(suggestions: &[DoubleChance], limit: usize) -> String {
    let mut out = String::new();
    for suggestion in suggestions.iter().take(limit) {
        out.push_str(&format!(
            "{:>5.1}%  {}[{},{}] = {}{}\n",
            suggestion.probability * 100.0,
            suggestion.target,
            suggestion.positions.0,
            suggestion.positions.1,
            suggestion.value,
            if suggestion.certain { "  sure" } else { "" }
        ));
    }
    out
}

pub fn entropy_outcomes(outcomes: &[EntropyOutcome], limit: usize) -> String {
    let mut out = String::new();
    for outcome in outcomes.iter().take(limit) {
        out.push_str(&format!(
            "gain {:+.3}  {}[{}] = {} (p={:.2}, E[H]={:.2})\n",
            outcome.information_gain,
            outcome.call.target,
            outcome.call.position,
            outcome.call.value,
            outcome.success_probability,
            outcome.expected_entropy,
        ));
    }
    out
}
