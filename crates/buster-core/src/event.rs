use crate::model::player::PlayerId;
use crate::model::value::WireValue;
use serde::{Deserialize, Serialize};

/// Declared relation between a position and its right neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacentRelation {
    Equal,
    Distinct,
}

/// A public action every player observes.
///
/// Swap events record the value each swapped wire held when the swap was
/// executed (`gave_first` / `gave_second`). Those values cannot be
/// recovered from later state, and without them replaying a log would not
/// reproduce the participants' beliefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Call {
        caller: PlayerId,
        target: PlayerId,
        position: usize,
        value: WireValue,
        success: bool,
        /// Caller's own slot holding the value; revealed on success.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caller_position: Option<usize>,
    },
    /// A player flips the last two copies of a value at once.
    DoubleReveal {
        player: PlayerId,
        value: WireValue,
        first: usize,
        second: usize,
    },
    /// Two players exchange one hidden wire each. `init_*` are positions
    /// in the pre-swap hands; `final_*` are where the received wires sit
    /// in the re-sorted hands.
    Swap {
        first: PlayerId,
        second: PlayerId,
        init_first: usize,
        init_second: usize,
        final_first: usize,
        final_second: usize,
        gave_first: WireValue,
        gave_second: WireValue,
    },
    SignalCertain {
        player: PlayerId,
        position: usize,
        value: WireValue,
    },
    SignalAbsent {
        player: PlayerId,
        value: WireValue,
    },
    /// The wire at `position` has a value with exactly `class` copies in
    /// the deck.
    SignalCopyCount {
        player: PlayerId,
        position: usize,
        class: u8,
    },
    /// Relation between `position` and `position + 1`.
    SignalAdjacency {
        player: PlayerId,
        position: usize,
        relation: AdjacentRelation,
    },
}

impl Event {
    /// Players whose constraints this event touches.
    pub fn touched_players(&self) -> Vec<PlayerId> {
        match *self {
            Event::Call { caller, target, .. } => vec![caller, target],
            Event::DoubleReveal { player, .. }
            | Event::SignalCertain { player, .. }
            | Event::SignalAbsent { player, .. }
            | Event::SignalCopyCount { player, .. }
            | Event::SignalAdjacency { player, .. } => vec![player],
            Event::Swap { first, second, .. } => vec![first, second],
        }
    }
}

/// Append-only record of public actions, replayable into fresh belief
/// state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
