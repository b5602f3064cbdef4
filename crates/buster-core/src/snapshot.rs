use crate::config::GameConfig;
use crate::engine::{BeliefEngine, EngineError};
use crate::event::EventLog;
use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::value::WireValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persistent game record: the config, every player's dealt hand, and
/// the public event log. Replaying the log rebuilds any observer's
/// belief state; derived beliefs are never stored as authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub config: GameConfig,
    pub own_hands: Vec<Vec<WireValue>>,
    pub events: EventLog,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot has no hand for {0}")]
    MissingHand(PlayerId),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl GameSnapshot {
    pub fn capture(config: GameConfig, hands: &[Hand], events: EventLog) -> Self {
        Self {
            config,
            own_hands: hands.iter().map(|hand| hand.wires().to_vec()).collect(),
            events,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn hand_of(&self, player: PlayerId) -> Option<Hand> {
        self.own_hands
            .get(player.index())
            .map(|wires| Hand::with_wires(wires.clone()))
    }

    /// Replays the logged events into a fresh engine for `perspective`.
    pub fn restore(&self, perspective: PlayerId) -> Result<BeliefEngine, SnapshotError> {
        let hand = self
            .hand_of(perspective)
            .ok_or(SnapshotError::MissingHand(perspective))?;
        let engine = BeliefEngine::replay(self.config.clone(), perspective, hand, &self.events)?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;
    use crate::config::GameConfig;
    use crate::event::{Event, EventLog};
    use crate::model::deck::deal_hands;
    use crate::model::player::PlayerId;
    use crate::model::value::WireValue;

    fn snapshot() -> GameSnapshot {
        let config = GameConfig::with_distribution(3, [(1, 2), (2, 3), (3, 3), (4, 3), (5, 1)]);
        let layout = config.layout().unwrap();
        let hands = deal_hands(&layout, 11);
        GameSnapshot::capture(config, &hands, EventLog::new())
    }

    #[test]
    fn json_roundtrip_preserves_everything() {
        let mut snapshot = snapshot();
        let caller = PlayerId(0);
        let value = snapshot.own_hands[0][0];
        snapshot.events.push(Event::Call {
            caller,
            target: PlayerId(1),
            position: 0,
            value,
            success: false,
            caller_position: None,
        });

        let json = snapshot.to_json().unwrap();
        let parsed = GameSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn restore_replays_the_log() {
        let mut snapshot = snapshot();
        let value = snapshot.own_hands[1][2];
        snapshot.events.push(Event::SignalCertain {
            player: PlayerId(1),
            position: 2,
            value,
        });

        let engine = snapshot.restore(PlayerId(0)).unwrap();
        assert_eq!(engine.log().len(), 1);
        assert_eq!(engine.domain_values(PlayerId(1), 2), vec![value]);
    }

    #[test]
    fn missing_hand_is_an_error() {
        let snapshot = snapshot();
        assert!(snapshot.restore(PlayerId(7)).is_err());
    }

    #[test]
    fn unknown_wire_in_hand_fails_restore() {
        let mut snapshot = snapshot();
        snapshot.own_hands[0][0] = WireValue(999);
        assert!(snapshot.restore(PlayerId(0)).is_err());
    }
}
