use crate::config::ConfigError;
use crate::model::player::PlayerId;
use crate::model::value::WireValue;
use thiserror::Error;

/// The belief state can no longer describe any real assignment of wires.
///
/// Fatal for the event being applied; the engine keeps the failing state
/// for inspection and the caller recovers by replaying the log.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Contradiction {
    #[error("no candidate values remain for {player} position {position}")]
    EmptyDomain { player: PlayerId, position: usize },
    #[error("more copies of {value} are accounted for than exist")]
    NegativeCounter { value: WireValue },
    #[error("{player} called {value} but no slot can hold it")]
    UnplaceableCall { player: PlayerId, value: WireValue },
    #[error("{player} has no locally feasible hand")]
    NoFeasibleHand { player: PlayerId },
    #[error("no combination of feasible hands consumes the full deck")]
    UnreachableDeck,
}

/// Rejected before any state is mutated; the engine stays usable.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidEvent {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("position {position} is outside a hand of length {hand_len}")]
    PositionOutOfRange { position: usize, hand_len: usize },
    #[error("value {0} is not part of this game")]
    UnknownValue(WireValue),
    #[error("a player cannot call their own hand")]
    SelfCall,
    #[error("a player cannot swap with themselves")]
    SelfSwap,
    #[error("revealed wires cannot leave {player} position {position}")]
    RevealedSwapSlot { player: PlayerId, position: usize },
    #[error("{caller} does not hold {value}")]
    CallerLacksValue { caller: PlayerId, value: WireValue },
    #[error("no value in this game has exactly {0} copies")]
    UnknownCopyClass(u8),
    #[error("the two positions must differ")]
    DuplicatePosition,
    #[error("position {0} has no right neighbour to relate to")]
    NoRightNeighbour(usize),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),
    #[error("contradiction: {0}")]
    Contradiction(#[from] Contradiction),
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] InvalidEvent),
    #[error("own hand has {actual} wires, expected {expected}")]
    MalformedHand { expected: usize, actual: usize },
}
