use crate::model::value::{ValueSet, WireValue, MAX_VALUES};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Wire distribution of the published game: twelve base values with four
/// copies each, five singleton specials interleaved between them, and a
/// doubled top wire. Labels are ten times the printed number so the
/// specials keep their slot in the ordering.
static CLASSIC_DISTRIBUTION: Lazy<BTreeMap<WireValue, u8>> = Lazy::new(|| {
    let mut distribution: BTreeMap<WireValue, u8> =
        (1..=12u16).map(|label| (WireValue(label * 10), 4)).collect();
    for special in [11, 21, 31, 51, 65] {
        distribution.insert(WireValue(special), 1);
    }
    distribution.insert(WireValue(990), 2);
    distribution
});

/// How strictly events are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Full consistency checks: a caller must hold the value they call.
    #[default]
    Simulation,
    /// Physical-table play; possession checks are relaxed.
    Irl,
}

/// Immutable game parameters. Derived quantities (sorted values, hand
/// length, deck vector) live in [`DeckLayout`], built once per engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub wire_distribution: BTreeMap<WireValue, u8>,
    pub players: u8,
    pub max_wrong_calls: u32,
    #[serde(default)]
    pub mode: PlayMode,
    #[serde(default = "default_true")]
    pub global_solver: bool,
    #[serde(default)]
    pub global_budget_ms: Option<u64>,
    #[serde(default = "default_subset_len")]
    pub max_subset_len: usize,
    #[serde(default = "default_true")]
    pub chain_filter: bool,
}

fn default_true() -> bool {
    true
}

fn default_subset_len() -> usize {
    4
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            wire_distribution: CLASSIC_DISTRIBUTION.clone(),
            players: 5,
            max_wrong_calls: 5,
            mode: PlayMode::Simulation,
            global_solver: true,
            global_budget_ms: Some(2_000),
            max_subset_len: default_subset_len(),
            chain_filter: true,
        }
    }
}

impl GameConfig {
    /// Small explicit distribution, handy for tests and examples.
    pub fn with_distribution<I>(players: u8, distribution: I) -> Self
    where
        I: IntoIterator<Item = (u16, u8)>,
    {
        Self {
            wire_distribution: distribution
                .into_iter()
                .map(|(label, copies)| (WireValue(label), copies))
                .collect(),
            players,
            ..Self::default()
        }
    }

    pub fn copies_of(&self, value: WireValue) -> u8 {
        self.wire_distribution.get(&value).copied().unwrap_or(0)
    }

    /// Validates the parameters and materializes the derived layout.
    pub fn layout(&self) -> Result<DeckLayout, ConfigError> {
        DeckLayout::new(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout().map(|_| ())
    }
}

/// Sorted value list with copy counts and per-game dimensions, derived
/// from a validated [`GameConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLayout {
    values: Vec<WireValue>,
    copies: Vec<u8>,
    total_wires: usize,
    hand_len: usize,
    players: usize,
}

impl DeckLayout {
    fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        if config.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if config.max_wrong_calls == 0 {
            return Err(ConfigError::NoStrikes);
        }
        if config.wire_distribution.is_empty() {
            return Err(ConfigError::EmptyDistribution);
        }
        if config.wire_distribution.len() > MAX_VALUES {
            return Err(ConfigError::TooManyValues {
                count: config.wire_distribution.len(),
            });
        }
        if let Some((&value, _)) = config
            .wire_distribution
            .iter()
            .find(|(_, &copies)| copies == 0)
        {
            return Err(ConfigError::ZeroCopies { value });
        }

        // BTreeMap iteration is already label-ordered.
        let values: Vec<WireValue> = config.wire_distribution.keys().copied().collect();
        let copies: Vec<u8> = config.wire_distribution.values().copied().collect();
        let total_wires: usize = copies.iter().map(|&count| count as usize).sum();
        let players = config.players as usize;
        if total_wires % players != 0 {
            return Err(ConfigError::UnevenDeal {
                total_wires,
                players,
            });
        }

        Ok(Self {
            hand_len: total_wires / players,
            values,
            copies,
            total_wires,
            players,
        })
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn hand_len(&self) -> usize {
        self.hand_len
    }

    pub fn total_wires(&self) -> usize {
        self.total_wires
    }

    pub fn value(&self, index: usize) -> WireValue {
        self.values[index]
    }

    pub fn values(&self) -> &[WireValue] {
        &self.values
    }

    pub fn copies(&self, index: usize) -> u8 {
        self.copies[index]
    }

    pub fn index_of(&self, value: WireValue) -> Option<usize> {
        self.values.binary_search(&value).ok()
    }

    pub fn full_set(&self) -> ValueSet {
        ValueSet::full(self.values.len())
    }

    /// Values whose total copy count equals `class` (copy-count signals).
    pub fn class_set(&self, class: u8) -> ValueSet {
        let mut set = ValueSet::EMPTY;
        for (index, &copies) in self.copies.iter().enumerate() {
            if copies == class {
                set.insert(index);
            }
        }
        set
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("wire distribution is empty")]
    EmptyDistribution,
    #[error("value {value} has zero copies")]
    ZeroCopies { value: WireValue },
    #[error("{count} distinct values exceed the supported {max}", max = MAX_VALUES)]
    TooManyValues { count: usize },
    #[error("{total_wires} wires cannot be dealt evenly to {players} players")]
    UnevenDeal { total_wires: usize, players: usize },
    #[error("at least one player is required")]
    NoPlayers,
    #[error("at least one wrong call must be allowed")]
    NoStrikes,
}
