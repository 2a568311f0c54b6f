//! Game snapshot shapes
//!
//! `RawSnapshot` is what the server pushes; it tolerates both wire shapes of
//! the seating field and missing optional collections. `NormalizedSnapshot`
//! is the one canonical in-memory shape every component renders from. Both
//! are transient: re-derived from each push and discarded on the next.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::card::Card;
use super::constants::{RIVER_BOARD, TURN_BOARD};

/// Player name to visual seat slot
pub type SeatMap = BTreeMap<String, usize>;

/// Player name to chip amount
pub type ChipMap = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    PreFlop,
    Flop,
    Turn,
    River,
    BetweenRounds,
}

impl GamePhase {
    /// Phases in which a player can bet
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            GamePhase::PreFlop | GamePhase::Flop | GamePhase::Turn | GamePhase::River
        )
    }

    /// Phases in which the community board is empty
    pub fn clears_board(self) -> bool {
        matches!(
            self,
            GamePhase::Idle | GamePhase::PreFlop | GamePhase::BetweenRounds
        )
    }

    /// No hand is running; seated players may start one
    pub fn is_open(self) -> bool {
        matches!(self, GamePhase::Idle | GamePhase::BetweenRounds)
    }

    /// Street implied by a board of `len` cards
    pub fn for_board(len: usize) -> GamePhase {
        match len {
            0 => GamePhase::PreFlop,
            n if n < TURN_BOARD => GamePhase::Flop,
            n if n < RIVER_BOARD => GamePhase::Turn,
            _ => GamePhase::River,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatEntry {
    pub name: String,
    pub position: usize,
}

/// Seating arrives either as `[{name, position}]` or as `{name: position}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seating {
    List(Vec<SeatEntry>),
    Map(SeatMap),
}

impl Default for Seating {
    fn default() -> Self {
        Seating::Map(SeatMap::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChips {
    pub name: String,
    pub chips: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub player: String,
    pub hand: Vec<Card>,
}

/// One complete server-pushed representation of the table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub state: GamePhase,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub seating: Seating,
    #[serde(default)]
    pub paid: ChipMap,
    #[serde(default)]
    pub round: ChipMap,
    #[serde(default)]
    pub to_call: i64,
    #[serde(default)]
    pub pot: i64,
    #[serde(default)]
    pub table: Vec<Card>,
    #[serde(default)]
    pub chip_roll: ChipMap,
    /// Only read when `chip_roll` is empty; the chip roll wins otherwise
    #[serde(default)]
    pub players: Vec<PlayerChips>,
    #[serde(default)]
    pub player_hands: Vec<PlayerHand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub chips: i64,
}

impl Player {
    pub fn new(name: impl Into<String>, chips: i64) -> Self {
        Self {
            name: name.into(),
            chips,
        }
    }
}

/// Legal range for the local player's raise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseBounds {
    pub raiseable: bool,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RaiseBounds {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn open(min: i64, max: i64) -> Self {
        Self {
            raiseable: true,
            min: Some(min),
            max: Some(max),
        }
    }

    /// `(min, max)` when raising is allowed
    pub fn range(&self) -> Option<(i64, i64)> {
        match (self.raiseable, self.min, self.max) {
            (true, Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Canonical snapshot as seen by the local user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSnapshot {
    pub user: String,
    pub state: GamePhase,
    pub active: Option<String>,
    pub seating: SeatMap,
    pub paid: ChipMap,
    pub round: ChipMap,
    pub to_call: i64,
    pub pot: i64,
    pub table: Vec<Card>,
    pub chip_roll: ChipMap,
    pub players: Vec<Player>,
    pub player_hand: Option<Vec<Card>>,
    pub raise: RaiseBounds,
}

impl NormalizedSnapshot {
    /// Idle table with nobody seated, used until the first full snapshot arrives
    pub fn empty(user: &str) -> Self {
        Self {
            user: user.to_string(),
            ..Default::default()
        }
    }

    pub fn is_user_active(&self) -> bool {
        self.active.as_deref() == Some(self.user.as_str())
    }

    pub fn is_seated(&self, name: &str) -> bool {
        self.seating.contains_key(name)
    }

    /// Amount `name` has already committed in the current betting round
    pub fn paid_in_round(&self, name: &str) -> i64 {
        self.round.get(name).copied().unwrap_or(0)
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }
}
