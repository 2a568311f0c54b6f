//! Data Formatter
//!
//! Turns whatever shape the server pushed into the canonical
//! [`NormalizedSnapshot`] and derives the local player's raise bounds.
//! Everything here is pure; nothing touches the surface.

use crate::game::{
    Card, ChipMap, NormalizedSnapshot, Player, PlayerHand, RaiseBounds, RawSnapshot, SeatMap,
    Seating,
};

/// Normalizes snapshots for one local user
#[derive(Debug, Clone)]
pub struct DataFormatter {
    user: String,
}

impl DataFormatter {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn format(&self, raw: RawSnapshot) -> NormalizedSnapshot {
        let seating = format_seating(&raw.seating);
        let chip_roll = if raw.chip_roll.is_empty() {
            raw.players
                .iter()
                .map(|p| (p.name.clone(), p.chips))
                .collect()
        } else {
            raw.chip_roll
        };
        let players = extract_players(&chip_roll);
        let player_hand = extract_player_hand(&raw.player_hands, &self.user);

        if raw.state.is_betting() {
            if let Some(missing) = seating.keys().find(|name| !chip_roll.contains_key(*name)) {
                tracing::debug!("Seated player {} has no chip roll entry", missing);
            }
        }

        let mut snapshot = NormalizedSnapshot {
            user: self.user.clone(),
            state: raw.state,
            active: raw.active,
            seating,
            paid: raw.paid,
            round: raw.round,
            to_call: raw.to_call,
            pot: raw.pot,
            table: raw.table,
            chip_roll,
            players,
            player_hand,
            raise: RaiseBounds::closed(),
        };
        snapshot.raise = extract_raise_data(&snapshot);
        snapshot
    }
}

/// Collapses either seating wire shape into one name-to-seat map
pub fn format_seating(seating: &Seating) -> SeatMap {
    match seating {
        Seating::List(entries) => entries
            .iter()
            .map(|seat| (seat.name.clone(), seat.position))
            .collect(),
        Seating::Map(map) => map.clone(),
    }
}

/// Players are rebuilt from the chip roll, which is authoritative for stacks
pub fn extract_players(chip_roll: &ChipMap) -> Vec<Player> {
    chip_roll
        .iter()
        .map(|(name, chips)| Player::new(name.clone(), *chips))
        .collect()
}

/// The local user's hole cards, if the server dealt them any
pub fn extract_player_hand(hands: &[PlayerHand], user: &str) -> Option<Vec<Card>> {
    hands
        .iter()
        .find(|hand| hand.player == user)
        .map(|hand| hand.hand.clone())
}

/// Raise bounds for the local user.
///
/// Raising is only possible during a betting street, on the user's own turn,
/// and when the user's stack plus what they already put in this round exceeds
/// the amount to call. An active user missing from `players` gets closed
/// bounds rather than no bounds.
pub fn extract_raise_data(snapshot: &NormalizedSnapshot) -> RaiseBounds {
    if !snapshot.state.is_betting() {
        return RaiseBounds::closed();
    }

    let Some(active) = snapshot.active.as_deref() else {
        return RaiseBounds::closed();
    };

    if active != snapshot.user {
        return RaiseBounds::closed();
    }

    let Some(player) = snapshot.player(active) else {
        tracing::warn!(
            "Active player {} is not in the player list; raise disabled",
            active
        );
        return RaiseBounds::closed();
    };

    let round = snapshot.paid_in_round(active);
    let effective_stack = player.chips + round;

    if effective_stack > snapshot.to_call {
        RaiseBounds::open(snapshot.to_call - round, effective_stack)
    } else {
        RaiseBounds::closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GamePhase, PlayerChips, SeatEntry};

    fn chips(entries: &[(&str, i64)]) -> ChipMap {
        entries
            .iter()
            .map(|(name, amount)| (name.to_string(), *amount))
            .collect()
    }

    fn heads_up(active: Option<&str>) -> RawSnapshot {
        RawSnapshot {
            state: GamePhase::PreFlop,
            active: active.map(str::to_string),
            round: chips(&[("A", 5), ("B", 10)]),
            paid: chips(&[("A", 5), ("B", 10)]),
            to_call: 10,
            pot: 15,
            chip_roll: chips(&[("A", 200), ("B", 200)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_bounds_for_active_user() {
        let res = DataFormatter::new("A").format(heads_up(Some("A")));
        assert_eq!(res.raise, RaiseBounds::open(5, 205));
    }

    #[test]
    fn test_closed_when_someone_else_is_active() {
        let res = DataFormatter::new("A").format(heads_up(Some("B")));
        assert_eq!(res.raise, RaiseBounds::closed());
    }

    #[test]
    fn test_closed_when_stack_does_not_cover_call() {
        let mut raw = heads_up(Some("A"));
        raw.chip_roll.insert("A".to_string(), 3);
        let res = DataFormatter::new("A").format(raw);
        assert!(!res.raise.raiseable);
        assert_eq!(res.raise.min, None);
        assert_eq!(res.raise.max, None);
    }

    #[test]
    fn test_closed_when_active_player_missing() {
        let mut raw = heads_up(Some("A"));
        raw.chip_roll.remove("A");
        let res = DataFormatter::new("A").format(raw);
        assert_eq!(res.raise, RaiseBounds::closed());
    }

    #[test]
    fn test_closed_between_rounds() {
        let mut raw = heads_up(Some("A"));
        raw.state = GamePhase::BetweenRounds;
        let res = DataFormatter::new("A").format(raw);
        assert_eq!(res.raise, RaiseBounds::closed());
    }

    #[test]
    fn test_format_seating_list() {
        let seating = Seating::List(vec![
            SeatEntry {
                name: "A".to_string(),
                position: 1,
            },
            SeatEntry {
                name: "B".to_string(),
                position: 2,
            },
        ]);
        let map = format_seating(&seating);
        assert_eq!(map.get("A"), Some(&1));
        assert_eq!(map.get("B"), Some(&2));
    }

    #[test]
    fn test_players_follow_chip_roll() {
        let players = extract_players(&chips(&[("B", 150), ("A", 200)]));
        assert_eq!(players, vec![Player::new("A", 200), Player::new("B", 150)]);
    }

    #[test]
    fn test_players_list_stands_in_for_missing_chip_roll() {
        let mut raw = heads_up(Some("A"));
        raw.chip_roll.clear();
        raw.players = vec![
            PlayerChips { name: "A".to_string(), chips: 200 },
            PlayerChips { name: "B".to_string(), chips: 200 },
        ];
        let res = DataFormatter::new("A").format(raw);
        assert_eq!(res.chip_roll, chips(&[("A", 200), ("B", 200)]));
        assert_eq!(res.raise, RaiseBounds::open(5, 205));

        // A chip roll, when present, wins over the list
        let mut raw = heads_up(Some("A"));
        raw.players = vec![PlayerChips { name: "A".to_string(), chips: 1 }];
        let res = DataFormatter::new("A").format(raw);
        assert_eq!(res.players, vec![Player::new("A", 200), Player::new("B", 200)]);
    }
}
