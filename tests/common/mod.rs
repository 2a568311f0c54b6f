//! Shared fixtures for the integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// Heads-up hand on the pre-flop: A to act, facing a call of 10
pub fn heads_up(active: Option<&str>) -> Value {
    json!({
        "state": "pre_flop",
        "active": active,
        "seating": [{"name": "A", "position": 1}, {"name": "B", "position": 2}],
        "paid": {"A": 5, "B": 10},
        "round": {"A": 5, "B": 10},
        "to_call": 10,
        "pot": 15,
        "table": [],
        "chip_roll": {"A": 200, "B": 200},
        "players": [{"name": "A", "chips": 200}, {"name": "B", "chips": 200}],
        "player_hands": [
            {"player": "A", "hand": [{"rank": "ace", "suit": "spades"}, {"rank": "king", "suit": "spades"}]}
        ]
    })
}

/// Same hand after the flop with B to act
pub fn flop(active: &str) -> Value {
    let mut snapshot = heads_up(Some(active));
    snapshot["state"] = json!("flop");
    snapshot["round"] = json!({});
    snapshot["to_call"] = json!(0);
    snapshot["pot"] = json!(20);
    snapshot["table"] = json!([
        {"rank": "two", "suit": "hearts"},
        {"rank": "seven", "suit": "clubs"},
        {"rank": "queen", "suit": "diamonds"}
    ]);
    snapshot
}

/// Lone player waiting at an idle table
pub fn idle_single() -> Value {
    json!({
        "state": "idle",
        "active": null,
        "seating": {"A": 1},
        "chip_roll": {"A": 200}
    })
}
