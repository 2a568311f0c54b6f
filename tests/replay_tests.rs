//! Transcript Replay Tests
//!
//! These tests feed JSON-lines transcripts through a headless session, the
//! way the replay binary does.

mod common;

use poker_client::config::SessionConfig;
use poker_client::game::GamePhase;
use poker_client::{create_session, create_test_session, replay};
use serde_json::json;

fn transcript(lines: &[serde_json::Value]) -> String {
    lines
        .iter()
        .map(|line| line.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_replay_full_hand() {
    let mut session = create_test_session("A");
    let text = transcript(&[
        json!({"event": "started_game", "payload": common::heads_up(Some("A"))}),
        json!({"event": "paid_in_round_update", "payload": {"A": 10, "B": 10}}),
        json!({"event": "pot_update", "payload": {"amount": 5}}),
        json!({"event": "flop_dealt", "payload": {"cards": [
            {"rank": "two", "suit": "hearts"},
            {"rank": "seven", "suit": "clubs"},
            {"rank": "queen", "suit": "diamonds"}
        ]}}),
        json!({"event": "advance", "payload": {"player": "B"}}),
        json!({"event": "winner_message", "payload": {"message": "B wins 20"}}),
        json!({"event": "game_finished", "payload": {"message": "Hand over"}}),
    ]);

    let summary = replay::replay(&mut session, &text);
    assert_eq!(summary.applied, 7);
    assert_eq!(summary.skipped, 0);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, GamePhase::BetweenRounds);
    assert_eq!(snapshot.pot, 0);
    assert!(snapshot.table.is_empty());

    let table = &session.components().unwrap().table;
    assert_eq!(session.surface().text(table.handles().winner), Some("B wins 20"));
    assert!(session.surface().children(table.handles().board).is_empty());
}

#[test]
fn test_replay_skips_bad_lines() {
    let mut session = create_test_session("A");
    let text = [
        "# comment",
        "",
        "{broken",
        r#"{"event": "pot_update", "payload": {"amount": "ten"}}"#,
        r#"{"event": "mystery", "payload": {}}"#,
        r#"{"event": "pot_update", "payload": {"amount": 10}}"#,
    ]
    .join("\n");

    let summary = replay::replay(&mut session, &text);
    // Unknown events are ignored, not failures
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(session.snapshot().pot, 10);
}

#[tokio::test]
async fn test_replay_from_file() {
    let path = std::env::temp_dir().join(format!("poker-replay-{}.jsonl", std::process::id()));
    let text = transcript(&[
        json!({"event": "private_room_join", "payload": common::idle_single()}),
        json!({"event": "update_num_players", "payload": {"room": "7", "number": 1}}),
    ]);
    tokio::fs::write(&path, &text).await.unwrap();

    let loaded = tokio::fs::read_to_string(&path).await.unwrap();
    let mut session = create_session(SessionConfig::new("A", "7"));
    session.mount().unwrap();
    let summary = replay::replay(&mut session, &loaded);
    assert_eq!(summary.applied, 2);

    let rooms = &session.components().unwrap().rooms;
    assert_eq!(rooms.text("7"), Some("1 player currently at table"));

    tokio::fs::remove_file(&path).await.unwrap();
}
