//! Game Session Integration Tests
//!
//! These tests drive a mounted headless session through channel events and
//! UI interaction.

mod common;

use poker_client::channel::OutboundMessage;
use poker_client::controls::ControlState;
use poker_client::create_test_session;
use poker_client::registry::UiEvent;
use poker_client::toolbar::ToolbarLayout;
use serde_json::json;

// ============================================================================
// Reconciliation
// ============================================================================

#[test]
fn test_identical_snapshot_makes_no_mutations() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();

    let before = session.surface().mutation_count();
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    assert_eq!(session.surface().mutation_count(), before);

    session.handle_event("update", common::flop("B")).unwrap();
    let before = session.surface().mutation_count();
    session.handle_event("update", common::flop("B")).unwrap();
    assert_eq!(session.surface().mutation_count(), before);
}

#[test]
fn test_snapshot_renders_table() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::flop("B")).unwrap();

    let table = &session.components().unwrap().table;
    let surface = session.surface();
    assert_eq!(surface.text(table.handles().pot), Some("20"));
    assert_eq!(surface.children(table.handles().board).len(), 3);
    let b = table.emblem("B").unwrap();
    assert!(surface.has_class(b, "active"));
    assert_eq!(table.rendered_seating().get("A"), Some(&1));
    assert!(surface.is_visible(table.handles().hole_left));
}

#[test]
fn test_advance_moves_active_highlight() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::flop("B")).unwrap();
    session.handle_event("advance", json!({"player": "A"})).unwrap();

    let table = &session.components().unwrap().table;
    let surface = session.surface();
    assert!(surface.has_class(table.emblem("A").unwrap(), "active"));
    assert!(!surface.has_class(table.emblem("B").unwrap(), "active"));
}

#[test]
fn test_turn_appends_single_card() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::flop("B")).unwrap();
    let board = session.components().unwrap().table.handles().board;
    let first = session.surface().children(board)[0];

    let mut turn = common::flop("B");
    turn["state"] = json!("turn");
    turn["table"]
        .as_array_mut()
        .unwrap()
        .push(json!({"rank": "ace", "suit": "hearts"}));
    session.handle_event("update", turn).unwrap();

    let children = session.surface().children(board);
    assert_eq!(children.len(), 4);
    assert_eq!(children[0], first);
}

#[test]
fn test_out_of_range_seat_is_skipped() {
    let mut session = create_test_session("A");
    let mut raw = common::heads_up(None);
    raw["seating"] = json!({"A": 1, "Z": 9});
    session.handle_event("update", raw).unwrap();

    let table = &session.components().unwrap().table;
    assert!(table.emblem("A").is_some());
    assert!(table.emblem("Z").is_none());
}

// ============================================================================
// Controls and raising
// ============================================================================

#[test]
fn test_controls_follow_turn() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    assert_eq!(
        session.components().unwrap().controls.state(),
        ControlState::RaiseCallFold
    );

    session.handle_event("update", common::heads_up(Some("B"))).unwrap();
    assert_eq!(
        session.components().unwrap().controls.state(),
        ControlState::Hidden
    );
}

#[test]
fn test_raise_entry_is_clamped_and_pushed() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    let raise = *session.components().unwrap().raise.handles();

    session.handle_ui(raise.open_button, UiEvent::Click).unwrap();
    assert!(session.surface().is_visible(raise.panel));

    session.handle_ui(raise.input, UiEvent::Input("300".into())).unwrap();
    assert_eq!(session.surface().text(raise.display), Some("205"));

    session.handle_ui(raise.input, UiEvent::Input("1".into())).unwrap();
    assert_eq!(session.surface().text(raise.display), Some("5"));

    session.handle_ui(raise.increase, UiEvent::Click).unwrap();
    session.handle_ui(raise.submit, UiEvent::Click).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::PlayerRaised {
            player: "A".to_string(),
            amount: 10
        }]
    );
}

#[test]
fn test_call_push() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    let call = session.components().unwrap().controls.handles().call;
    session.handle_ui(call, UiEvent::Click).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::PlayerCalled {
            player: "A".to_string()
        }]
    );
}

#[test]
fn test_acting_twice_pushes_once() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    let call = session.components().unwrap().controls.handles().call;

    session.handle_ui(call, UiEvent::Click).unwrap();
    session.handle_ui(call, UiEvent::Click).unwrap();
    assert_eq!(session.channel().pushes().len(), 1);
    assert!(!session.surface().is_visible(call));

    // The pot moves before the turn does
    session.handle_event("pot_update", json!({"amount": 20})).unwrap();
    assert!(!session.surface().is_visible(call));
    session.handle_ui(call, UiEvent::Click).unwrap();
    assert_eq!(session.channel().pushes().len(), 1);

    session.handle_event("advance", json!({"player": "B"})).unwrap();
    session.handle_event("advance", json!({"player": "A"})).unwrap();
    assert!(session.surface().is_visible(call));
}

#[test]
fn test_raise_submit_twice_pushes_once() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    let raise = *session.components().unwrap().raise.handles();

    session.handle_ui(raise.open_button, UiEvent::Click).unwrap();
    session.handle_ui(raise.submit, UiEvent::Click).unwrap();
    assert!(!session.surface().is_visible(raise.panel));
    session.handle_ui(raise.submit, UiEvent::Click).unwrap();

    // The raise button is gone too, so the panel cannot be reopened
    session.handle_ui(raise.open_button, UiEvent::Click).unwrap();
    session.handle_ui(raise.submit, UiEvent::Click).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::PlayerRaised {
            player: "A".to_string(),
            amount: 105
        }]
    );
    assert_eq!(
        session.components().unwrap().controls.state(),
        ControlState::Hidden
    );
}

// ============================================================================
// Toolbar
// ============================================================================

#[test]
fn test_join_then_leave() {
    let mut session = create_test_session("C");
    session.handle_event("update", common::idle_single()).unwrap();
    let toolbar = *session.components().unwrap().toolbar.handles();
    assert_eq!(
        session.components().unwrap().toolbar.layout(),
        Some(ToolbarLayout::Join)
    );

    session.handle_ui(toolbar.join, UiEvent::Click).unwrap();
    session.handle_ui(toolbar.join_input, UiEvent::Input("20".into())).unwrap();
    session.handle_ui(toolbar.join_submit, UiEvent::Click).unwrap();
    assert!(session.channel().pushes().is_empty());
    assert!(session.surface().is_visible(toolbar.join_error));

    session.handle_ui(toolbar.join_input, UiEvent::Input("500".into())).unwrap();
    session.handle_ui(toolbar.join_input, UiEvent::Enter).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::AddPlayer {
            player: "C".to_string(),
            room: "7".to_string(),
            amount: 500
        }]
    );

    session
        .handle_event("player_seated", json!({"position": 3, "player": "C"}))
        .unwrap();
    assert_eq!(
        session.components().unwrap().toolbar.layout(),
        Some(ToolbarLayout::StartLeave)
    );

    session.handle_ui(toolbar.leave, UiEvent::Click).unwrap();
    assert!(matches!(
        session.channel().pushes().last(),
        Some(OutboundMessage::RemovePlayer { .. })
    ));
    assert_eq!(
        session.components().unwrap().toolbar.layout(),
        Some(ToolbarLayout::Join)
    );
}

#[test]
fn test_leave_survives_later_deltas() {
    let mut session = create_test_session("A");
    session.handle_event("update", common::heads_up(Some("B"))).unwrap();
    let leave = session.components().unwrap().toolbar.handles().leave;
    assert_eq!(
        session.components().unwrap().toolbar.layout(),
        Some(ToolbarLayout::Leave)
    );

    session.handle_ui(leave, UiEvent::Click).unwrap();
    assert!(!session.snapshot().is_seated("A"));
    assert!(session.components().unwrap().table.emblem("A").is_none());

    session.handle_event("pot_update", json!({"amount": 5})).unwrap();
    assert_eq!(
        session.components().unwrap().toolbar.layout(),
        Some(ToolbarLayout::Join)
    );

    session.handle_ui(leave, UiEvent::Click).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::RemovePlayer {
            player: "A".to_string(),
            room: "7".to_string()
        }]
    );
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_unmount_and_remount_keep_single_handlers() {
    let mut session = create_test_session("A");
    let listeners = session.registry().listener_count();
    session.unmount();
    assert_eq!(session.channel().live_subscriptions(), 0);

    session.mount().unwrap();
    assert_eq!(session.registry().listener_count(), listeners);
    assert_eq!(session.channel().subscription_count("update"), 1);

    // Old handles are gone with the old page
    session.handle_event("update", common::heads_up(Some("A"))).unwrap();
    let call = session.components().unwrap().controls.handles().call;
    session.handle_ui(call, UiEvent::Click).unwrap();
    assert_eq!(session.channel().pushes().len(), 1);
}

#[test]
fn test_unknown_event_is_ignored() {
    let mut session = create_test_session("A");
    let before = session.surface().mutation_count();
    session.handle_event("presence_state", json!({"x": 1})).unwrap();
    assert_eq!(session.surface().mutation_count(), before);
}

// ============================================================================
// Chat, bank roll and invitations
// ============================================================================

#[test]
fn test_chat_round_trip() {
    let mut session = create_test_session("A");
    let chat = *session.components().unwrap().chat.handles();
    session.handle_ui(chat.input, UiEvent::Input("hi <all>".into())).unwrap();
    session.handle_ui(chat.submit, UiEvent::Click).unwrap();
    assert_eq!(
        session.channel().pushes(),
        &[OutboundMessage::ChatMessage {
            input: "hi &lt;all&gt;".to_string()
        }]
    );

    session
        .handle_event("new_message", json!({"name": "B", "text": "hello"}))
        .unwrap();
    assert_eq!(session.surface().child_texts(chat.messages), vec!["hello".to_string()]);
}

#[test]
fn test_rejected_bank_request_shows_toast() {
    let mut session = create_test_session("A");
    session.channel_mut().reject("request_chips");
    let bank = *session.components().unwrap().bank.handles();
    session.handle_ui(bank.input, UiEvent::Input("300".into())).unwrap();
    session.handle_ui(bank.submit, UiEvent::Click).unwrap();
    assert!(session.channel().pushes().is_empty());
    assert_eq!(
        session.surface().toasts().last().map(|t| t.text.as_str()),
        Some("Bank update failed")
    );
}

#[test]
fn test_invitation_decline_flow() {
    let mut session = create_test_session("A");
    session
        .handle_event(
            "invitation_received",
            json!({"title": "Friday", "id": 12, "participants": 2, "owner": "zoe"}),
        )
        .unwrap();
    assert_eq!(session.components().unwrap().invitations.count(), 1);

    let list = session.components().unwrap().invitations.handles().list;
    let row = session.surface().children(list)[0];
    let decline = *session.surface().children(row).last().unwrap();
    session.handle_ui(decline, UiEvent::Click).unwrap();
    assert!(matches!(
        session.channel().pushes().last(),
        Some(OutboundMessage::DeclineInvitation { .. })
    ));

    let listeners = session.registry().listener_count();
    session
        .handle_event("declined_invitation", json!({"remove": "row-12"}))
        .unwrap();
    assert_eq!(session.components().unwrap().invitations.count(), 0);
    assert_eq!(session.registry().listener_count(), listeners - 1);
}
