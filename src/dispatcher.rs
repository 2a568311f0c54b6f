//! Routes decoded channel events to the session

use serde_json::Value;

use crate::channel::{Channel, InboundMessage};
use crate::dom::Surface;
use crate::format::format_seating;
use crate::game::{ClientError, ClientResult};
use crate::session::GameSession;

/// Decodes and dispatches one event. Unknown names are logged and ignored;
/// a known name with an unreadable payload is an error.
pub fn dispatch_raw<S: Surface, C: Channel>(
    session: &mut GameSession<S, C>,
    name: &str,
    payload: Value,
) -> ClientResult<()> {
    match InboundMessage::from_event(name, payload) {
        Ok(message) => dispatch(session, message),
        Err(ClientError::UnknownMessage { name }) => {
            tracing::warn!("Ignoring unknown message {}", name);
            Ok(())
        }
        Err(e) => {
            tracing::warn!("{}", e);
            Err(e)
        }
    }
}

pub fn dispatch<S: Surface, C: Channel>(
    session: &mut GameSession<S, C>,
    message: InboundMessage,
) -> ClientResult<()> {
    tracing::debug!("Dispatching {}", message.name());
    match message {
        InboundMessage::PrivateRoomJoin(raw) | InboundMessage::StartedGame(raw) => {
            session.setup(raw)
        }
        InboundMessage::GameStarted(raw) | InboundMessage::Update(raw) => session.update(raw),

        InboundMessage::AddPlayerSuccess { seating } => {
            session.apply_delta(|s| s.seating = format_seating(&seating))
        }
        InboundMessage::PlayerSeated { position, player } => session.apply_delta(|s| {
            s.seating.insert(player, position);
        }),
        InboundMessage::PlayerGotUp { player } => session.apply_delta(|s| {
            s.seating.remove(&player);
        }),
        InboundMessage::PlayerLeft { body } => session.player_left(&body.name),

        InboundMessage::PotUpdate { amount } => session.apply_delta(|s| s.pot += amount),
        InboundMessage::CallAmountUpdate { amount } => {
            session.apply_delta(|s| s.to_call = amount)
        }
        InboundMessage::PaidInRoundUpdate(round) => session.apply_delta(|s| s.round = round),
        InboundMessage::Advance { player } => session.apply_delta(|s| s.active = Some(player)),

        InboundMessage::FlopDealt { cards } => session.deal(cards),
        InboundMessage::CardDealt { card } => session.deal(card),
        InboundMessage::ClearTable {} => session.apply_delta(|s| {
            s.table.clear();
            s.pot = 0;
        }),

        InboundMessage::GameFinished { message } => session.finish(message),
        InboundMessage::WinnerMessage { message } => session.show_winner(&message),

        InboundMessage::NewMessage { name, text } => session.receive_chat(&name, &text),

        InboundMessage::InvitationReceived {
            title,
            id,
            participants,
            owner,
        } => session.receive_invitation(&title, &id, &participants, &owner),
        InboundMessage::DeclinedInvitation { remove } => {
            session.remove_invitation(&remove, "Declined invitation")
        }
        InboundMessage::RoomTerminated { remove } => {
            session.remove_invitation(&remove, "Room terminated")
        }
        InboundMessage::DeclineError { room } => {
            session.decline_failed(&room);
            Ok(())
        }
        InboundMessage::UpdatePages {
            current_page,
            total_pages,
            entries,
        } => session.update_pages(current_page, total_pages, &entries),

        InboundMessage::UpdateNumPlayers { room, number } => {
            session.update_occupancy(&room, number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::config::SessionConfig;
    use crate::dom::MemorySurface;
    use serde_json::json;

    fn session() -> GameSession<MemorySurface, RecordingChannel> {
        let config = SessionConfig::new("A", "7");
        let channel = RecordingChannel::new(config.topic());
        let mut session = GameSession::new(config, MemorySurface::new(), channel);
        session.mount().unwrap();
        session
    }

    #[test]
    fn test_unknown_name_is_ignored() {
        let mut s = session();
        let before = s.surface().mutation_count();
        dispatch_raw(&mut s, "presence_diff", json!({})).unwrap();
        assert_eq!(s.surface().mutation_count(), before);
    }

    #[test]
    fn test_malformed_payload_is_reported() {
        let mut s = session();
        let res = dispatch_raw(&mut s, "pot_update", json!({"amount": "ten"}));
        assert!(matches!(res, Err(ClientError::MalformedPayload { .. })));
    }

    #[test]
    fn test_deltas_accumulate() {
        let mut s = session();
        dispatch_raw(&mut s, "player_seated", json!({"position": 2, "player": "B"})).unwrap();
        dispatch_raw(&mut s, "pot_update", json!({"amount": 15})).unwrap();
        dispatch_raw(&mut s, "pot_update", json!({"amount": 10})).unwrap();
        dispatch_raw(&mut s, "advance", json!({"player": "B"})).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.seating.get("B"), Some(&2));
        assert_eq!(snap.pot, 25);
        assert_eq!(snap.active.as_deref(), Some("B"));

        dispatch_raw(&mut s, "player_got_up", json!({"player": "B"})).unwrap();
        assert!(s.snapshot().seating.is_empty());
    }

    #[test]
    fn test_game_finished_clears_hand_state() {
        let mut s = session();
        dispatch_raw(&mut s, "pot_update", json!({"amount": 40})).unwrap();
        dispatch_raw(&mut s, "game_finished", json!({"message": "B wins"})).unwrap();
        assert_eq!(s.snapshot().pot, 0);
        assert_eq!(s.surface().toasts().last().map(|t| t.text.as_str()), Some("B wins"));
    }
}
