use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::game::{Card, ChipMap, ClientError, ClientResult, RawSnapshot, Seating};

/// Room identifier; the server sends these as numbers or strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RoomIdRepr")]
pub struct RoomId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RoomIdRepr {
    Text(String),
    Number(i64),
}

impl From<RoomIdRepr> for RoomId {
    fn from(repr: RoomIdRepr) -> Self {
        match repr {
            RoomIdRepr::Text(s) => RoomId(s),
            RoomIdRepr::Number(n) => RoomId(n.to_string()),
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// "Currently playing" column of an invitation: a head count or a name list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Participants {
    Count(i64),
    Names(Vec<String>),
}

impl fmt::Display for Participants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participants::Count(n) => write!(f, "{}", n),
            Participants::Names(names) => write!(f, "{}", names.join(", ")),
        }
    }
}

impl Default for Participants {
    fn default() -> Self {
        Participants::Count(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftBody {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub title: String,
    #[serde(default)]
    pub participants: Participants,
    pub link: String,
}

/// Every event the table client listens for on its channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
#[allow(clippy::large_enum_variant)] // Snapshots are the primary messages
pub enum InboundMessage {
    // Full snapshots
    PrivateRoomJoin(RawSnapshot),
    StartedGame(RawSnapshot),
    GameStarted(RawSnapshot),
    Update(RawSnapshot),

    // Seating deltas
    AddPlayerSuccess {
        seating: Seating,
    },
    PlayerSeated {
        position: usize,
        player: String,
    },
    PlayerGotUp {
        player: String,
    },
    PlayerLeft {
        body: LeftBody,
    },

    // Betting deltas
    PotUpdate {
        amount: i64,
    },
    CallAmountUpdate {
        amount: i64,
    },
    PaidInRoundUpdate(ChipMap),
    Advance {
        player: String,
    },

    // Board deltas
    FlopDealt {
        cards: Vec<Card>,
    },
    CardDealt {
        card: Vec<Card>,
    },
    ClearTable {},

    // Hand results
    GameFinished {
        #[serde(default)]
        message: Option<String>,
    },
    WinnerMessage {
        message: String,
    },

    // Chat
    NewMessage {
        name: String,
        text: String,
    },

    // Notifications
    InvitationReceived {
        title: String,
        id: RoomId,
        #[serde(default)]
        participants: Participants,
        owner: String,
    },
    DeclinedInvitation {
        remove: String,
    },
    DeclineError {
        room: RoomId,
    },
    RoomTerminated {
        remove: String,
    },
    UpdatePages {
        current_page: u32,
        total_pages: u32,
        #[serde(default)]
        entries: Vec<PageEntry>,
    },

    // Lobby
    UpdateNumPlayers {
        room: String,
        #[serde(default)]
        number: Option<i64>,
    },
}

impl InboundMessage {
    /// Wire names of every inbound event
    pub const NAMES: &'static [&'static str] = &[
        "private_room_join",
        "started_game",
        "game_started",
        "update",
        "add_player_success",
        "player_seated",
        "player_got_up",
        "player_left",
        "pot_update",
        "call_amount_update",
        "paid_in_round_update",
        "advance",
        "flop_dealt",
        "card_dealt",
        "clear_table",
        "game_finished",
        "winner_message",
        "new_message",
        "invitation_received",
        "declined_invitation",
        "decline_error",
        "room_terminated",
        "update_pages",
        "update_num_players",
    ];

    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    /// Decodes one channel event. A null payload is read as an empty object.
    pub fn from_event(name: &str, payload: Value) -> ClientResult<Self> {
        if !Self::is_known(name) {
            return Err(ClientError::UnknownMessage {
                name: name.to_string(),
            });
        }
        let payload = if payload.is_null() { json!({}) } else { payload };
        serde_json::from_value(json!({ "event": name, "payload": payload })).map_err(|e| {
            ClientError::MalformedPayload {
                message: name.to_string(),
                reason: e.to_string(),
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            InboundMessage::PrivateRoomJoin(_) => "private_room_join",
            InboundMessage::StartedGame(_) => "started_game",
            InboundMessage::GameStarted(_) => "game_started",
            InboundMessage::Update(_) => "update",
            InboundMessage::AddPlayerSuccess { .. } => "add_player_success",
            InboundMessage::PlayerSeated { .. } => "player_seated",
            InboundMessage::PlayerGotUp { .. } => "player_got_up",
            InboundMessage::PlayerLeft { .. } => "player_left",
            InboundMessage::PotUpdate { .. } => "pot_update",
            InboundMessage::CallAmountUpdate { .. } => "call_amount_update",
            InboundMessage::PaidInRoundUpdate(_) => "paid_in_round_update",
            InboundMessage::Advance { .. } => "advance",
            InboundMessage::FlopDealt { .. } => "flop_dealt",
            InboundMessage::CardDealt { .. } => "card_dealt",
            InboundMessage::ClearTable {} => "clear_table",
            InboundMessage::GameFinished { .. } => "game_finished",
            InboundMessage::WinnerMessage { .. } => "winner_message",
            InboundMessage::NewMessage { .. } => "new_message",
            InboundMessage::InvitationReceived { .. } => "invitation_received",
            InboundMessage::DeclinedInvitation { .. } => "declined_invitation",
            InboundMessage::DeclineError { .. } => "decline_error",
            InboundMessage::RoomTerminated { .. } => "room_terminated",
            InboundMessage::UpdatePages { .. } => "update_pages",
            InboundMessage::UpdateNumPlayers { .. } => "update_num_players",
        }
    }
}

/// Every push the table client sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundMessage {
    // Toolbar
    AddPlayer {
        player: String,
        room: String,
        amount: i64,
    },
    RemovePlayer {
        player: String,
        room: String,
    },
    StartGame {
        room: String,
    },

    // Betting
    PlayerRaised {
        player: String,
        amount: i64,
    },
    PlayerCalled {
        player: String,
    },
    PlayerChecked {
        player: String,
    },
    PlayerFolded {
        player: String,
    },

    // Chat and account
    ChatMessage {
        input: String,
    },
    RequestChips {
        player: String,
        amount: i64,
    },

    // Notifications and lobby
    DeclineInvitation {
        room: RoomId,
    },
    NewPage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current: Option<u32>,
        get: String,
    },
    PlayerSearch {
        value: String,
    },
    GetNumPlayers {},
}

impl OutboundMessage {
    pub fn event(&self) -> &'static str {
        match self {
            OutboundMessage::AddPlayer { .. } => "add_player",
            OutboundMessage::RemovePlayer { .. } => "remove_player",
            OutboundMessage::StartGame { .. } => "start_game",
            OutboundMessage::PlayerRaised { .. } => "player_raised",
            OutboundMessage::PlayerCalled { .. } => "player_called",
            OutboundMessage::PlayerChecked { .. } => "player_checked",
            OutboundMessage::PlayerFolded { .. } => "player_folded",
            OutboundMessage::ChatMessage { .. } => "chat_message",
            OutboundMessage::RequestChips { .. } => "request_chips",
            OutboundMessage::DeclineInvitation { .. } => "decline_invitation",
            OutboundMessage::NewPage { .. } => "new_page",
            OutboundMessage::PlayerSearch { .. } => "player_search",
            OutboundMessage::GetNumPlayers {} => "get_num_players",
        }
    }

    /// Parameter object sent alongside the event name
    pub fn payload(&self) -> ClientResult<Value> {
        let mut envelope = serde_json::to_value(self).map_err(|e| ClientError::MalformedPayload {
            message: self.event().to_string(),
            reason: e.to_string(),
        })?;
        Ok(envelope
            .get_mut("payload")
            .map(Value::take)
            .unwrap_or_else(|| json!({})))
    }
}
