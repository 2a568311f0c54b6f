use std::env;
use std::fmt;

use crate::game::constants::{DEFAULT_BANK_MAX, DEFAULT_JOIN_MAX};

/// How the room channel is joined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomKind {
    #[default]
    Public,
    Private,
    Lobby,
}

impl RoomKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoomKind::Public => "public",
            RoomKind::Private => "private",
            RoomKind::Lobby => "lobby",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(RoomKind::Public),
            "private" => Some(RoomKind::Private),
            "lobby" => Some(RoomKind::Lobby),
            _ => None,
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a session needs to know about who is playing where
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub user: String,
    pub room: String,
    pub kind: RoomKind,
    pub asset_base: String,
    pub join_max: i64,
    pub bank_max: i64,
}

impl SessionConfig {
    pub fn new(user: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            room: room.into(),
            kind: RoomKind::Public,
            asset_base: "../".to_string(),
            join_max: DEFAULT_JOIN_MAX,
            bank_max: DEFAULT_BANK_MAX,
        }
    }

    pub fn with_kind(mut self, kind: RoomKind) -> Self {
        self.kind = kind;
        self
    }

    /// Channel topic: the shared lobby, or one per room
    pub fn topic(&self) -> String {
        match self.kind {
            RoomKind::Lobby => "players:lobby".to_string(),
            RoomKind::Public | RoomKind::Private => format!("players:{}", self.room),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub session: SessionConfig,
    pub transcript_path: String,
    pub is_production: bool,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let is_production = env::var("POKER_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let user = env::var("POKER_USER").unwrap_or_else(|_| {
            if is_production {
                tracing::error!("POKER_USER must be set in production; playing as guest");
            } else {
                tracing::warn!("POKER_USER is not set; playing as guest");
            }
            "guest".to_string()
        });

        let kind = match env::var("POKER_ROOM_KIND") {
            Ok(value) => RoomKind::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown POKER_ROOM_KIND {:?}; using public", value);
                RoomKind::Public
            }),
            Err(_) => RoomKind::Public,
        };

        let session = SessionConfig {
            user,
            room: env::var("POKER_ROOM").unwrap_or_else(|_| "lobby".to_string()),
            kind,
            asset_base: env::var("POKER_ASSET_BASE").unwrap_or_else(|_| "../".to_string()),
            join_max: amount_var("POKER_JOIN_MAX", DEFAULT_JOIN_MAX),
            bank_max: amount_var("POKER_BANK_MAX", DEFAULT_BANK_MAX),
        };

        Self {
            session,
            transcript_path: env::var("POKER_TRANSCRIPT")
                .unwrap_or_else(|_| "transcript.jsonl".to_string()),
            is_production,
        }
    }
}

fn amount_var(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(value) => match value.trim().parse::<i64>() {
            Ok(amount) if amount > 0 => amount,
            _ => {
                tracing::warn!("{} must be a positive number; using {}", name, default);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_kind_parse() {
        assert_eq!(RoomKind::parse("Private"), Some(RoomKind::Private));
        assert_eq!(RoomKind::parse(" lobby "), Some(RoomKind::Lobby));
        assert_eq!(RoomKind::parse("secret"), None);
    }

    #[test]
    fn test_topic() {
        let config = SessionConfig::new("A", "7");
        assert_eq!(config.topic(), "players:7");
        assert_eq!(config.with_kind(RoomKind::Lobby).topic(), "players:lobby");
    }
}
