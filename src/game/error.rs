//! Client-side error types
//!
//! Nearly every failure in the presentation layer is logged and swallowed,
//! but the paths that produce them still return typed errors so callers can
//! decide whether a toast is warranted.

use std::fmt;

/// Errors that can occur while routing events or rendering state
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    // Message errors
    UnknownMessage { name: String },
    MalformedPayload { message: String, reason: String },

    // Lifecycle errors
    NotMounted,
    ChannelClosed,
    PushRejected { event: String, reason: String },

    // Rendering errors
    SeatOutOfRange { player: String, seat: usize },
    UnknownNode,

    // Input errors
    InvalidAmount { input: String, reason: String },

    // Replay
    Transcript { line: usize, reason: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::UnknownMessage { name } => write!(f, "Unknown message: {}", name),
            ClientError::MalformedPayload { message, reason } => {
                write!(f, "Malformed payload for {}: {}", message, reason)
            }

            ClientError::NotMounted => write!(f, "View is not mounted"),
            ClientError::ChannelClosed => write!(f, "Channel is closed"),
            ClientError::PushRejected { event, reason } => {
                write!(f, "Push {} rejected: {}", event, reason)
            }

            ClientError::SeatOutOfRange { player, seat } => {
                write!(f, "Seat {} for {} is outside the table", seat, player)
            }
            ClientError::UnknownNode => write!(f, "Unknown element handle"),

            ClientError::InvalidAmount { input, reason } => {
                write!(f, "Invalid amount '{}': {}", input, reason)
            }

            ClientError::Transcript { line, reason } => {
                write!(f, "Transcript line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::SeatOutOfRange {
            player: "A".to_string(),
            seat: 9,
        };
        assert_eq!(err.to_string(), "Seat 9 for A is outside the table");

        let err = ClientError::UnknownMessage {
            name: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown message: bogus");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(ClientError::NotMounted, ClientError::NotMounted);
        assert_ne!(ClientError::NotMounted, ClientError::ChannelClosed);
    }
}
