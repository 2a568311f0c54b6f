pub mod card;
pub mod constants;
pub mod error;
pub mod snapshot;

// Re-export commonly used items

// Card types
pub use card::{Card, Rank, Suit};

// Errors
pub use error::{ClientError, ClientResult};

// Snapshot types
pub use snapshot::{
    ChipMap, GamePhase, NormalizedSnapshot, Player, PlayerChips, PlayerHand, RaiseBounds,
    RawSnapshot, SeatEntry, SeatMap, Seating,
};
