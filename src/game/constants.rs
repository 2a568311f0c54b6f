//! Table layout and input constants shared by the client components
//!
//! Centralizing these values makes it easier to:
//! - Keep seat slot numbering consistent between reconciler and markup
//! - Adjust bet stepping and join limits per deployment

/// Number of visual seat slots around the table (slots are 1-based)
pub const MAX_SEATS: usize = 6;

/// First visual seat slot
pub const FIRST_SEAT: usize = 1;

/// Amount added or removed by one press of the raise stepper buttons
pub const RAISE_STEP: i64 = 5;

/// Minimum chips a player may bring to the table when joining
pub const MIN_JOIN_AMOUNT: i64 = 100;

/// Default upper bound for the join amount when none is configured
pub const DEFAULT_JOIN_MAX: i64 = 10_000;

/// Default upper bound for a bank roll chip request
pub const DEFAULT_BANK_MAX: i64 = 1_000;

/// Number of page links shown at once by the pagination bar
pub const PAGE_WINDOW: usize = 5;

/// Toast timing (in milliseconds)
pub const SHORT_TOAST_MS: u64 = 2000;
pub const DEFAULT_TOAST_MS: u64 = 3000;
pub const LONG_TOAST_MS: u64 = 8000;

/// Deal animation classes, indexed by board position
pub const DEAL_ANIMATIONS: [&str; 5] = ["card-one", "card-two", "card-three", "card-four", "card-five"];

/// Community cards per street
pub const TURN_BOARD: usize = 4;
pub const RIVER_BOARD: usize = 5;
