//! Poker Table Client Library
//!
//! Presentation layer for a poker table page: normalizes server snapshots,
//! reconciles the rendered table against them and turns user input into
//! channel pushes.

pub mod bank_roll;
pub mod channel;
pub mod chat;
pub mod config;
pub mod controls;
pub mod dispatcher;
pub mod dom;
pub mod format;
pub mod game;
pub mod lobby;
pub mod raise_control;
pub mod registry;
pub mod replay;
pub mod session;
pub mod table;
pub mod toolbar;
pub mod views;

use channel::RecordingChannel;
use config::SessionConfig;
use dom::MemorySurface;
use session::GameSession;

/// Headless session type used by the replay binary and tests
pub type HeadlessSession = GameSession<MemorySurface, RecordingChannel>;

/// Creates a headless session for `config` without mounting it
pub fn create_session(config: SessionConfig) -> HeadlessSession {
    let channel = RecordingChannel::new(config.topic());
    GameSession::new(config, MemorySurface::new(), channel)
}

/// Test helper to create a mounted session for `user` in room "7"
pub fn create_test_session(user: &str) -> HeadlessSession {
    let mut session = create_session(SessionConfig::new(user, "7"));
    session
        .mount()
        .expect("Failed to mount headless session");
    session
}
