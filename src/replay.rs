//! JSON-lines transcript replay
//!
//! Each non-blank line is `{"event": name, "payload": {...}}`. Lines starting
//! with `#` are comments. Bad lines and failed events are logged and skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::channel::Channel;
use crate::dom::Surface;
use crate::game::{ClientError, ClientResult};
use crate::session::GameSession;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptLine {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
}

/// `number` is 1-based and only used for error reporting
pub fn parse_line(number: usize, line: &str) -> ClientResult<Option<TranscriptLine>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ClientError::Transcript {
            line: number,
            reason: e.to_string(),
        })
}

pub fn replay<S: Surface, C: Channel>(
    session: &mut GameSession<S, C>,
    transcript: &str,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (index, line) in transcript.lines().enumerate() {
        let number = index + 1;
        let entry = match parse_line(number, line) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("{}", e);
                summary.skipped += 1;
                continue;
            }
        };
        match session.handle_event(&entry.event, entry.payload) {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                tracing::warn!("Line {}: {}", number, e);
                summary.skipped += 1;
            }
        }
    }
    tracing::info!(
        "Replayed {} events ({} skipped)",
        summary.applied,
        summary.skipped
    );
    summary
}
