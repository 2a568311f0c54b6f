//! Topic channel the table client talks to the server through
//!
//! The real transport lives in the host page. The client only needs to
//! join a topic, subscribe to event names, push outbound messages and
//! leave; [`RecordingChannel`] implements that in memory for replays and
//! tests.

pub mod messages;

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::game::{ClientError, ClientResult};
pub use messages::{InboundMessage, LeftBody, OutboundMessage, PageEntry, Participants, RoomId};

/// Handle returned by [`Channel::on`], needed to unsubscribe again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionRef(pub u64);

pub trait Channel {
    fn topic(&self) -> &str;

    fn join(&mut self, params: Value) -> ClientResult<()>;

    /// Subscribes to one event name
    fn on(&mut self, event: &str) -> SubscriptionRef;

    fn off(&mut self, subscription: SubscriptionRef);

    fn push(&mut self, message: &OutboundMessage) -> ClientResult<()>;

    fn leave(&mut self);
}

/// In-memory channel that records what the client did with it
#[derive(Debug, Default)]
pub struct RecordingChannel {
    topic: String,
    joined: bool,
    join_params: Option<Value>,
    next_ref: u64,
    subscriptions: BTreeMap<SubscriptionRef, String>,
    pushes: Vec<OutboundMessage>,
    rejecting: BTreeSet<String>,
    refusing_join: bool,
}

impl RecordingChannel {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn join_params(&self) -> Option<&Value> {
        self.join_params.as_ref()
    }

    pub fn pushes(&self) -> &[OutboundMessage] {
        &self.pushes
    }

    pub fn take_pushes(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.pushes)
    }

    /// Number of live subscriptions for `event`
    pub fn subscription_count(&self, event: &str) -> usize {
        self.subscriptions.values().filter(|e| *e == event).count()
    }

    pub fn live_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Makes every later push of `event` fail, the way a server error reply would
    pub fn reject(&mut self, event: &str) {
        self.rejecting.insert(event.to_string());
    }

    /// Makes joins fail until `accept_join` is called
    pub fn refuse_join(&mut self) {
        self.refusing_join = true;
    }

    pub fn accept_join(&mut self) {
        self.refusing_join = false;
    }
}

impl Channel for RecordingChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn join(&mut self, params: Value) -> ClientResult<()> {
        tracing::info!("Joining channel {}", self.topic);
        if self.refusing_join {
            return Err(ClientError::ChannelClosed);
        }
        self.joined = true;
        self.join_params = Some(params);
        Ok(())
    }

    fn on(&mut self, event: &str) -> SubscriptionRef {
        self.next_ref += 1;
        let subscription = SubscriptionRef(self.next_ref);
        self.subscriptions.insert(subscription, event.to_string());
        subscription
    }

    fn off(&mut self, subscription: SubscriptionRef) {
        self.subscriptions.remove(&subscription);
    }

    fn push(&mut self, message: &OutboundMessage) -> ClientResult<()> {
        if !self.joined {
            return Err(ClientError::ChannelClosed);
        }
        if self.rejecting.contains(message.event()) {
            return Err(ClientError::PushRejected {
                event: message.event().to_string(),
                reason: "error".to_string(),
            });
        }
        self.pushes.push(message.clone());
        Ok(())
    }

    fn leave(&mut self) {
        if self.joined {
            tracing::info!("Leaving channel {}", self.topic);
        }
        self.joined = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn start_game() -> OutboundMessage {
        OutboundMessage::StartGame {
            room: "lobby".to_string(),
        }
    }

    #[test]
    fn test_push_requires_join() {
        let mut channel = RecordingChannel::new("players:lobby");
        assert_eq!(channel.push(&start_game()), Err(ClientError::ChannelClosed));

        channel.join(json!({"type": "public"})).unwrap();
        channel.push(&start_game()).unwrap();
        assert_eq!(channel.pushes().len(), 1);

        channel.leave();
        assert_eq!(channel.push(&start_game()), Err(ClientError::ChannelClosed));
    }

    #[test]
    fn test_subscriptions_can_be_removed() {
        let mut channel = RecordingChannel::new("players:lobby");
        let a = channel.on("update");
        let _b = channel.on("update");
        assert_eq!(channel.subscription_count("update"), 2);
        channel.off(a);
        assert_eq!(channel.subscription_count("update"), 1);
    }

    #[test]
    fn test_rejected_push() {
        let mut channel = RecordingChannel::new("players:lobby");
        channel.join(Value::Null).unwrap();
        channel.reject("start_game");
        assert!(matches!(
            channel.push(&start_game()),
            Err(ClientError::PushRejected { .. })
        ));
        assert!(channel.pushes().is_empty());
    }
}
