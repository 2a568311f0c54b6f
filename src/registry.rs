//! Disposable handler registry
//!
//! Every channel subscription and UI listener a view installs is recorded
//! here so that unmounting can remove all of them in one call. Each
//! (element, event kind) pair holds at most one action, so rebinding never
//! stacks handlers.

use std::collections::BTreeMap;

use crate::channel::{Channel, RoomId, SubscriptionRef};
use crate::dom::NodeId;

/// What a bound UI event does once it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Call,
    Check,
    Fold,
    OpenRaise,
    RaiseSlider,
    RaiseInput,
    RaiseIncrease,
    RaiseDecrease,
    RaiseSubmit,
    OpenJoin,
    JoinAmount,
    JoinSubmit,
    Start,
    Leave,
    ChatInput,
    ChatSubmit,
    BankInput,
    BankSubmit,
    DeclineInvitation(RoomId),
    PageBack,
    PageAhead,
    /// Index into the visible page links
    PageLink(usize),
    SearchInput,
    SearchSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UiEventKind {
    Click,
    Input,
    Change,
    Enter,
}

/// A user interaction delivered by the host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Click,
    Input(String),
    Change(String),
    Enter,
}

impl UiEvent {
    pub fn kind(&self) -> UiEventKind {
        match self {
            UiEvent::Click => UiEventKind::Click,
            UiEvent::Input(_) => UiEventKind::Input,
            UiEvent::Change(_) => UiEventKind::Change,
            UiEvent::Enter => UiEventKind::Enter,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            UiEvent::Input(v) | UiEvent::Change(v) => Some(v),
            UiEvent::Click | UiEvent::Enter => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct HandlerRegistry {
    subscriptions: BTreeMap<String, SubscriptionRef>,
    listeners: BTreeMap<(NodeId, UiEventKind), UiAction>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `event` once; a second call for the same name is a no-op
    pub fn subscribe<C: Channel + ?Sized>(&mut self, channel: &mut C, event: &str) {
        if self.subscriptions.contains_key(event) {
            return;
        }
        let subscription = channel.on(event);
        self.subscriptions.insert(event.to_string(), subscription);
    }

    pub fn is_subscribed(&self, event: &str) -> bool {
        self.subscriptions.contains_key(event)
    }

    pub fn bind(&mut self, node: NodeId, kind: UiEventKind, action: UiAction) {
        self.listeners.insert((node, kind), action);
    }

    /// Drops every listener attached to `node`, used when the element goes away
    pub fn unbind_node(&mut self, node: NodeId) {
        self.listeners.retain(|(n, _), _| *n != node);
    }

    pub fn action_for(&self, node: NodeId, kind: UiEventKind) -> Option<&UiAction> {
        self.listeners.get(&(node, kind))
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty() && self.listeners.is_empty()
    }

    /// Unsubscribes everything from `channel` and forgets all UI listeners
    pub fn release_all<C: Channel + ?Sized>(&mut self, channel: &mut C) {
        let released = self.subscriptions.len() + self.listeners.len();
        for (_, subscription) in std::mem::take(&mut self.subscriptions) {
            channel.off(subscription);
        }
        self.listeners.clear();
        tracing::debug!("Released {} handlers", released);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::dom::{ElementSpec, MemorySurface, Surface};

    #[test]
    fn test_subscribe_is_idempotent() {
        let mut channel = RecordingChannel::new("players:lobby");
        let mut registry = HandlerRegistry::new();
        registry.subscribe(&mut channel, "update");
        registry.subscribe(&mut channel, "update");
        assert_eq!(channel.subscription_count("update"), 1);
        assert!(registry.is_subscribed("update"));
    }

    #[test]
    fn test_rebinding_replaces_action() {
        let mut surface = MemorySurface::new();
        let button = surface.create(ElementSpec::new("button"));
        let mut registry = HandlerRegistry::new();
        registry.bind(button, UiEventKind::Click, UiAction::Call);
        registry.bind(button, UiEventKind::Click, UiAction::Fold);
        assert_eq!(registry.listener_count(), 1);
        assert_eq!(
            registry.action_for(button, UiEventKind::Click),
            Some(&UiAction::Fold)
        );
    }

    #[test]
    fn test_release_all() {
        let mut surface = MemorySurface::new();
        let button = surface.create(ElementSpec::new("button"));
        let mut channel = RecordingChannel::new("players:lobby");
        let mut registry = HandlerRegistry::new();
        registry.subscribe(&mut channel, "update");
        registry.subscribe(&mut channel, "pot_update");
        registry.bind(button, UiEventKind::Click, UiAction::Start);

        registry.release_all(&mut channel);
        assert!(registry.is_empty());
        assert_eq!(channel.live_subscriptions(), 0);
        assert_eq!(registry.action_for(button, UiEventKind::Click), None);
    }

    #[test]
    fn test_unbind_node() {
        let mut surface = MemorySurface::new();
        let row = surface.create(ElementSpec::new("button"));
        let other = surface.create(ElementSpec::new("button"));
        let mut registry = HandlerRegistry::new();
        registry.bind(row, UiEventKind::Click, UiAction::DeclineInvitation(RoomId("5".into())));
        registry.bind(other, UiEventKind::Click, UiAction::Start);
        registry.unbind_node(row);
        assert_eq!(registry.listener_count(), 1);
    }
}
