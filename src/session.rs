//! Game session: one mounted table page
//!
//! The session owns the surface, the channel and every component. Full
//! snapshots replace the held [`NormalizedSnapshot`]; deltas edit it in
//! place. Either way the derived fields are recomputed and the same render
//! pass reconciles each component against what it last drew.

use serde_json::{json, Value};

use crate::bank_roll::{BankRoll, BankRollHandles};
use crate::channel::{Channel, InboundMessage, OutboundMessage, PageEntry, Participants, RoomId};
use crate::chat::{Chat, ChatHandles};
use crate::config::{RoomKind, SessionConfig};
use crate::controls::{Control, ControlHandles, Controls};
use crate::dispatcher;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::format::{extract_players, extract_raise_data, DataFormatter};
use crate::game::constants::{DEFAULT_TOAST_MS, SHORT_TOAST_MS};
use crate::game::{Card, ClientError, ClientResult, GamePhase, NormalizedSnapshot, RawSnapshot};
use crate::lobby::{
    InvitationHandles, Invitations, Pagination, PaginationHandles, PlayerSearch, RoomMonitor,
};
use crate::raise_control::{RaiseControl, RaiseHandles};
use crate::registry::{HandlerRegistry, UiAction, UiEvent, UiEventKind};
use crate::table::{TableHandles, TableView};
use crate::toolbar::{PlayerToolbar, ToolbarHandles};

/// Every component of a mounted page
#[derive(Debug)]
pub struct Components {
    pub container: NodeId,
    pub table: TableView,
    pub controls: Controls,
    pub raise: RaiseControl,
    pub toolbar: PlayerToolbar,
    pub chat: Chat,
    pub bank: BankRoll,
    pub invitations: Invitations,
    pub pagination: Pagination,
    pub search: PlayerSearch,
    pub rooms: RoomMonitor,
}

impl Components {
    fn build<S: Surface + ?Sized>(surface: &mut S, config: &SessionConfig) -> ClientResult<Self> {
        let root = surface.root();
        let container = surface.create(ElementSpec::new("main").class("game-session"));
        surface.append(root, container)?;

        let table = TableHandles::build(surface, container)?;
        let controls = ControlHandles::build(surface, container)?;
        let raise = RaiseHandles::build(surface, container, controls.raise)?;
        let toolbar = ToolbarHandles::build(surface, container)?;
        let chat = ChatHandles::build(surface, container)?;
        let bank = BankRollHandles::build(surface, container, config.bank_max)?;
        let invitations = InvitationHandles::build(surface, container)?;
        let pagination = PaginationHandles::build(surface, container)?;
        let search = PlayerSearch::build(surface, container)?;
        let rooms = RoomMonitor::build(surface, container)?;

        let user = config.user.as_str();
        Ok(Self {
            container,
            table: TableView::new(table, config.asset_base.as_str()),
            controls: Controls::new(controls, user),
            raise: RaiseControl::new(raise, user),
            toolbar: PlayerToolbar::new(toolbar, user, config.room.as_str(), config.join_max),
            chat: Chat::new(chat, user),
            bank: BankRoll::new(bank, user, config.bank_max),
            invitations: Invitations::new(invitations),
            pagination: Pagination::new(pagination),
            search,
            rooms,
        })
    }

    /// Push for an action button. Acting takes the controls and the raise
    /// panel away until the turn moves on.
    fn act<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        control: Control,
        phase: GamePhase,
    ) -> ClientResult<Option<OutboundMessage>> {
        let push = match control {
            Control::Raise => self.raise.submit(surface)?,
            _ => self.controls.action(control),
        };
        if push.is_some() {
            self.controls.hide(surface, phase)?;
            self.raise.close(surface)?;
        }
        Ok(push)
    }

    /// One persistent listener per element
    fn bind(&self, registry: &mut HandlerRegistry) {
        use UiAction::*;
        use UiEventKind::*;

        let controls = self.controls.handles();
        registry.bind(controls.call, Click, Call);
        registry.bind(controls.check, Click, Check);
        registry.bind(controls.fold, Click, Fold);
        registry.bind(controls.raise, Click, OpenRaise);

        let raise = self.raise.handles();
        registry.bind(raise.slider, Input, RaiseSlider);
        registry.bind(raise.slider, Change, RaiseSlider);
        registry.bind(raise.input, Input, RaiseInput);
        registry.bind(raise.increase, Click, RaiseIncrease);
        registry.bind(raise.decrease, Click, RaiseDecrease);
        registry.bind(raise.submit, Click, RaiseSubmit);

        let toolbar = self.toolbar.handles();
        registry.bind(toolbar.join, Click, OpenJoin);
        registry.bind(toolbar.join_input, Input, JoinAmount);
        registry.bind(toolbar.join_input, Enter, JoinSubmit);
        registry.bind(toolbar.join_submit, Click, JoinSubmit);
        registry.bind(toolbar.start, Click, Start);
        registry.bind(toolbar.leave, Click, Leave);

        let chat = self.chat.handles();
        registry.bind(chat.input, Input, ChatInput);
        registry.bind(chat.input, Enter, ChatSubmit);
        registry.bind(chat.submit, Click, ChatSubmit);

        let bank = self.bank.handles();
        registry.bind(bank.input, Input, BankInput);
        registry.bind(bank.submit, Click, BankSubmit);

        let pages = self.pagination.handles();
        registry.bind(pages.back, Click, PageBack);
        registry.bind(pages.ahead, Click, PageAhead);
        for (slot, link) in pages.links.iter().enumerate() {
            registry.bind(*link, Click, PageLink(slot));
        }

        registry.bind(self.search.input(), Input, SearchInput);
        registry.bind(self.search.input(), Enter, SearchSubmit);
        registry.bind(self.search.submit_button(), Click, SearchSubmit);
    }
}

pub struct GameSession<S: Surface, C: Channel> {
    config: SessionConfig,
    formatter: DataFormatter,
    surface: S,
    channel: C,
    registry: HandlerRegistry,
    components: Option<Components>,
    snapshot: NormalizedSnapshot,
}

impl<S: Surface, C: Channel> GameSession<S, C> {
    pub fn new(config: SessionConfig, surface: S, channel: C) -> Self {
        let formatter = DataFormatter::new(config.user.as_str());
        let snapshot = NormalizedSnapshot::empty(&config.user);
        Self {
            config,
            formatter,
            surface,
            channel,
            registry: HandlerRegistry::new(),
            components: None,
            snapshot,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn components(&self) -> Option<&Components> {
        self.components.as_ref()
    }

    pub fn snapshot(&self) -> &NormalizedSnapshot {
        &self.snapshot
    }

    pub fn is_mounted(&self) -> bool {
        self.components.is_some()
    }

    /// Builds the page, joins the channel and installs every handler.
    /// Mounting twice is a no-op.
    pub fn mount(&mut self) -> ClientResult<()> {
        if self.is_mounted() {
            tracing::debug!("Session for {} already mounted", self.channel.topic());
            return Ok(());
        }

        let components = Components::build(&mut self.surface, &self.config)?;
        if let Err(e) = self
            .channel
            .join(json!({ "type": self.config.kind.as_str() }))
        {
            if let Err(cleanup) = self.surface.remove(components.container) {
                tracing::warn!("Failed to remove session container: {}", cleanup);
            }
            return Err(e);
        }
        for name in InboundMessage::NAMES {
            self.registry.subscribe(&mut self.channel, name);
        }
        components.bind(&mut self.registry);
        self.components = Some(components);
        self.snapshot = NormalizedSnapshot::empty(&self.config.user);

        tracing::info!(
            "Mounted {} session for {} on {}",
            self.config.kind,
            self.config.user,
            self.channel.topic()
        );

        if self.config.kind == RoomKind::Lobby {
            self.push(OutboundMessage::GetNumPlayers {});
        }
        self.render()
    }

    /// Releases every handler, leaves the channel and removes the page
    pub fn unmount(&mut self) {
        let Some(components) = self.components.take() else {
            return;
        };
        self.registry.release_all(&mut self.channel);
        self.channel.leave();
        if let Err(e) = self.surface.remove(components.container) {
            tracing::warn!("Failed to remove session container: {}", e);
        }
        self.snapshot = NormalizedSnapshot::empty(&self.config.user);
        tracing::info!("Unmounted session for {}", self.config.user);
    }

    /// Entry point for channel events. Unknown names are logged and ignored;
    /// events arriving while unmounted are dropped.
    pub fn handle_event(&mut self, name: &str, payload: Value) -> ClientResult<()> {
        if !self.registry.is_subscribed(name) {
            if self.is_mounted() {
                tracing::warn!("Ignoring unknown message {}", name);
            } else {
                tracing::debug!("Dropping {} while unmounted", name);
            }
            return Ok(());
        }
        dispatcher::dispatch_raw(self, name, payload)
    }

    /// Entry point for user interaction on an element of the page
    pub fn handle_ui(&mut self, node: NodeId, event: UiEvent) -> ClientResult<()> {
        if !self.is_mounted() {
            return Err(ClientError::NotMounted);
        }
        let Some(action) = self.registry.action_for(node, event.kind()).cloned() else {
            tracing::debug!("No listener for {:?} on {:?}", event.kind(), node);
            return Ok(());
        };
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        let surface = &mut self.surface;
        let phase = self.snapshot.state;
        let leaving = action == UiAction::Leave;
        let value = event.value().unwrap_or("");

        let push = match action {
            UiAction::Call => c.act(surface, Control::Call, phase)?,
            UiAction::Check => c.act(surface, Control::Check, phase)?,
            UiAction::Fold => c.act(surface, Control::Fold, phase)?,
            UiAction::OpenRaise => {
                if c.controls.state().shows(Control::Raise) {
                    c.raise.open_panel(surface)?;
                }
                None
            }
            UiAction::RaiseSlider => {
                c.raise.set_from_slider(surface, value)?;
                None
            }
            UiAction::RaiseInput => {
                c.raise.set_from_input(surface, value)?;
                None
            }
            UiAction::RaiseIncrease => {
                c.raise.step(surface, true)?;
                None
            }
            UiAction::RaiseDecrease => {
                c.raise.step(surface, false)?;
                None
            }
            UiAction::RaiseSubmit => c.act(surface, Control::Raise, phase)?,
            UiAction::OpenJoin => {
                c.toolbar.open_join(surface)?;
                None
            }
            UiAction::JoinAmount => {
                c.toolbar.set_join_amount(value);
                None
            }
            UiAction::JoinSubmit => c.toolbar.submit_join(surface)?,
            UiAction::Start => Some(c.toolbar.start()),
            UiAction::Leave => c.toolbar.leave(surface)?,
            UiAction::ChatInput => {
                c.chat.set_draft(value);
                None
            }
            UiAction::ChatSubmit => c.chat.submit(surface)?,
            UiAction::BankInput => {
                c.bank.set_input(surface, value)?;
                None
            }
            UiAction::BankSubmit => c.bank.submit(surface)?,
            UiAction::DeclineInvitation(room) => Some(c.invitations.decline(&room)),
            UiAction::PageBack => c.pagination.back(),
            UiAction::PageAhead => c.pagination.ahead(),
            UiAction::PageLink(slot) => c.pagination.link(slot),
            UiAction::SearchInput => {
                c.search.set_draft(value);
                None
            }
            UiAction::SearchSubmit => c.search.submit(surface)?,
        };

        let Some(message) = push else {
            return Ok(());
        };
        self.push(message);
        if leaving {
            // Stand up locally so later deltas do not seat the user again
            let user = self.config.user.clone();
            self.apply_delta(|s| {
                s.seating.remove(&user);
            })?;
        }
        Ok(())
    }

    /// Pushes to the channel. Failures are logged; chip requests and declines
    /// also tell the user.
    pub fn push(&mut self, message: OutboundMessage) {
        tracing::debug!("Pushing {}", message.event());
        let Err(e) = self.channel.push(&message) else {
            return;
        };
        tracing::warn!("Push of {} failed: {}", message.event(), e);
        match &message {
            OutboundMessage::RequestChips { .. } => {
                self.surface
                    .toast("Bank update failed", DEFAULT_TOAST_MS, "error");
            }
            OutboundMessage::DeclineInvitation { room } => {
                if let Some(c) = self.components.as_ref() {
                    c.invitations.decline_failed(&mut self.surface, room);
                }
            }
            _ => {}
        }
    }

    // ===== Snapshot handling =====

    /// A game (re)starts: replace the snapshot wholesale
    pub(crate) fn setup(&mut self, raw: RawSnapshot) -> ClientResult<()> {
        tracing::info!("Setting up table for {}", self.config.user);
        self.replace_snapshot(raw)
    }

    pub(crate) fn update(&mut self, raw: RawSnapshot) -> ClientResult<()> {
        self.replace_snapshot(raw)
    }

    fn replace_snapshot(&mut self, raw: RawSnapshot) -> ClientResult<()> {
        self.snapshot = self.formatter.format(raw);
        self.render()
    }

    /// Applies a partial update and re-derives players and raise bounds
    pub(crate) fn apply_delta(
        &mut self,
        edit: impl FnOnce(&mut NormalizedSnapshot),
    ) -> ClientResult<()> {
        edit(&mut self.snapshot);
        self.snapshot.players = extract_players(&self.snapshot.chip_roll);
        self.snapshot.raise = extract_raise_data(&self.snapshot);
        self.render()
    }

    /// Dealt cards either extend the board or restate it from the start
    pub(crate) fn deal(&mut self, cards: Vec<Card>) -> ClientResult<()> {
        self.apply_delta(|s| {
            if cards.len() >= s.table.len() && cards[..s.table.len()] == s.table[..] {
                s.table = cards;
            } else {
                s.table.extend(cards);
            }
            s.state = GamePhase::for_board(s.table.len());
        })
    }

    pub(crate) fn finish(&mut self, message: Option<String>) -> ClientResult<()> {
        self.apply_delta(|s| {
            s.state = GamePhase::BetweenRounds;
            s.table.clear();
            s.pot = 0;
            s.to_call = 0;
            s.round.clear();
            s.active = None;
            s.player_hand = None;
        })?;
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.surface.toast(&message, DEFAULT_TOAST_MS, "game-finished");
        }
        Ok(())
    }

    pub(crate) fn player_left(&mut self, name: &str) -> ClientResult<()> {
        self.surface
            .toast(&format!("{} left", name), SHORT_TOAST_MS, "player-left");
        self.apply_delta(|s| {
            s.seating.remove(name);
        })
    }

    fn render(&mut self) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        let snapshot = &self.snapshot;
        let surface = &mut self.surface;
        c.table.update(surface, snapshot)?;
        c.controls.update(surface, snapshot)?;
        c.raise.update(surface, &snapshot.raise)?;
        c.toolbar
            .update(surface, snapshot.is_seated(&snapshot.user), snapshot.state)?;
        Ok(())
    }

    // ===== Messages outside the snapshot =====

    pub(crate) fn show_winner(&mut self, message: &str) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        c.table.show_winner(&mut self.surface, message)
    }

    pub(crate) fn receive_chat(&mut self, name: &str, text: &str) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        c.chat.receive(&mut self.surface, name, text)
    }

    pub(crate) fn receive_invitation(
        &mut self,
        title: &str,
        id: &RoomId,
        participants: &Participants,
        owner: &str,
    ) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        if let Some(decline) =
            c.invitations
                .receive(&mut self.surface, title, id, participants, owner)?
        {
            self.registry.bind(
                decline,
                UiEventKind::Click,
                UiAction::DeclineInvitation(id.clone()),
            );
        }
        Ok(())
    }

    pub(crate) fn remove_invitation(&mut self, remove: &str, toast: &str) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        if let Some(decline) = c.invitations.remove(&mut self.surface, remove, toast)? {
            self.registry.unbind_node(decline);
        }
        Ok(())
    }

    pub(crate) fn decline_failed(&mut self, room: &RoomId) {
        if let Some(c) = self.components.as_ref() {
            c.invitations.decline_failed(&mut self.surface, room);
        }
    }

    pub(crate) fn update_pages(
        &mut self,
        current: u32,
        total: u32,
        entries: &[PageEntry],
    ) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        c.pagination.update(&mut self.surface, current, total, entries)
    }

    pub(crate) fn update_occupancy(&mut self, room: &str, number: Option<i64>) -> ClientResult<()> {
        let Some(c) = self.components.as_mut() else {
            return Ok(());
        };
        c.rooms.update(&mut self.surface, room, number)
    }
}
