//! Join / start / leave toolbar

use crate::channel::OutboundMessage;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::constants::{DEFAULT_TOAST_MS, LONG_TOAST_MS, MIN_JOIN_AMOUNT};
use crate::game::{ClientError, ClientResult, GamePhase};

/// Which buttons the toolbar offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarLayout {
    Join,
    StartLeave,
    Leave,
}

impl ToolbarLayout {
    pub fn derive(seated: bool, phase: GamePhase) -> Self {
        match (seated, phase.is_open()) {
            (false, _) => ToolbarLayout::Join,
            (true, true) => ToolbarLayout::StartLeave,
            (true, false) => ToolbarLayout::Leave,
        }
    }

    fn shows_join(self) -> bool {
        self == ToolbarLayout::Join
    }

    fn shows_start(self) -> bool {
        self == ToolbarLayout::StartLeave
    }

    fn shows_leave(self) -> bool {
        self != ToolbarLayout::Join
    }
}

pub fn join_error_message(max: i64) -> String {
    format!(
        "You must enter a number that is at least {} and no more than {}",
        MIN_JOIN_AMOUNT, max
    )
}

/// Validates a join amount against `[MIN_JOIN_AMOUNT, max]`
pub fn validate_join_amount(input: &str, max: i64) -> ClientResult<i64> {
    let amount = input
        .trim()
        .parse::<i64>()
        .map_err(|_| ClientError::InvalidAmount {
            input: input.to_string(),
            reason: "not a whole number".to_string(),
        })?;
    if !(MIN_JOIN_AMOUNT..=max).contains(&amount) {
        return Err(ClientError::InvalidAmount {
            input: input.to_string(),
            reason: join_error_message(max),
        });
    }
    Ok(amount)
}

#[derive(Debug, Clone, Copy)]
pub struct ToolbarHandles {
    pub join: NodeId,
    pub start: NodeId,
    pub leave: NodeId,
    pub join_panel: NodeId,
    pub join_input: NodeId,
    pub join_submit: NodeId,
    pub join_error: NodeId,
}

impl ToolbarHandles {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let bar = surface.create(ElementSpec::new("div").class("player-toolbar"));
        surface.append(parent, bar)?;

        let join = surface.create(ElementSpec::new("a").attr("id", "join-btn").text("JOIN"));
        let start = surface.create(ElementSpec::new("a").attr("id", "start-btn").text("START"));
        let leave = surface.create(ElementSpec::new("a").attr("id", "quit-btn").text("QUIT"));
        for button in [join, start, leave] {
            surface.append(bar, button)?;
            surface.set_visible(button, false)?;
        }

        let join_panel = surface.create(ElementSpec::new("div").attr("id", "join-modal"));
        surface.append(parent, join_panel)?;
        surface.set_visible(join_panel, false)?;
        let join_input = surface.create(ElementSpec::new("input").attr("id", "join-amount-input"));
        let join_submit = surface.create(ElementSpec::new("a").attr("id", "join-submit").text("Join"));
        let join_error = surface.create(ElementSpec::new("p").class("red-text"));
        for node in [join_input, join_submit, join_error] {
            surface.append(join_panel, node)?;
        }
        surface.set_visible(join_error, false)?;

        Ok(Self {
            join,
            start,
            leave,
            join_panel,
            join_input,
            join_submit,
            join_error,
        })
    }
}

#[derive(Debug)]
pub struct PlayerToolbar {
    handles: ToolbarHandles,
    player: String,
    room: String,
    join_max: i64,
    layout: Option<ToolbarLayout>,
    join_draft: String,
    error_shown: bool,
}

impl PlayerToolbar {
    pub fn new(
        handles: ToolbarHandles,
        player: impl Into<String>,
        room: impl Into<String>,
        join_max: i64,
    ) -> Self {
        Self {
            handles,
            player: player.into(),
            room: room.into(),
            join_max,
            layout: None,
            join_draft: String::new(),
            error_shown: false,
        }
    }

    pub fn handles(&self) -> &ToolbarHandles {
        &self.handles
    }

    pub fn layout(&self) -> Option<ToolbarLayout> {
        self.layout
    }

    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        seated: bool,
        phase: GamePhase,
    ) -> ClientResult<()> {
        self.render(surface, ToolbarLayout::derive(seated, phase))
    }

    fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        next: ToolbarLayout,
    ) -> ClientResult<()> {
        let prev = self.layout;
        if prev == Some(next) {
            return Ok(());
        }
        let was = |f: fn(ToolbarLayout) -> bool| prev.map(f).unwrap_or(false);
        if was(ToolbarLayout::shows_join) != next.shows_join() {
            surface.set_visible(self.handles.join, next.shows_join())?;
        }
        if was(ToolbarLayout::shows_start) != next.shows_start() {
            surface.set_visible(self.handles.start, next.shows_start())?;
        }
        if was(ToolbarLayout::shows_leave) != next.shows_leave() {
            surface.set_visible(self.handles.leave, next.shows_leave())?;
        }

        if prev.is_none() {
            match next {
                ToolbarLayout::Join => surface.toast(
                    "Click JOIN to take a seat at the table",
                    LONG_TOAST_MS,
                    "join-info",
                ),
                ToolbarLayout::StartLeave => surface.toast(
                    "Click START once everyone has joined",
                    DEFAULT_TOAST_MS,
                    "start-info",
                ),
                ToolbarLayout::Leave => {}
            }
        }
        self.layout = Some(next);
        Ok(())
    }

    pub fn open_join<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        surface.set_visible(self.handles.join_panel, true)
    }

    pub fn set_join_amount(&mut self, text: &str) {
        self.join_draft = text.to_string();
    }

    /// Validates the drafted amount; on failure the inline error is shown and
    /// nothing is pushed
    pub fn submit_join<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        match validate_join_amount(&self.join_draft, self.join_max) {
            Ok(amount) => {
                self.join_draft.clear();
                surface.set_attr(self.handles.join_input, "value", "")?;
                surface.set_visible(self.handles.join_panel, false)?;
                if self.error_shown {
                    surface.set_visible(self.handles.join_error, false)?;
                    self.error_shown = false;
                }
                Ok(Some(OutboundMessage::AddPlayer {
                    player: self.player.clone(),
                    room: self.room.clone(),
                    amount,
                }))
            }
            Err(e) => {
                tracing::debug!("Join rejected: {}", e);
                surface.set_text(self.handles.join_error, &join_error_message(self.join_max))?;
                if !self.error_shown {
                    surface.set_visible(self.handles.join_error, true)?;
                    self.error_shown = true;
                }
                Ok(None)
            }
        }
    }

    pub fn start(&self) -> OutboundMessage {
        OutboundMessage::StartGame {
            room: self.room.clone(),
        }
    }

    /// Leaving returns the toolbar to JOIN without waiting for the server.
    /// `None` when QUIT is not on offer.
    pub fn leave<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        if !self.layout.is_some_and(ToolbarLayout::shows_leave) {
            tracing::warn!("QUIT pressed while not seated");
            return Ok(None);
        }
        self.render(surface, ToolbarLayout::Join)?;
        Ok(Some(OutboundMessage::RemovePlayer {
            player: self.player.clone(),
            room: self.room.clone(),
        }))
    }
}
