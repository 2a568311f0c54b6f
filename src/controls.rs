//! Action buttons for the local player
//!
//! Which of call/raise/check/fold is offered is a pure function of the
//! snapshot; the component only touches the surface when that answer
//! changes.

use crate::channel::OutboundMessage;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::{ClientResult, GamePhase, NormalizedSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    Call,
    Raise,
    Check,
    Fold,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Call, Control::Raise, Control::Check, Control::Fold];

    fn button_class(self) -> &'static str {
        match self {
            Control::Call => "call-btn",
            Control::Raise => "raise-control-btn",
            Control::Check => "check-btn",
            Control::Fold => "fold-btn",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Control::Call => "Call",
            Control::Raise => "Raise",
            Control::Check => "Check",
            Control::Fold => "Fold",
        }
    }
}

/// Button set offered to the local player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlState {
    #[default]
    Hidden,
    CallFold,
    RaiseCallFold,
    RaiseCheck,
    CheckOnly,
}

impl ControlState {
    pub fn derive(is_active: bool, paid: i64, to_call: i64, chips: i64) -> Self {
        if !is_active {
            return ControlState::Hidden;
        }
        match (paid < to_call, chips > to_call) {
            (true, true) => ControlState::RaiseCallFold,
            (true, false) => ControlState::CallFold,
            (false, true) => ControlState::RaiseCheck,
            (false, false) => ControlState::CheckOnly,
        }
    }

    /// `paid` is what the user committed this round, `chips` their stack
    pub fn from_snapshot(snapshot: &NormalizedSnapshot) -> Self {
        let user = snapshot.user.as_str();
        let chips = snapshot.player(user).map(|p| p.chips).unwrap_or(0);
        Self::derive(
            snapshot.is_user_active() && snapshot.state.is_betting(),
            snapshot.paid_in_round(user),
            snapshot.to_call,
            chips,
        )
    }

    pub fn shows(self, control: Control) -> bool {
        use Control::*;
        match self {
            ControlState::Hidden => false,
            ControlState::CallFold => matches!(control, Call | Fold),
            ControlState::RaiseCallFold => matches!(control, Raise | Call | Fold),
            ControlState::RaiseCheck => matches!(control, Raise | Check),
            ControlState::CheckOnly => matches!(control, Check),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ControlHandles {
    pub container: NodeId,
    pub call: NodeId,
    pub raise: NodeId,
    pub check: NodeId,
    pub fold: NodeId,
}

impl ControlHandles {
    /// Builds the four buttons, hidden, under `parent`
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let container = surface.create(ElementSpec::new("div").class("controls"));
        surface.append(parent, container)?;

        let make = |surface: &mut S, control: Control| -> ClientResult<NodeId> {
            let button = surface.create(
                ElementSpec::new("button")
                    .class(control.button_class())
                    .text(control.label()),
            );
            surface.append(container, button)?;
            surface.set_visible(button, false)?;
            Ok(button)
        };

        Ok(Self {
            call: make(&mut *surface, Control::Call)?,
            raise: make(&mut *surface, Control::Raise)?,
            check: make(&mut *surface, Control::Check)?,
            fold: make(&mut *surface, Control::Fold)?,
            container,
        })
    }

    pub fn button(&self, control: Control) -> NodeId {
        match control {
            Control::Call => self.call,
            Control::Raise => self.raise,
            Control::Check => self.check,
            Control::Fold => self.fold,
        }
    }
}

#[derive(Debug)]
pub struct Controls {
    handles: ControlHandles,
    player: String,
    state: ControlState,
    /// Phase in which the user last acted; the buttons stay hidden until
    /// the turn passes on or the phase changes
    acted_in: Option<GamePhase>,
}

impl Controls {
    pub fn new(handles: ControlHandles, player: impl Into<String>) -> Self {
        Self {
            handles,
            player: player.into(),
            state: ControlState::Hidden,
            acted_in: None,
        }
    }

    pub fn handles(&self) -> &ControlHandles {
        &self.handles
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        snapshot: &NormalizedSnapshot,
    ) -> ClientResult<()> {
        if let Some(phase) = self.acted_in {
            let still_ours = snapshot.active.as_deref() == Some(self.player.as_str());
            if !still_ours || snapshot.state != phase {
                self.acted_in = None;
            }
        }
        let next = match self.acted_in {
            Some(_) => ControlState::Hidden,
            None => ControlState::from_snapshot(snapshot),
        };
        self.render(surface, next)
    }

    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        next: ControlState,
    ) -> ClientResult<()> {
        if next == self.state {
            return Ok(());
        }
        tracing::debug!("Controls {:?} -> {:?}", self.state, next);
        for control in Control::ALL {
            let was = self.state.shows(control);
            let now = next.shows(control);
            if was != now {
                surface.set_visible(self.handles.button(control), now)?;
            }
        }
        self.state = next;
        Ok(())
    }

    /// Push for a pressed action button; `None` when that button is not offered.
    /// Raise only opens the raise panel and never pushes by itself.
    pub fn action(&mut self, control: Control) -> Option<OutboundMessage> {
        if !self.state.shows(control) {
            tracing::warn!("{:?} pressed while not offered", control);
            return None;
        }
        let player = self.player.clone();
        match control {
            Control::Call => Some(OutboundMessage::PlayerCalled { player }),
            Control::Check => Some(OutboundMessage::PlayerChecked { player }),
            Control::Fold => Some(OutboundMessage::PlayerFolded { player }),
            Control::Raise => None,
        }
    }

    /// Hides everything once the user has acted in `phase`
    pub fn hide<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        phase: GamePhase,
    ) -> ClientResult<()> {
        self.acted_in = Some(phase);
        self.render(surface, ControlState::Hidden)
    }
}
