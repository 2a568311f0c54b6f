//! Bounded raise amount input
//!
//! Slider, stepper and manual entry all funnel through [`keep_in_range`],
//! so the held value never leaves `[min, max]`. Manual entry that is not a
//! plain positive integer disables submission instead of being coerced.

use crate::channel::OutboundMessage;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::constants::RAISE_STEP;
use crate::game::{ClientError, ClientResult, RaiseBounds};

/// Clamps `value` into `[min, max]`; an inverted range yields `max`
pub fn keep_in_range(value: i64, min: i64, max: i64) -> i64 {
    if min > max {
        return max;
    }
    value.clamp(min, max)
}

/// Half the stack rounded up to the stepper granularity, then clamped
pub fn default_raise_value(min: i64, max: i64, step: i64) -> i64 {
    let half = (max + 1) / 2;
    let stepped = if step > 0 {
        half + (step - half.rem_euclid(step)) % step
    } else {
        half
    };
    keep_in_range(stepped, min, max)
}

/// Parses a manually typed amount: digits only, no leading zero
pub fn parse_amount(input: &str) -> ClientResult<i64> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ClientError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a whole number"));
    }
    if trimmed.starts_with('0') {
        return Err(invalid("leading zero"));
    }
    trimmed.parse::<i64>().map_err(|_| invalid("too large"))
}

#[derive(Debug, Clone, Copy)]
pub struct RaiseHandles {
    pub panel: NodeId,
    /// The raise button owned by the controls bar
    pub open_button: NodeId,
    pub slider: NodeId,
    pub display: NodeId,
    pub input: NodeId,
    pub increase: NodeId,
    pub decrease: NodeId,
    pub submit: NodeId,
}

impl RaiseHandles {
    pub fn build<S: Surface + ?Sized>(
        surface: &mut S,
        parent: NodeId,
        open_button: NodeId,
    ) -> ClientResult<Self> {
        let panel = surface.create(ElementSpec::new("div").class("raise-panel"));
        surface.append(parent, panel)?;
        surface.set_visible(panel, false)?;

        let slider = surface.create(
            ElementSpec::new("input")
                .attr("id", "raise-amount-slider")
                .attr("type", "range"),
        );
        let display = surface.create(ElementSpec::new("span").attr("id", "raise-value"));
        let input = surface.create(ElementSpec::new("input").attr("id", "raise-amount"));
        let decrease = surface.create(ElementSpec::new("button").class("decrease-raise").text("-"));
        let increase = surface.create(ElementSpec::new("button").class("increase-raise").text("+"));
        let submit = surface.create(
            ElementSpec::new("button")
                .class("raise-submit")
                .class("disabled")
                .text("Raise"),
        );
        for node in [slider, display, input, decrease, increase, submit] {
            surface.append(panel, node)?;
        }
        surface.set_class(open_button, "disabled", true)?;

        Ok(Self {
            panel,
            open_button,
            slider,
            display,
            input,
            increase,
            decrease,
            submit,
        })
    }
}

#[derive(Debug)]
pub struct RaiseControl {
    handles: RaiseHandles,
    player: String,
    step: i64,
    bounds: Option<(i64, i64)>,
    value: i64,
    input_valid: bool,
    // What the surface currently shows
    shown_value: Option<i64>,
    shown_enabled: bool,
    shown_submittable: bool,
    open: bool,
}

impl RaiseControl {
    pub fn new(handles: RaiseHandles, player: impl Into<String>) -> Self {
        Self {
            handles,
            player: player.into(),
            step: RAISE_STEP,
            bounds: None,
            value: 0,
            input_valid: true,
            shown_value: None,
            shown_enabled: false,
            shown_submittable: false,
            open: false,
        }
    }

    pub fn handles(&self) -> &RaiseHandles {
        &self.handles
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.bounds
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn can_submit(&self) -> bool {
        self.bounds.is_some() && self.input_valid
    }

    /// Applies fresh bounds. The held value is only reset when the bounds move.
    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        bounds: &RaiseBounds,
    ) -> ClientResult<()> {
        let next = bounds.range();
        if next == self.bounds {
            return Ok(());
        }
        self.bounds = next;
        self.input_valid = true;

        match next {
            Some((min, max)) => {
                tracing::debug!("Raise range {}..={}", min, max);
                surface.set_attr(self.handles.slider, "min", &min.to_string())?;
                surface.set_attr(self.handles.slider, "max", &max.to_string())?;
                self.value = default_raise_value(min, max, self.step);
                self.render_value(surface)?;
            }
            None => {
                if self.open {
                    self.close(surface)?;
                }
            }
        }
        self.render_enabled(surface)
    }

    pub fn open_panel<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        if self.bounds.is_none() || self.open {
            return Ok(());
        }
        self.open = true;
        surface.set_visible(self.handles.panel, true)
    }

    pub fn close<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        surface.set_visible(self.handles.panel, false)
    }

    /// Slider values are always numeric; anything else is ignored
    pub fn set_from_slider<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        raw: &str,
    ) -> ClientResult<()> {
        match raw.trim().parse::<i64>() {
            Ok(value) => self.set_value(surface, value),
            Err(_) => {
                tracing::debug!("Ignoring slider value {:?}", raw);
                Ok(())
            }
        }
    }

    pub fn set_from_input<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        raw: &str,
    ) -> ClientResult<()> {
        match parse_amount(raw) {
            Ok(value) => self.set_value(surface, value),
            Err(e) => {
                tracing::debug!("Raise entry rejected: {}", e);
                self.input_valid = false;
                self.render_enabled(surface)
            }
        }
    }

    pub fn step<S: Surface + ?Sized>(&mut self, surface: &mut S, up: bool) -> ClientResult<()> {
        let delta = if up { self.step } else { -self.step };
        self.set_value(surface, self.value.saturating_add(delta))
    }

    /// The push for the current amount, closing the panel. `None` when
    /// submission is disabled or the panel is not open.
    pub fn submit<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        if !self.open || !self.can_submit() {
            return Ok(None);
        }
        self.close(surface)?;
        Ok(Some(OutboundMessage::PlayerRaised {
            player: self.player.clone(),
            amount: self.value,
        }))
    }

    fn set_value<S: Surface + ?Sized>(&mut self, surface: &mut S, value: i64) -> ClientResult<()> {
        let Some((min, max)) = self.bounds else {
            return Ok(());
        };
        self.value = keep_in_range(value, min, max);
        self.input_valid = true;
        self.render_value(surface)?;
        self.render_enabled(surface)
    }

    fn render_value<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        if self.shown_value == Some(self.value) {
            return Ok(());
        }
        let text = self.value.to_string();
        surface.set_attr(self.handles.slider, "value", &text)?;
        surface.set_attr(self.handles.input, "value", &text)?;
        surface.set_text(self.handles.display, &text)?;
        self.shown_value = Some(self.value);
        Ok(())
    }

    fn render_enabled<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        let openable = self.bounds.is_some();
        let submittable = self.can_submit();
        if openable != self.shown_enabled {
            surface.set_class(self.handles.open_button, "disabled", !openable)?;
            self.shown_enabled = openable;
        }
        if submittable != self.shown_submittable {
            surface.set_class(self.handles.submit, "disabled", !submittable)?;
            self.shown_submittable = submittable;
        }
        Ok(())
    }
}
