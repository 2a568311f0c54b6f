//! Chip request form

use crate::channel::OutboundMessage;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::ClientResult;

/// Digits only, no leading zero, strictly below `max`
pub fn bank_input_valid(input: &str, max: i64) -> bool {
    let bytes = input.as_bytes();
    if bytes.is_empty() || bytes[0] == b'0' || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    input.parse::<i64>().map(|v| v < max).unwrap_or(false)
}

#[derive(Debug, Clone, Copy)]
pub struct BankRollHandles {
    pub input: NodeId,
    pub submit: NodeId,
    pub max_label: NodeId,
}

impl BankRollHandles {
    pub fn build<S: Surface + ?Sized>(
        surface: &mut S,
        parent: NodeId,
        max: i64,
    ) -> ClientResult<Self> {
        let form = surface.create(ElementSpec::new("div").class("bank-roll"));
        surface.append(parent, form)?;
        let input = surface.create(ElementSpec::new("input").attr("id", "bank-roll-input"));
        let submit = surface.create(
            ElementSpec::new("a")
                .attr("id", "bank-roll-submit")
                .class("disabled")
                .text("Add chips"),
        );
        let max_label = surface.create(ElementSpec::new("span").text(max.to_string()));
        for node in [input, submit, max_label] {
            surface.append(form, node)?;
        }
        Ok(Self {
            input,
            submit,
            max_label,
        })
    }
}

#[derive(Debug)]
pub struct BankRoll {
    handles: BankRollHandles,
    player: String,
    max: i64,
    draft: String,
    enabled: bool,
}

impl BankRoll {
    pub fn new(handles: BankRollHandles, player: impl Into<String>, max: i64) -> Self {
        Self {
            handles,
            player: player.into(),
            max,
            draft: String::new(),
            enabled: false,
        }
    }

    pub fn handles(&self) -> &BankRollHandles {
        &self.handles
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn set_input<S: Surface + ?Sized>(&mut self, surface: &mut S, text: &str) -> ClientResult<()> {
        self.draft = text.to_string();
        self.render_enabled(surface)
    }

    pub fn submit<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        if !bank_input_valid(&self.draft, self.max) {
            return Ok(None);
        }
        let amount = match self.draft.parse::<i64>() {
            Ok(amount) => amount,
            Err(_) => return Ok(None),
        };
        self.draft.clear();
        surface.set_attr(self.handles.input, "value", "")?;
        self.render_enabled(surface)?;
        Ok(Some(OutboundMessage::RequestChips {
            player: self.player.clone(),
            amount,
        }))
    }

    fn render_enabled<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        let valid = bank_input_valid(&self.draft, self.max);
        if valid != self.enabled {
            surface.set_class(self.handles.submit, "disabled", !valid)?;
            self.enabled = valid;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemorySurface;

    #[test]
    fn test_bank_input_rule() {
        assert!(bank_input_valid("500", 1000));
        assert!(!bank_input_valid("1000", 1000));
        assert!(!bank_input_valid("0500", 1000));
        assert!(!bank_input_valid("5.0", 1000));
        assert!(!bank_input_valid("", 1000));
    }

    #[test]
    fn test_submit_pushes_and_clears() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let handles = BankRollHandles::build(&mut surface, root, 1000).unwrap();
        let mut bank = BankRoll::new(handles, "A", 1000);

        bank.set_input(&mut surface, "250").unwrap();
        assert!(!surface.has_class(handles.submit, "disabled"));
        let push = bank.submit(&mut surface).unwrap();
        assert_eq!(
            push,
            Some(OutboundMessage::RequestChips {
                player: "A".to_string(),
                amount: 250
            })
        );
        assert!(surface.has_class(handles.submit, "disabled"));
        assert_eq!(bank.submit(&mut surface).unwrap(), None);
    }
}
