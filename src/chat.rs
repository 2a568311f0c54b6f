//! Table chat

use crate::channel::OutboundMessage;
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::ClientResult;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct ChatHandles {
    pub input: NodeId,
    pub submit: NodeId,
    pub messages: NodeId,
}

impl ChatHandles {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let panel = surface.create(ElementSpec::new("div").class("chat"));
        surface.append(parent, panel)?;
        let messages = surface.create(ElementSpec::new("ul").class("chat-messages"));
        let input = surface.create(ElementSpec::new("input").attr("id", "chat-input"));
        let submit = surface.create(ElementSpec::new("a").attr("id", "chat-submit").text("Send"));
        for node in [messages, input, submit] {
            surface.append(panel, node)?;
        }
        Ok(Self {
            input,
            submit,
            messages,
        })
    }
}

#[derive(Debug)]
pub struct Chat {
    handles: ChatHandles,
    player: String,
    draft: String,
}

impl Chat {
    pub fn new(handles: ChatHandles, player: impl Into<String>) -> Self {
        Self {
            handles,
            player: player.into(),
            draft: String::new(),
        }
    }

    pub fn handles(&self) -> &ChatHandles {
        &self.handles
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Blank drafts are dropped
    pub fn submit<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        if self.draft.trim().is_empty() {
            return Ok(None);
        }
        let input = escape_html(&self.draft);
        self.draft.clear();
        surface.set_attr(self.handles.input, "value", "")?;
        Ok(Some(OutboundMessage::ChatMessage { input }))
    }

    /// Newest messages go on top
    pub fn receive<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        name: &str,
        text: &str,
    ) -> ClientResult<()> {
        let color = if name == self.player {
            "green-text"
        } else {
            "indigo-text"
        };
        let entry = surface.create(ElementSpec::new("li").class("chat-entry").text(text));
        let author = surface.create(
            ElementSpec::new("strong")
                .class(color)
                .text(format!("{}: ", name)),
        );
        surface.append(entry, author)?;
        surface.prepend(self.handles.messages, entry)
    }
}
