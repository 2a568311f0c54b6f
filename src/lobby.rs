//! Lobby widgets: invitations, paginated room list, player search and
//! room occupancy

use std::collections::BTreeMap;

use crate::channel::{OutboundMessage, PageEntry, Participants, RoomId};
use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::constants::{DEFAULT_TOAST_MS, PAGE_WINDOW};
use crate::game::ClientResult;

// ===== Invitations =====

#[derive(Debug, Clone, Copy)]
pub struct InvitationHandles {
    pub list: NodeId,
    pub count: NodeId,
}

impl InvitationHandles {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let count = surface.create(ElementSpec::new("span").class("invitation-count").text("0"));
        let list = surface.create(ElementSpec::new("tbody").class("invitations"));
        surface.append(parent, count)?;
        surface.append(parent, list)?;
        Ok(Self { list, count })
    }
}

#[derive(Debug)]
struct InvitationRow {
    row: NodeId,
    decline: NodeId,
}

/// Pending invitations keyed by room id
#[derive(Debug)]
pub struct Invitations {
    handles: InvitationHandles,
    rows: BTreeMap<RoomId, InvitationRow>,
}

impl Invitations {
    pub fn new(handles: InvitationHandles) -> Self {
        Self {
            handles,
            rows: BTreeMap::new(),
        }
    }

    pub fn handles(&self) -> &InvitationHandles {
        &self.handles
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.rows.contains_key(room)
    }

    /// Adds a row and returns its decline button so the caller can bind it.
    /// A repeated invitation for the same room is ignored.
    pub fn receive<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        title: &str,
        id: &RoomId,
        participants: &Participants,
        owner: &str,
    ) -> ClientResult<Option<NodeId>> {
        if self.rows.contains_key(id) {
            tracing::debug!("Invitation to {} already listed", id);
            return Ok(None);
        }
        let row = surface.create(ElementSpec::new("tr").attr("id", format!("row-{}", id)));
        let cells = [
            surface.create(ElementSpec::new("td").text(title)),
            surface.create(ElementSpec::new("td").text(owner)),
            surface.create(ElementSpec::new("td").text(participants.to_string())),
        ];
        for cell in cells {
            surface.append(row, cell)?;
        }
        let decline = surface.create(ElementSpec::new("a").class("decline-btn").text("Decline"));
        surface.append(row, decline)?;
        surface.append(self.handles.list, row)?;

        self.rows.insert(id.clone(), InvitationRow { row, decline });
        self.render_count(surface)?;
        surface.toast(
            &format!("{} has invited you to {}", owner, title),
            DEFAULT_TOAST_MS,
            "invitation",
        );
        Ok(Some(decline))
    }

    pub fn decline(&self, room: &RoomId) -> OutboundMessage {
        OutboundMessage::DeclineInvitation { room: room.clone() }
    }

    /// Removes the row named by a `row-{id}` element id (or bare id). Returns
    /// the decline button that went away so its listener can be dropped.
    pub fn remove<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        remove: &str,
        toast: &str,
    ) -> ClientResult<Option<NodeId>> {
        let id = RoomId(remove.strip_prefix("row-").unwrap_or(remove).to_string());
        let Some(entry) = self.rows.remove(&id) else {
            tracing::warn!("No invitation row {}", remove);
            return Ok(None);
        };
        surface.remove(entry.row)?;
        self.render_count(surface)?;
        surface.toast(toast, DEFAULT_TOAST_MS, "invitation");
        Ok(Some(entry.decline))
    }

    pub fn decline_failed<S: Surface + ?Sized>(&self, surface: &mut S, room: &RoomId) {
        surface.toast(
            &format!("Failed to decline invitation to {}", room),
            DEFAULT_TOAST_MS,
            "error",
        );
    }

    fn render_count<S: Surface + ?Sized>(&self, surface: &mut S) -> ClientResult<()> {
        surface.set_text(self.handles.count, &self.rows.len().to_string())
    }
}

// ===== Pagination =====

/// Page numbers shown for `current`: the block of `width` pages it falls in
pub fn page_window(current: u32, total: u32, width: u32) -> Vec<u32> {
    if width == 0 || total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = (current - 1) / width * width + 1;
    (start..=total).take(width as usize).collect()
}

#[derive(Debug, Clone)]
pub struct PaginationHandles {
    pub back: NodeId,
    pub ahead: NodeId,
    pub links: Vec<NodeId>,
    pub entries: NodeId,
}

impl PaginationHandles {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let bar = surface.create(ElementSpec::new("ul").class("pagination"));
        surface.append(parent, bar)?;
        let back = surface.create(ElementSpec::new("li").attr("id", "page-back").class("disabled"));
        surface.append(bar, back)?;
        let mut links = Vec::with_capacity(PAGE_WINDOW);
        for _ in 0..PAGE_WINDOW {
            let link = surface.create(ElementSpec::new("li").class("page-btn"));
            surface.append(bar, link)?;
            surface.set_visible(link, false)?;
            links.push(link);
        }
        let ahead = surface.create(ElementSpec::new("li").attr("id", "page-ahead").class("disabled"));
        surface.append(bar, ahead)?;
        let entries = surface.create(ElementSpec::new("tbody").class("page-entries"));
        surface.append(parent, entries)?;
        Ok(Self {
            back,
            ahead,
            links,
            entries,
        })
    }
}

#[derive(Debug)]
pub struct Pagination {
    handles: PaginationHandles,
    current: u32,
    total: u32,
    window: Vec<u32>,
    back_disabled: bool,
    ahead_disabled: bool,
    entries: Vec<PageEntry>,
}

impl Pagination {
    pub fn new(handles: PaginationHandles) -> Self {
        Self {
            handles,
            current: 1,
            total: 1,
            window: Vec::new(),
            back_disabled: true,
            ahead_disabled: true,
            entries: Vec::new(),
        }
    }

    pub fn handles(&self) -> &PaginationHandles {
        &self.handles
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn window(&self) -> &[u32] {
        &self.window
    }

    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        current: u32,
        total: u32,
        entries: &[PageEntry],
    ) -> ClientResult<()> {
        let total = total.max(1);
        let current = current.clamp(1, total);
        let window = page_window(current, total, PAGE_WINDOW as u32);

        if window != self.window {
            for (slot, link) in self.handles.links.iter().enumerate() {
                match window.get(slot) {
                    Some(page) => {
                        surface.set_text(*link, &page.to_string())?;
                        surface.set_visible(*link, true)?;
                    }
                    None => surface.set_visible(*link, false)?,
                }
            }
        }
        for (slot, link) in self.handles.links.iter().enumerate() {
            let was = self.window.get(slot) == Some(&self.current);
            let now = window.get(slot) == Some(&current);
            if was != now {
                surface.set_class(*link, "active-page", now)?;
            }
        }
        if self.back_disabled != (current == 1) {
            self.back_disabled = current == 1;
            surface.set_class(self.handles.back, "disabled", self.back_disabled)?;
        }
        if self.ahead_disabled != (current == total) {
            self.ahead_disabled = current == total;
            surface.set_class(self.handles.ahead, "disabled", self.ahead_disabled)?;
        }

        if entries != self.entries.as_slice() {
            surface.clear(self.handles.entries)?;
            for entry in entries {
                let row =
                    surface.create(ElementSpec::new("tr").attr("data-link", entry.link.as_str()));
                let title = surface.create(ElementSpec::new("td").text(entry.title.as_str()));
                let seated =
                    surface.create(ElementSpec::new("td").text(entry.participants.to_string()));
                surface.append(row, title)?;
                surface.append(row, seated)?;
                surface.append(self.handles.entries, row)?;
            }
            self.entries = entries.to_vec();
        }

        self.current = current;
        self.total = total;
        self.window = window;
        Ok(())
    }

    pub fn back(&self) -> Option<OutboundMessage> {
        (self.current > 1).then(|| OutboundMessage::NewPage {
            current: Some(self.current),
            get: "back".to_string(),
        })
    }

    pub fn ahead(&self) -> Option<OutboundMessage> {
        (self.current < self.total).then(|| OutboundMessage::NewPage {
            current: Some(self.current),
            get: "ahead".to_string(),
        })
    }

    /// Push for the link in visible slot `slot`
    pub fn link(&self, slot: usize) -> Option<OutboundMessage> {
        let page = *self.window.get(slot)?;
        (page != self.current).then(|| OutboundMessage::NewPage {
            current: None,
            get: page.to_string(),
        })
    }
}

// ===== Player search =====

#[derive(Debug)]
pub struct PlayerSearch {
    input: NodeId,
    submit: NodeId,
    draft: String,
}

impl PlayerSearch {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let input = surface.create(ElementSpec::new("input").attr("id", "player-search"));
        let submit = surface.create(ElementSpec::new("a").attr("id", "player-search-submit"));
        surface.append(parent, input)?;
        surface.append(parent, submit)?;
        Ok(Self {
            input,
            submit,
            draft: String::new(),
        })
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn submit_button(&self) -> NodeId {
        self.submit
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn submit<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ClientResult<Option<OutboundMessage>> {
        let value = self.draft.trim().to_string();
        if value.is_empty() {
            return Ok(None);
        }
        self.draft.clear();
        surface.set_attr(self.input, "value", "")?;
        Ok(Some(OutboundMessage::PlayerSearch { value }))
    }
}

// ===== Room occupancy =====

pub fn occupancy_text(number: Option<i64>) -> String {
    match number.unwrap_or(0) {
        n if n <= 0 => "There are no players currently at table".to_string(),
        1 => "1 player currently at table".to_string(),
        n => format!("{} players currently at table", n),
    }
}

#[derive(Debug)]
pub struct RoomMonitor {
    list: NodeId,
    rooms: BTreeMap<String, (NodeId, String)>,
}

impl RoomMonitor {
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let list = surface.create(ElementSpec::new("ul").class("room-occupancy"));
        surface.append(parent, list)?;
        Ok(Self {
            list,
            rooms: BTreeMap::new(),
        })
    }

    pub fn text(&self, room: &str) -> Option<&str> {
        self.rooms.get(room).map(|(_, text)| text.as_str())
    }

    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        room: &str,
        number: Option<i64>,
    ) -> ClientResult<()> {
        let text = occupancy_text(number);
        match self.rooms.get_mut(room) {
            Some((_, shown)) if *shown == text => {}
            Some((node, shown)) => {
                surface.set_text(*node, &text)?;
                *shown = text;
            }
            None => {
                let node = surface.create(
                    ElementSpec::new("li")
                        .attr("id", format!("{}-count", room))
                        .text(text.as_str()),
                );
                surface.append(self.list, node)?;
                self.rooms.insert(room.to_string(), (node, text));
            }
        }
        Ok(())
    }
}
