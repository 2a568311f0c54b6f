//! Table/Seating Reconciler
//!
//! The diff rules are pure functions over the previously rendered state and
//! the next snapshot. [`TableView`] applies their output to a [`Surface`] and
//! remembers what it rendered, so an unchanged snapshot produces no
//! mutations at all.

use std::collections::BTreeMap;

use crate::dom::{ElementSpec, NodeId, Surface};
use crate::game::constants::{FIRST_SEAT, MAX_SEATS};
use crate::game::{Card, ChipMap, ClientError, ClientResult, GamePhase, NormalizedSnapshot, SeatMap};

/// Seat changes between two seat maps. A reassigned player shows up in both
/// lists: removed from the old slot, inserted at the new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatingDiff {
    pub removed: Vec<(String, usize)>,
    pub inserted: Vec<(String, usize)>,
}

impl SeatingDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }
}

pub fn diff_seating(old: &SeatMap, new: &SeatMap) -> SeatingDiff {
    let mut removed: Vec<(String, usize)> = old
        .iter()
        .filter(|(name, seat)| new.get(*name) != Some(*seat))
        .map(|(name, seat)| (name.clone(), *seat))
        .collect();
    let mut inserted: Vec<(String, usize)> = new
        .iter()
        .filter(|(name, seat)| old.get(*name) != Some(*seat))
        .map(|(name, seat)| (name.clone(), *seat))
        .collect();

    removed.sort_by_key(|(_, seat)| *seat);
    inserted.sort_by_key(|(_, seat)| *seat);

    SeatingDiff { removed, inserted }
}

/// How the community board must change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardDiff {
    Unchanged,
    Clear,
    /// New cards dealt after the ones already shown; `from` is the board
    /// index of the first new card
    Append { from: usize, cards: Vec<Card> },
    /// The rendered board is not a prefix of the next one
    Replace(Vec<Card>),
}

pub fn diff_board(rendered: &[Card], next: &[Card], phase: GamePhase) -> BoardDiff {
    if phase.clears_board() || next.is_empty() {
        return if rendered.is_empty() {
            BoardDiff::Unchanged
        } else {
            BoardDiff::Clear
        };
    }

    if next == rendered {
        BoardDiff::Unchanged
    } else if next.starts_with(rendered) {
        BoardDiff::Append {
            from: rendered.len(),
            cards: next[rendered.len()..].to_vec(),
        }
    } else {
        BoardDiff::Replace(next.to_vec())
    }
}

/// Participant chip list changes, keyed by player name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipsDiff {
    pub removed: Vec<String>,
    pub inserted: Vec<(String, i64)>,
    pub changed: Vec<(String, i64)>,
}

impl ChipsDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && self.changed.is_empty()
    }
}

pub fn diff_chips(old: &ChipMap, new: &ChipMap) -> ChipsDiff {
    let mut diff = ChipsDiff::default();
    for name in old.keys() {
        if !new.contains_key(name) {
            diff.removed.push(name.clone());
        }
    }
    for (name, chips) in new {
        match old.get(name) {
            None => diff.inserted.push((name.clone(), *chips)),
            Some(prev) if prev != chips => diff.changed.push((name.clone(), *chips)),
            Some(_) => {}
        }
    }
    diff
}

/// Element handles the table renders into
#[derive(Debug, Clone)]
pub struct TableHandles {
    pub container: NodeId,
    /// Seat slot containers; index 0 is slot 1
    pub seats: Vec<NodeId>,
    pub board: NodeId,
    pub pot: NodeId,
    pub hole_left: NodeId,
    pub hole_right: NodeId,
    pub participants: NodeId,
    pub winner: NodeId,
}

impl TableHandles {
    /// Builds the table skeleton under `parent`
    pub fn build<S: Surface + ?Sized>(surface: &mut S, parent: NodeId) -> ClientResult<Self> {
        let container = surface.create(ElementSpec::new("div").class("card-table"));
        surface.append(parent, container)?;

        let mut seats = Vec::with_capacity(MAX_SEATS);
        for slot in FIRST_SEAT..FIRST_SEAT + MAX_SEATS {
            let seat = surface.create(ElementSpec::new("div").class(&seat_class(slot)));
            surface.append(container, seat)?;
            seats.push(seat);
        }

        let board = surface.create(ElementSpec::new("div").class("table-cards"));
        surface.append(container, board)?;
        let pot = surface.create(ElementSpec::new("span").attr("id", "pot").text("0"));
        surface.append(container, pot)?;

        let hole_left = surface.create(ElementSpec::new("img").class("card-image-left"));
        let hole_right = surface.create(ElementSpec::new("img").class("card-image-right"));
        surface.append(container, hole_left)?;
        surface.append(container, hole_right)?;
        surface.set_visible(hole_left, false)?;
        surface.set_visible(hole_right, false)?;

        let participants = surface.create(ElementSpec::new("ul").attr("id", "participant-info"));
        surface.append(container, participants)?;
        let winner = surface.create(ElementSpec::new("p").class("winner-message"));
        surface.append(container, winner)?;

        Ok(Self {
            container,
            seats,
            board,
            pot,
            hole_left,
            hole_right,
            participants,
            winner,
        })
    }

    fn seat(&self, slot: usize) -> Option<NodeId> {
        slot.checked_sub(FIRST_SEAT)
            .and_then(|index| self.seats.get(index))
            .copied()
    }
}

pub fn seat_class(slot: usize) -> String {
    format!("seat-position-{}", slot)
}

#[derive(Debug, Clone, Copy)]
struct ChipRow {
    chips: i64,
    row: NodeId,
    amount: NodeId,
}

/// Renders seating, board, pot, hole cards and the chip list
#[derive(Debug)]
pub struct TableView {
    handles: TableHandles,
    asset_base: String,
    emblems: BTreeMap<String, (usize, NodeId)>,
    board: Vec<(Card, NodeId)>,
    pot: i64,
    active: Option<NodeId>,
    hand: Option<Vec<Card>>,
    chips: BTreeMap<String, ChipRow>,
}

impl TableView {
    pub fn new(handles: TableHandles, asset_base: impl Into<String>) -> Self {
        Self {
            handles,
            asset_base: asset_base.into(),
            emblems: BTreeMap::new(),
            board: Vec::new(),
            pot: 0,
            active: None,
            hand: None,
            chips: BTreeMap::new(),
        }
    }

    pub fn handles(&self) -> &TableHandles {
        &self.handles
    }

    /// Seat map as currently drawn
    pub fn rendered_seating(&self) -> SeatMap {
        self.emblems
            .iter()
            .map(|(name, (seat, _))| (name.clone(), *seat))
            .collect()
    }

    /// Board cards as currently drawn
    pub fn rendered_board(&self) -> Vec<Card> {
        self.board.iter().map(|(card, _)| *card).collect()
    }

    pub fn rendered_pot(&self) -> i64 {
        self.pot
    }

    pub fn emblem(&self, name: &str) -> Option<NodeId> {
        self.emblems.get(name).map(|(_, node)| *node)
    }

    pub fn update<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        snapshot: &NormalizedSnapshot,
    ) -> ClientResult<()> {
        self.reconcile_seating(surface, &snapshot.seating)?;
        self.reconcile_board(surface, &snapshot.table, snapshot.state)?;
        self.reconcile_pot(surface, snapshot.pot)?;
        self.reconcile_active(surface, snapshot.active.as_deref())?;
        self.reconcile_hand(surface, snapshot.player_hand.as_deref())?;
        self.reconcile_chips(surface, &snapshot.chip_roll)?;
        Ok(())
    }

    /// Hand over: empty the board and the pot
    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ClientResult<()> {
        self.reconcile_board(surface, &[], GamePhase::BetweenRounds)?;
        self.reconcile_pot(surface, 0)?;
        self.reconcile_active(surface, None)
    }

    pub fn show_winner<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        message: &str,
    ) -> ClientResult<()> {
        surface.set_text(self.handles.winner, message)
    }

    fn reconcile_seating<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        seating: &SeatMap,
    ) -> ClientResult<()> {
        let diff = diff_seating(&self.rendered_seating(), seating);
        if diff.is_empty() {
            return Ok(());
        }

        for (name, seat) in &diff.removed {
            if let Some((_, node)) = self.emblems.remove(name) {
                tracing::debug!("Removing {} from seat {}", name, seat);
                surface.remove(node)?;
                if self.active == Some(node) {
                    self.active = None;
                }
            }
        }

        for (name, seat) in &diff.inserted {
            let Some(slot) = self.handles.seat(*seat) else {
                let err = ClientError::SeatOutOfRange {
                    player: name.clone(),
                    seat: *seat,
                };
                tracing::warn!("{}", err);
                continue;
            };
            if self.emblems.values().any(|(taken, _)| taken == seat) {
                tracing::warn!("Seat {} is already drawn; {} shares it", seat, name);
            }
            let emblem = surface.create(
                ElementSpec::new("div")
                    .class("player-emblem")
                    .text(name.clone())
                    .attr("data-player", name.clone()),
            );
            surface.append(slot, emblem)?;
            self.emblems.insert(name.clone(), (*seat, emblem));
        }
        Ok(())
    }

    fn reconcile_board<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        next: &[Card],
        phase: GamePhase,
    ) -> ClientResult<()> {
        match diff_board(&self.rendered_board(), next, phase) {
            BoardDiff::Unchanged => Ok(()),
            BoardDiff::Clear => {
                surface.clear(self.handles.board)?;
                self.board.clear();
                Ok(())
            }
            BoardDiff::Append { from, cards } => self.append_cards(surface, from, &cards),
            BoardDiff::Replace(cards) => {
                tracing::debug!("Board out of step with server; redrawing {} cards", cards.len());
                surface.clear(self.handles.board)?;
                self.board.clear();
                self.append_cards(surface, 0, &cards)
            }
        }
    }

    fn append_cards<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        from: usize,
        cards: &[Card],
    ) -> ClientResult<()> {
        for (offset, card) in cards.iter().enumerate() {
            let node = surface.create(self.card_spec(card, from + offset));
            surface.append(self.handles.board, node)?;
            self.board.push((*card, node));
        }
        Ok(())
    }

    fn card_spec(&self, card: &Card, index: usize) -> ElementSpec {
        let mut spec = ElementSpec::new("img")
            .attr("src", card.asset_path(&self.asset_base))
            .attr("id", card.suit_class())
            .attr("alt", card.to_string());
        if let Some(animation) = Card::animation_class(index) {
            spec = spec.class(animation);
        }
        spec
    }

    fn reconcile_pot<S: Surface + ?Sized>(&mut self, surface: &mut S, pot: i64) -> ClientResult<()> {
        if pot != self.pot {
            surface.set_text(self.handles.pot, &pot.to_string())?;
            self.pot = pot;
        }
        Ok(())
    }

    fn reconcile_active<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        active: Option<&str>,
    ) -> ClientResult<()> {
        let next = active.and_then(|name| self.emblem(name));
        if next == self.active {
            return Ok(());
        }
        if let Some(prev) = self.active.take() {
            surface.set_class(prev, "active", false)?;
        }
        if let Some(node) = next {
            surface.set_class(node, "active", true)?;
        }
        self.active = next;
        Ok(())
    }

    fn reconcile_hand<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        hand: Option<&[Card]>,
    ) -> ClientResult<()> {
        if self.hand.as_deref() == hand {
            return Ok(());
        }
        let slots = [self.handles.hole_left, self.handles.hole_right];
        match hand {
            Some(cards) if cards.len() >= slots.len() => {
                for (slot, card) in slots.iter().zip(cards) {
                    surface.set_attr(*slot, "src", &card.asset_path(&self.asset_base))?;
                    surface.set_attr(*slot, "alt", &card.to_string())?;
                    surface.set_visible(*slot, true)?;
                }
            }
            _ => {
                for slot in slots {
                    surface.set_visible(slot, false)?;
                }
            }
        }
        self.hand = hand.map(<[Card]>::to_vec);
        Ok(())
    }

    fn reconcile_chips<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        chip_roll: &ChipMap,
    ) -> ClientResult<()> {
        let rendered: ChipMap = self
            .chips
            .iter()
            .map(|(name, row)| (name.clone(), row.chips))
            .collect();
        let diff = diff_chips(&rendered, chip_roll);
        if diff.is_empty() {
            return Ok(());
        }

        for name in &diff.removed {
            if let Some(row) = self.chips.remove(name) {
                surface.remove(row.row)?;
            }
        }
        for (name, chips) in &diff.changed {
            if let Some(row) = self.chips.get_mut(name) {
                surface.set_text(row.amount, &chips.to_string())?;
                row.chips = *chips;
            }
        }
        for (name, chips) in &diff.inserted {
            let row = surface.create(
                ElementSpec::new("li")
                    .class("collection-item")
                    .text(name.clone())
                    .attr("id", format!("{}-participant-item", name)),
            );
            let amount = surface.create(
                ElementSpec::new("span")
                    .class("secondary-content")
                    .text(chips.to_string()),
            );
            surface.append(row, amount)?;
            surface.append(self.handles.participants, row)?;
            self.chips.insert(
                name.clone(),
                ChipRow {
                    chips: *chips,
                    row,
                    amount,
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemorySurface;
    use crate::game::{Rank, Suit};

    fn seats(entries: &[(&str, usize)]) -> SeatMap {
        entries
            .iter()
            .map(|(name, seat)| (name.to_string(), *seat))
            .collect()
    }

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn view(surface: &mut MemorySurface) -> TableView {
        let root = surface.root();
        let handles = TableHandles::build(surface, root).unwrap();
        TableView::new(handles, "../")
    }

    #[test]
    fn test_diff_seating_add_remove_move() {
        let old = seats(&[("A", 1), ("B", 2), ("C", 3)]);
        let new = seats(&[("A", 1), ("C", 4), ("D", 2)]);
        let diff = diff_seating(&old, &new);

        assert_eq!(
            diff.removed,
            vec![("B".to_string(), 2), ("C".to_string(), 3)]
        );
        assert_eq!(
            diff.inserted,
            vec![("D".to_string(), 2), ("C".to_string(), 4)]
        );
    }

    #[test]
    fn test_diff_seating_identical_is_empty() {
        let map = seats(&[("A", 1), ("B", 2)]);
        assert!(diff_seating(&map, &map).is_empty());
    }

    #[test]
    fn test_diff_board_append() {
        let flop = vec![
            card(Rank::Two, Suit::Hearts),
            card(Rank::Three, Suit::Spades),
            card(Rank::Four, Suit::Diamonds),
        ];
        let mut turn = flop.clone();
        turn.push(card(Rank::Ace, Suit::Clubs));

        assert_eq!(
            diff_board(&flop, &turn, GamePhase::Turn),
            BoardDiff::Append {
                from: 3,
                cards: vec![card(Rank::Ace, Suit::Clubs)]
            }
        );
        assert_eq!(diff_board(&turn, &turn, GamePhase::Turn), BoardDiff::Unchanged);
    }

    #[test]
    fn test_diff_board_clears_on_new_hand() {
        let flop = vec![card(Rank::Two, Suit::Hearts)];
        assert_eq!(diff_board(&flop, &[], GamePhase::PreFlop), BoardDiff::Clear);
        assert_eq!(diff_board(&flop, &flop, GamePhase::Idle), BoardDiff::Clear);
        assert_eq!(diff_board(&[], &[], GamePhase::Idle), BoardDiff::Unchanged);
    }

    #[test]
    fn test_diff_board_replace_when_out_of_step() {
        let shown = vec![card(Rank::Two, Suit::Hearts)];
        let next = vec![
            card(Rank::King, Suit::Hearts),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Jack, Suit::Hearts),
        ];
        assert_eq!(
            diff_board(&shown, &next, GamePhase::Flop),
            BoardDiff::Replace(next.clone())
        );
    }

    #[test]
    fn test_diff_chips() {
        let old: ChipMap = [("A".to_string(), 200), ("B".to_string(), 200)].into();
        let new: ChipMap = [("A".to_string(), 190), ("C".to_string(), 100)].into();
        let diff = diff_chips(&old, &new);
        assert_eq!(diff.removed, vec!["B".to_string()]);
        assert_eq!(diff.inserted, vec![("C".to_string(), 100)]);
        assert_eq!(diff.changed, vec![("A".to_string(), 190)]);
    }

    #[test]
    fn test_update_draws_emblems_in_slots() {
        let mut surface = MemorySurface::new();
        let mut table = view(&mut surface);
        let snapshot = NormalizedSnapshot {
            seating: seats(&[("A", 1), ("B", 3)]),
            ..NormalizedSnapshot::empty("A")
        };
        table.update(&mut surface, &snapshot).unwrap();

        let slot_three = table.handles().seats[2];
        assert_eq!(surface.child_texts(slot_three), vec!["B".to_string()]);
        assert_eq!(table.rendered_seating(), snapshot.seating);
    }

    #[test]
    fn test_unchanged_seat_keeps_its_node() {
        let mut surface = MemorySurface::new();
        let mut table = view(&mut surface);
        let mut snapshot = NormalizedSnapshot {
            seating: seats(&[("A", 1), ("B", 2)]),
            ..NormalizedSnapshot::empty("A")
        };
        table.update(&mut surface, &snapshot).unwrap();
        let a_node = table.emblem("A").unwrap();

        snapshot.seating = seats(&[("A", 1), ("C", 2)]);
        table.update(&mut surface, &snapshot).unwrap();

        assert_eq!(table.emblem("A"), Some(a_node));
        assert!(table.emblem("B").is_none());
        assert!(table.emblem("C").is_some());
    }

    #[test]
    fn test_out_of_range_seat_is_skipped() {
        let mut surface = MemorySurface::new();
        let mut table = view(&mut surface);
        let snapshot = NormalizedSnapshot {
            seating: seats(&[("A", 1), ("Z", 9)]),
            ..NormalizedSnapshot::empty("A")
        };
        table.update(&mut surface, &snapshot).unwrap();
        let after_first = surface.mutation_count();

        table.update(&mut surface, &snapshot).unwrap();
        assert!(table.emblem("Z").is_none());
        assert_eq!(surface.mutation_count(), after_first);
    }

    #[test]
    fn test_active_highlight_moves() {
        let mut surface = MemorySurface::new();
        let mut table = view(&mut surface);
        let mut snapshot = NormalizedSnapshot {
            state: GamePhase::PreFlop,
            seating: seats(&[("A", 1), ("B", 2)]),
            active: Some("A".to_string()),
            ..NormalizedSnapshot::empty("A")
        };
        table.update(&mut surface, &snapshot).unwrap();
        let a = table.emblem("A").unwrap();
        let b = table.emblem("B").unwrap();
        assert!(surface.has_class(a, "active"));

        snapshot.active = Some("B".to_string());
        table.update(&mut surface, &snapshot).unwrap();
        assert!(!surface.has_class(a, "active"));
        assert!(surface.has_class(b, "active"));
    }
}
