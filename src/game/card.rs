use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::DEAL_ANIMATIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Rank {
    /// Offset of this rank inside a suit's block of the Unicode playing card range.
    /// The block skips the knight (0xC) between jack and queen.
    fn glyph_offset(self) -> u32 {
        match self {
            Rank::Ace => 0x1,
            Rank::Two => 0x2,
            Rank::Three => 0x3,
            Rank::Four => 0x4,
            Rank::Five => 0x5,
            Rank::Six => 0x6,
            Rank::Seven => 0x7,
            Rank::Eight => 0x8,
            Rank::Nine => 0x9,
            Rank::Ten => 0xA,
            Rank::Jack => 0xB,
            Rank::Queen => 0xD,
            Rank::King => 0xE,
        }
    }

    fn short(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl Suit {
    fn glyph_block(self) -> u32 {
        match self {
            Suit::Spades => 0x1F0A0,
            Suit::Hearts => 0x1F0B0,
            Suit::Diamonds => 0x1F0C0,
            Suit::Clubs => 0x1F0D0,
        }
    }

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

/// Face-down card glyph
pub const CARD_BACK: char = '\u{1F0A0}';

/// A card as pushed by the server. Rendered, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Unicode playing card glyph used as the card's display asset
    pub fn glyph(&self) -> char {
        char::from_u32(self.suit.glyph_block() + self.rank.glyph_offset()).unwrap_or(CARD_BACK)
    }

    /// Asset path for the card image relative to `base`
    pub fn asset_path(&self, base: &str) -> String {
        format!("{}{}", base, self.glyph())
    }

    /// Element id used to colour the card image
    pub fn suit_class(&self) -> &'static str {
        if self.suit.is_red() {
            "deck-red-suit"
        } else {
            "deck-black-suit"
        }
    }

    /// Deal animation class for a card at board position `index`
    pub fn animation_class(index: usize) -> Option<&'static str> {
        DEAL_ANIMATIONS.get(index).copied()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.short(), self.suit.symbol())
    }
}
