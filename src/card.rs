use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

pub const HAND_SIZE: usize = 7;
pub const DECK_SIZE: usize = 108;
pub const MAX_NUMBER: u8 = 9;
pub const WILD_COPIES: usize = 4;
pub const DRAW_TWO_PENALTY: usize = 2;
pub const DRAW_FOUR_PENALTY: usize = 4;
pub const UNO_PENALTY: usize = 2;

/// Card color. `Wild` marks a card whose color has not been chosen yet.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
    Wild,
}

impl Color {
    /// Colors a wild card can be bound to, in tie-break precedence order.
    pub const CHOOSABLE: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Color::Wild)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
            Color::Blue => "Blue",
            Color::Wild => "Wild",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Red" => Ok(Color::Red),
            "Yellow" => Ok(Color::Yellow),
            "Green" => Ok(Color::Green),
            "Blue" => Ok(Color::Blue),
            "Wild" => Ok(Color::Wild),
            other => Err(ProtocolError::UnknownColor(other.to_string())),
        }
    }
}

/// Face value or action of a card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Numbered card between 0 and 9.
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    /// Ranks dealt once per color (0) or twice per color (everything else colored).
    pub const COLORED: [Rank; 13] = [
        Rank::Number(0),
        Rank::Number(1),
        Rank::Number(2),
        Rank::Number(3),
        Rank::Number(4),
        Rank::Number(5),
        Rank::Number(6),
        Rank::Number(7),
        Rank::Number(8),
        Rank::Number(9),
        Rank::Skip,
        Rank::Reverse,
        Rank::DrawTwo,
    ];

    /// Skip and Reverse both hand the turn straight back in a two-player game.
    #[inline]
    pub fn skips_opponent(self) -> bool {
        matches!(self, Rank::Skip | Rank::Reverse)
    }

    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    pub fn as_str(self) -> &'static str {
        const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        match self {
            Rank::Number(value) => DIGITS.get(value as usize).copied().unwrap_or("?"),
            Rank::Skip => "Skip",
            Rank::Reverse => "Reverse",
            Rank::DrawTwo => "Draw Two",
            Rank::Wild => "Wild",
            Rank::WildDrawFour => "Wild Draw Four",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Skip" => Ok(Rank::Skip),
            "Reverse" => Ok(Rank::Reverse),
            "Draw Two" => Ok(Rank::DrawTwo),
            "Wild" => Ok(Rank::Wild),
            "Wild Draw Four" => Ok(Rank::WildDrawFour),
            other => match other.parse::<u8>() {
                Ok(value) if value <= MAX_NUMBER && other.len() == 1 => Ok(Rank::Number(value)),
                _ => Err(ProtocolError::UnknownRank(other.to_string())),
            },
        }
    }
}

/// Representation of an UNO card. Equality is by color and rank.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    color: Color,
    rank: Rank,
}

impl Card {
    pub const fn new(color: Color, rank: Rank) -> Self {
        Self { color, rank }
    }

    pub const fn number(color: Color, value: u8) -> Self {
        Self::new(color, Rank::Number(value))
    }

    pub const fn wild() -> Self {
        Self::new(Color::Wild, Rank::Wild)
    }

    pub const fn wild_draw_four() -> Self {
        Self::new(Color::Wild, Rank::WildDrawFour)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// True for a wild card that still has no color bound to it.
    #[inline]
    pub fn is_wild(&self) -> bool {
        self.color.is_wild()
    }

    /// Checks whether this card may be played on top of `top`.
    ///
    /// A played wild always carries the chosen color, so colored cards match it
    /// through that color or by rank.
    #[inline]
    pub fn is_playable_on(&self, top: &Card) -> bool {
        self.color == top.color || self.rank == top.rank || self.color.is_wild()
    }

    /// Colored instance of this card, used to record the color chosen for a wild.
    pub fn with_color(&self, color: Color) -> Card {
        Card::new(color, self.rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.color.is_wild() {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{} {}", self.color, self.rank)
        }
    }
}

/// Builds the full 108-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for color in Color::CHOOSABLE {
        for rank in Rank::COLORED {
            deck.push(Card::new(color, rank));
            if rank != Rank::Number(0) {
                deck.push(Card::new(color, rank));
            }
        }
    }
    for _ in 0..WILD_COPIES {
        deck.push(Card::wild());
        deck.push(Card::wild_draw_four());
    }
    deck
}
