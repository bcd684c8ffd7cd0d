use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Color};

/// One of the two seats at the table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// The seat across the table.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1-based seat number, as used on the wire.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(number: u8) -> Option<Player> {
        match number {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// A turn-ending decision a player can make.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Move {
    /// Play a card from the hand. `chosen_color` only matters for wild cards;
    /// otherwise it echoes the card's own color.
    Play { card: Card, chosen_color: Color },
    /// Draw one card and pass the turn.
    Draw,
}

impl Move {
    /// Play a colored card, echoing its own color as the chosen one.
    pub fn play(card: Card) -> Self {
        Move::Play {
            card,
            chosen_color: card.color(),
        }
    }

    /// Play a wild card bound to `color`.
    pub fn play_wild(card: Card, color: Color) -> Self {
        Move::Play {
            card,
            chosen_color: color,
        }
    }
}

/// Moves available with `hand` against `top`, in hand order, ending with
/// [`Move::Draw`]. Wild cards are listed once per color they can be bound to;
/// duplicate cards are listed once.
pub fn legal_moves(hand: &[Card], top: &Card) -> Vec<Move> {
    let mut moves = Vec::new();
    for card in hand.iter().filter(|card| card.is_playable_on(top)) {
        let candidates: Vec<Move> = if card.is_wild() {
            Color::CHOOSABLE
                .iter()
                .map(|color| Move::play_wild(*card, *color))
                .collect()
        } else {
            vec![Move::play(*card)]
        };
        for candidate in candidates {
            if !moves.contains(&candidate) {
                moves.push(candidate);
            }
        }
    }
    moves.push(Move::Draw);
    moves
}
