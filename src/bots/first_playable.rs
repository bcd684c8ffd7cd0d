use crate::action::Move;
use crate::bot::Bot;
use crate::card::{Card, Color};
use crate::state::GameStateView;

/// The built-in opponent.
///
/// - Plays the first card in hand order that fits the top card.
/// - Binds a wild to the color it holds most of; ties go to the earlier color
///   in Red, Yellow, Green, Blue order (so an empty count picks Red).
/// - Draws when nothing fits.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstPlayableBot;

impl FirstPlayableBot {
    pub fn new() -> Self {
        Self
    }

    /// Most common color in `hand`, ignoring unbound wilds.
    pub fn preferred_color(hand: &[Card]) -> Color {
        let mut counts = [0usize; Color::CHOOSABLE.len()];
        for card in hand {
            if let Some(index) = Color::CHOOSABLE.iter().position(|c| *c == card.color()) {
                counts[index] += 1;
            }
        }
        let mut best = 0;
        for (index, count) in counts.iter().enumerate().skip(1) {
            if *count > counts[best] {
                best = index;
            }
        }
        Color::CHOOSABLE[best]
    }
}

impl Bot for FirstPlayableBot {
    fn select_move(&mut self, state: &GameStateView, _legal_moves: &[Move]) -> Move {
        let first = state
            .hand
            .iter()
            .find(|card| card.is_playable_on(&state.top_card));
        match first {
            None => Move::Draw,
            Some(card) if card.is_wild() => {
                Move::play_wild(*card, Self::preferred_color(&state.hand))
            }
            Some(card) => Move::play(*card),
        }
    }
}
