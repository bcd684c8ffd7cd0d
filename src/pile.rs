use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::card::Card;

/// Draw pile (LIFO, top is the end) plus the discard pile it is refilled from.
#[derive(Clone, Debug)]
pub struct Piles {
    draw: Vec<Card>,
    discard: Vec<Card>,
    rng: StdRng,
}

impl Piles {
    pub fn new(draw: Vec<Card>, rng: StdRng) -> Self {
        Self {
            draw,
            discard: Vec::new(),
            rng,
        }
    }

    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn shuffle(&mut self) {
        self.draw.shuffle(&mut self.rng);
    }

    /// Pops the top of the draw pile, refilling it from the discard pile first
    /// when it is empty. `None` when both piles are exhausted.
    pub fn draw(&mut self) -> Option<Card> {
        if self.draw.is_empty() {
            self.reshuffle_discard();
        }
        self.draw.pop()
    }

    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    /// Draws the opening top card, putting wilds back and reshuffling until a
    /// colored card comes up. `None` if the draw pile holds no colored card.
    pub fn draw_initial_top(&mut self) -> Option<Card> {
        if self.draw.iter().all(Card::is_wild) {
            return None;
        }
        loop {
            let card = self.draw.pop()?;
            if !card.is_wild() {
                return Some(card);
            }
            self.draw.push(card);
            self.shuffle();
        }
    }

    fn reshuffle_discard(&mut self) {
        if self.discard.is_empty() {
            return;
        }
        self.draw.append(&mut self.discard);
        self.shuffle();
    }
}
