use rand::Rng;
use rand::seq::SliceRandom;

use crate::action::Move;
use crate::bot::Bot;
use crate::state::GameStateView;

/// Baseline bot that samples uniformly from the legal move set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_move(&mut self, _state: &GameStateView, legal_moves: &[Move]) -> Move {
        legal_moves
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Move::Draw)
    }
}
