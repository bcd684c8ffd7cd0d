use crate::action::Move;
use crate::state::GameStateView;

pub use crate::bots::{FirstPlayableBot, HumanBot, RandomBot};

/// Interface for anything that picks moves for a seat.
///
/// `legal_moves` always ends with [`Move::Draw`], so it is never empty while
/// the game is in progress.
pub trait Bot {
    fn select_move(&mut self, state: &GameStateView, legal_moves: &[Move]) -> Move;
}
