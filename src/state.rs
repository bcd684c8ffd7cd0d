use serde::{Deserialize, Serialize};

use crate::action::{self, Move, Player};
use crate::card::Card;

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished { winner: Player },
}

/// Public portion of a player's state that the opponent may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub player: Player,
    pub name: String,
    pub hand_size: usize,
    pub is_current: bool,
}

/// Game state snapshot for one seat, read by bots and the presentation layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub status: GameStatus,
    pub self_player: Player,
    pub current_player: Player,
    pub top_card: Card,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
    pub move_count: u64,
    pub players: [PlayerPublicState; 2],
    pub hand: Vec<Card>,
}

impl GameStateView {
    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn is_my_turn(&self) -> bool {
        !self.is_game_over() && self.current_player == self.self_player
    }

    /// Moves available to the viewing seat; empty unless it holds the turn.
    pub fn legal_moves(&self) -> Vec<Move> {
        if !self.is_my_turn() {
            return Vec::new();
        }
        action::legal_moves(&self.hand, &self.top_card)
    }

    pub fn opponent(&self) -> &PlayerPublicState {
        &self.players[self.self_player.other().index()]
    }

    pub fn player(&self, player: Player) -> &PlayerPublicState {
        &self.players[player.index()]
    }
}
