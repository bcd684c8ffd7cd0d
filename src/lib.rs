//! Two-player UNO engine whose moves replicate between peers over a socket.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod error;
pub mod game;
pub mod net;
pub mod pile;
pub mod protocol;
pub mod session;
pub mod state;
pub mod visualize;

pub use crate::action::{Move, Player, legal_moves};
pub use crate::bot::{Bot, FirstPlayableBot, HumanBot, RandomBot};
pub use crate::card::{Card, Color, Rank};
pub use crate::error::{GameError, ProtocolError, SessionError};
pub use crate::game::{Game, GameBuilder, GameConfig, IgnoreReason, MoveOutcome, UnoCall};
pub use crate::net::{PeerChannel, PeerListener, Received};
pub use crate::protocol::{Hello, MoveFrame, PeerMove};
pub use crate::session::{Opponent, SessionConfig, SessionEnd, SessionHandle};
pub use crate::state::{GameStateView, GameStatus, PlayerPublicState};
pub use crate::visualize::{VisualOptions, describe_move, render_state};
