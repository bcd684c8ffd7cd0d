use std::io;

use thiserror::Error;

use crate::action::Player;
use crate::game::IgnoreReason;

/// Errors that can occur when constructing a game.
///
/// Moves never produce errors; illegal moves are reported as
/// [`crate::game::MoveOutcome::Ignored`].
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("deck must hold at least {minimum} cards, got {actual}")]
    DeckTooSmall { minimum: usize, actual: usize },
}

/// Failures while decoding or exchanging peer frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    #[error("unknown rank {0:?}")]
    UnknownRank(String),
    #[error("frame is missing field `{0}`")]
    MissingField(&'static str),
    #[error("draw frame carries card data")]
    UnexpectedCardData,
    #[error("turn marker {0} is neither 1 nor 2")]
    InvalidTurn(u8),
    #[error("handshake seed mismatch: sent {sent}, echoed {echoed}")]
    SeedMismatch { sent: u64, echoed: u64 },
    #[error("connection closed during handshake")]
    HandshakeClosed,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// True when the failure means the peer connection is gone.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            ProtocolError::Io(err) if matches!(
                err.kind(),
                io::ErrorKind::NotConnected
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            )
        )
    }
}

/// Reasons a running session stops early.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("peer sent move #{received} but {expected} moves have been applied locally")]
    Desync { expected: u64, received: u64 },
    #[error("peer move #{seq} does not apply locally: {reason:?}")]
    Rejected { seq: u64, reason: IgnoreReason },
    #[error("peer moved for {player} while the turn was held locally")]
    OutOfTurn { player: Player },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("session has shut down")]
    Closed,
}
