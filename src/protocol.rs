//! Wire format for moves exchanged between peers.
//!
//! Every message is one JSON object on its own line. A play names the card by
//! its color and rank plus the color chosen for it; a draw uses the literal
//! color `"DRAW"` and carries no card. Both also carry `seq`, the number of
//! moves applied before this one, and `turn`, the seat holding the turn after
//! the sender applied the move.

use serde::{Deserialize, Serialize};

use crate::action::{Move, Player};
use crate::card::{Card, Color, Rank};
use crate::error::ProtocolError;

/// Color field value marking a draw.
pub const DRAW_SENTINEL: &str = "DRAW";

/// Raw move frame as it appears on the wire.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MoveFrame {
    pub seq: u64,
    pub turn: u8,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "chosenColor")]
    pub chosen_color: Option<String>,
}

/// Opening frame: the listener announces the seed, the joiner echoes it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Hello {
    pub seed: u64,
    pub name: String,
}

/// A decoded move from the peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerMove {
    pub seq: u64,
    pub turn: Player,
    pub mv: Move,
}

impl PeerMove {
    pub fn new(seq: u64, turn: Player, mv: Move) -> Self {
        Self { seq, turn, mv }
    }

    pub fn to_frame(&self) -> MoveFrame {
        let (color, rank, chosen_color) = match self.mv {
            Move::Play { card, chosen_color } => {
                // Colored cards echo their own color.
                let chosen = if card.rank().is_wild() {
                    chosen_color
                } else {
                    card.color()
                };
                (
                    card.color().as_str().to_string(),
                    Some(card.rank().as_str().to_string()),
                    Some(chosen.as_str().to_string()),
                )
            }
            Move::Draw => (DRAW_SENTINEL.to_string(), None, None),
        };
        MoveFrame {
            seq: self.seq,
            turn: self.turn.number(),
            color,
            rank,
            chosen_color,
        }
    }
}

impl TryFrom<MoveFrame> for PeerMove {
    type Error = ProtocolError;

    fn try_from(frame: MoveFrame) -> Result<Self, Self::Error> {
        let turn = Player::from_number(frame.turn).ok_or(ProtocolError::InvalidTurn(frame.turn))?;
        if frame.color == DRAW_SENTINEL {
            if frame.rank.is_some() || frame.chosen_color.is_some() {
                return Err(ProtocolError::UnexpectedCardData);
            }
            return Ok(PeerMove::new(frame.seq, turn, Move::Draw));
        }
        let color: Color = frame.color.parse()?;
        let rank: Rank = frame
            .rank
            .as_deref()
            .ok_or(ProtocolError::MissingField("rank"))?
            .parse()?;
        let card = Card::new(color, rank);
        let chosen_color = match frame.chosen_color.as_deref() {
            Some(raw) => raw.parse()?,
            None if rank.is_wild() => return Err(ProtocolError::MissingField("chosenColor")),
            None => color,
        };
        Ok(PeerMove::new(
            frame.seq,
            turn,
            Move::Play { card, chosen_color },
        ))
    }
}

/// Serializes a value as one newline-terminated line.
pub fn encode_line<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one line into a move, rejecting every other shape.
pub fn decode_move(line: &str) -> Result<PeerMove, ProtocolError> {
    let frame: MoveFrame = serde_json::from_str(line.trim_end())?;
    PeerMove::try_from(frame)
}

pub fn decode_hello(line: &str) -> Result<Hello, ProtocolError> {
    Ok(serde_json::from_str(line.trim_end())?)
}
