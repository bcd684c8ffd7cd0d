//! Owner task for a running game.
//!
//! A session owns the [`Game`] and is the only place it is mutated. Local
//! intents from the presentation layer and decoded peer moves from a reader
//! task arrive on one ordered channel, so moves are applied strictly one at a
//! time. Local moves go through the authoritative path and are forwarded to
//! the peer; peer moves are checked against the local move count, replayed,
//! and then the peer's announced turn owner is adopted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::action::{Move, Player};
use crate::bot::Bot;
use crate::card::{Card, Color};
use crate::error::{ProtocolError, SessionError};
use crate::game::{Game, GameBuilder, MoveOutcome, UnoCall};
use crate::net::{PeerChannel, Received};
use crate::protocol::{Hello, PeerMove};
use crate::state::GameStateView;

/// Tunables for a session.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Seat driven by the local presentation layer.
    pub local: Player,
    /// Pause before each opponent bot move.
    pub bot_delay: Duration,
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local: Player::One,
            bot_delay: Duration::from_millis(500),
            channel_capacity: 32,
        }
    }
}

/// Who sits in the other seat.
pub enum Opponent {
    /// The engine's own first-playable opponent.
    BuiltIn,
    Bot(Box<dyn Bot + Send>),
    Peer(Arc<PeerChannel>),
}

/// Why a session finished without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Finished { winner: Player },
    PeerClosed,
    Shutdown,
}

#[derive(Debug)]
enum Intent {
    Move(Move),
    CallUno,
    Remote(RemoteEvent),
    Shutdown,
}

#[derive(Debug)]
enum RemoteEvent {
    Move(PeerMove),
    Closed,
    Malformed(ProtocolError),
}

/// Presentation-side handle: submit intents, watch state.
#[derive(Clone)]
pub struct SessionHandle {
    intents: mpsc::Sender<Intent>,
    state: watch::Receiver<GameStateView>,
}

impl SessionHandle {
    pub async fn submit(&self, mv: Move) -> Result<(), SessionError> {
        self.send(Intent::Move(mv)).await
    }

    pub async fn play(&self, card: Card, chosen_color: Color) -> Result<(), SessionError> {
        self.submit(Move::Play { card, chosen_color }).await
    }

    pub async fn draw(&self) -> Result<(), SessionError> {
        self.submit(Move::Draw).await
    }

    pub async fn call_uno(&self) -> Result<(), SessionError> {
        self.send(Intent::CallUno).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(Intent::Shutdown).await
    }

    /// For callers on a blocking thread, such as a stdin prompt.
    pub fn blocking_submit(&self, mv: Move) -> Result<(), SessionError> {
        self.intents
            .blocking_send(Intent::Move(mv))
            .map_err(|_| SessionError::Closed)
    }

    pub fn blocking_call_uno(&self) -> Result<(), SessionError> {
        self.intents
            .blocking_send(Intent::CallUno)
            .map_err(|_| SessionError::Closed)
    }

    /// Latest published snapshot for the local seat.
    pub fn state(&self) -> GameStateView {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameStateView> {
        self.state.clone()
    }

    async fn send(&self, intent: Intent) -> Result<(), SessionError> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Starts the owner task for `game`.
pub fn spawn(
    game: Game,
    config: SessionConfig,
    opponent: Opponent,
) -> (SessionHandle, JoinHandle<Result<SessionEnd, SessionError>>) {
    let (intents_tx, intents_rx) = mpsc::channel(config.channel_capacity.max(1));
    let (state_tx, state_rx) = watch::channel(game.state_view(config.local));
    let reader = match &opponent {
        Opponent::Peer(peer) => Some(tokio::spawn(read_peer(peer.clone(), intents_tx.clone()))),
        Opponent::BuiltIn | Opponent::Bot(_) => None,
    };
    let session = Session {
        game,
        config,
        opponent,
        state: state_tx,
    };
    let task = tokio::spawn(session.run(intents_rx, reader));
    let handle = SessionHandle {
        intents: intents_tx,
        state: state_rx,
    };
    (handle, task)
}

/// Listener side of a network game: agree on `seed`, then build the game with
/// the local player in seat one.
pub async fn host_game(peer: &PeerChannel, seed: u64, name: &str) -> Result<Game, SessionError> {
    let reply = peer
        .offer_hello(&Hello {
            seed,
            name: name.to_string(),
        })
        .await?;
    info!(seed, opponent = %reply.name, "handshake complete");
    Ok(GameBuilder::new()
        .with_seed(seed)
        .with_names(name, reply.name)
        .build()?)
}

/// Joining side of a network game; the local player takes seat two.
pub async fn join_game(peer: &PeerChannel, name: &str) -> Result<Game, SessionError> {
    let offer = peer.answer_hello(name).await?;
    info!(seed = offer.seed, opponent = %offer.name, "handshake complete");
    Ok(GameBuilder::new()
        .with_seed(offer.seed)
        .with_names(offer.name, name)
        .build()?)
}

struct Session {
    game: Game,
    config: SessionConfig,
    opponent: Opponent,
    state: watch::Sender<GameStateView>,
}

impl Session {
    async fn run(
        mut self,
        mut intents: mpsc::Receiver<Intent>,
        reader: Option<JoinHandle<()>>,
    ) -> Result<SessionEnd, SessionError> {
        info!(local = %self.config.local, "session started");
        let end = self.drive(&mut intents).await;
        if let Some(peer) = self.peer() {
            peer.close().await;
        }
        if let Some(reader) = reader {
            reader.abort();
        }
        match &end {
            Ok(end) => info!(?end, "session ended"),
            Err(err) => warn!(%err, "session aborted"),
        }
        end
    }

    async fn drive(
        &mut self,
        intents: &mut mpsc::Receiver<Intent>,
    ) -> Result<SessionEnd, SessionError> {
        self.run_bot_turns().await;
        self.publish();
        loop {
            if let Some(winner) = self.game.winner() {
                return Ok(SessionEnd::Finished { winner });
            }
            let Some(intent) = intents.recv().await else {
                return Ok(SessionEnd::Shutdown);
            };
            match intent {
                Intent::Move(mv) => {
                    if let Some(end) = self.handle_local_move(mv).await? {
                        return Ok(end);
                    }
                }
                Intent::CallUno => self.handle_uno(),
                Intent::Remote(event) => {
                    if let Some(end) = self.handle_remote(event)? {
                        return Ok(end);
                    }
                }
                Intent::Shutdown => return Ok(SessionEnd::Shutdown),
            }
            self.publish();
        }
    }

    async fn handle_local_move(&mut self, mv: Move) -> Result<Option<SessionEnd>, SessionError> {
        let local = self.config.local;
        if self.game.current_player() != local {
            warn!(?mv, "not the local player's turn; move refused");
            return Ok(None);
        }
        let seq = self.game.move_count();
        let outcome = self.game.apply_move(local, mv);
        if !outcome.is_applied() {
            debug!(?mv, ?outcome, "local move not applied");
            return Ok(None);
        }
        if let Some(peer) = self.peer() {
            let peer_move = PeerMove::new(seq, self.game.current_player(), mv);
            match peer.send(&peer_move).await {
                Ok(()) => debug!(seq, ?mv, "move sent to peer"),
                Err(err) if err.is_disconnect() => {
                    info!(%err, "peer gone before the move could be sent");
                    return Ok(Some(SessionEnd::PeerClosed));
                }
                Err(err) => return Err(err.into()),
            }
            return Ok(None);
        }
        self.publish();
        self.run_bot_turns().await;
        Ok(None)
    }

    fn handle_uno(&mut self) {
        let local = self.config.local;
        if self.peer().is_some() {
            // The wire carries no UNO frame; a penalty draw here would split the decks.
            warn!("uno calls are not replicated; refused in a networked game");
            return;
        }
        match self.game.press_uno(local) {
            UnoCall::Safe => info!(player = %local, "uno!"),
            UnoCall::Penalized { drawn } => info!(player = %local, drawn, "false uno call"),
            UnoCall::Ignored => {}
        }
    }

    fn handle_remote(&mut self, event: RemoteEvent) -> Result<Option<SessionEnd>, SessionError> {
        let peer_move = match event {
            RemoteEvent::Move(peer_move) => peer_move,
            RemoteEvent::Closed => return Ok(Some(SessionEnd::PeerClosed)),
            RemoteEvent::Malformed(err) => return Err(err.into()),
        };
        let remote = self.config.local.other();
        let expected = self.game.move_count();
        if peer_move.seq != expected {
            return Err(SessionError::Desync {
                expected,
                received: peer_move.seq,
            });
        }
        if self.game.current_player() != remote {
            return Err(SessionError::OutOfTurn { player: remote });
        }
        // A move the replica cannot apply leaves the peers waiting on each other.
        if let MoveOutcome::Ignored(reason) = self.game.apply_remote(remote, peer_move.mv) {
            return Err(SessionError::Rejected {
                seq: peer_move.seq,
                reason,
            });
        }
        self.game.adopt_turn(peer_move.turn);
        debug!(seq = peer_move.seq, mv = ?peer_move.mv, "peer move replayed");
        Ok(None)
    }

    /// Lets a local opponent move for as long as it holds the turn; Skip and
    /// Reverse hand it straight back.
    async fn run_bot_turns(&mut self) {
        let seat = self.config.local.other();
        while !self.game.is_game_over() && self.game.current_player() == seat {
            if !self.config.bot_delay.is_zero() {
                tokio::time::sleep(self.config.bot_delay).await;
            }
            match &mut self.opponent {
                Opponent::Peer(_) => return,
                Opponent::BuiltIn => {
                    let mv = self.game.perform_ai_turn();
                    debug!(?mv, "built-in opponent moved");
                }
                Opponent::Bot(bot) => {
                    let view = self.game.state_view(seat);
                    let legal_moves = self.game.legal_moves(seat);
                    let mv = bot.select_move(&view, &legal_moves);
                    let outcome = self.game.apply_move(seat, mv);
                    if !outcome.is_applied() {
                        warn!(?mv, ?outcome, "bot move rejected; drawing instead");
                        self.game.player_draw_card(seat);
                    }
                }
            }
            self.publish();
        }
    }

    fn peer(&self) -> Option<Arc<PeerChannel>> {
        match &self.opponent {
            Opponent::Peer(peer) => Some(peer.clone()),
            Opponent::BuiltIn | Opponent::Bot(_) => None,
        }
    }

    fn publish(&self) {
        self.state.send_replace(self.game.state_view(self.config.local));
    }
}

async fn read_peer(peer: Arc<PeerChannel>, intents: mpsc::Sender<Intent>) {
    loop {
        let event = match peer.receive().await {
            Ok(Received::Move(peer_move)) => RemoteEvent::Move(peer_move),
            Ok(Received::Closed) => RemoteEvent::Closed,
            Err(err) => {
                warn!(%err, "undecodable frame from peer");
                RemoteEvent::Malformed(err)
            }
        };
        let last = !matches!(event, RemoteEvent::Move(_));
        if intents.send(Intent::Remote(event)).await.is_err() || last {
            break;
        }
    }
    debug!("peer reader stopped");
}
