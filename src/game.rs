use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::action::{self, Move, Player};
use crate::bot::Bot;
use crate::bots::FirstPlayableBot;
use crate::card::{
    Card, Color, DRAW_FOUR_PENALTY, DRAW_TWO_PENALTY, HAND_SIZE, Rank, UNO_PENALTY, full_deck,
};
use crate::error::GameError;
use crate::pile::Piles;
use crate::state::{GameStateView, GameStatus, PlayerPublicState};

const DEFAULT_SEED: u64 = 0x0DD5_EED5_0F0D_D5EE;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub seed: u64,
    pub names: [String; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            names: [String::from("Player 1"), String::from("Player 2")],
        }
    }
}

/// Builder that enables deterministic deck injection for testing and replication.
///
/// Two peers that build from the same seed (and no injected deck) end up with
/// identical decks, hands and top card.
#[derive(Default)]
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_names(mut self, one: impl Into<String>, two: impl Into<String>) -> Self {
        self.config.names = [one.into(), two.into()];
        self
    }

    /// Use `deck` as-is instead of a shuffled standard deck. Cards are dealt
    /// from the end: alternately to player one and two, then the top card.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Why a move left the state untouched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    GameOver,
    NotPlayable { card: Card, top: Card },
    NotInHand(Card),
    /// A wild card was played without binding a color to it.
    UnresolvedWild(Card),
}

/// Result of a move operation. Illegal moves are no-ops, never errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied)
    }
}

/// Result of calling UNO.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnoCall {
    /// Hand held exactly one card; no penalty.
    Safe,
    /// Hand did not hold exactly one card; `drawn` penalty cards were added.
    Penalized { drawn: usize },
    /// The game is over.
    Ignored,
}

/// Two-player UNO state machine.
///
/// Every move has an authoritative form, used by the seat that decided it and
/// which advances turn ownership, and a replay form, used to mirror a peer's
/// already-committed move, which reproduces every other effect but leaves
/// `current_player` alone.
#[derive(Clone, Debug)]
pub struct Game {
    names: [String; 2],
    seed: u64,
    deck_size: usize,
    piles: Piles,
    hands: [Vec<Card>; 2],
    top_card: Card,
    current_player: Player,
    game_over: bool,
    move_count: u64,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    /// Standard shuffled game from `seed`.
    pub fn new(seed: u64) -> Result<Self, GameError> {
        GameBuilder::new().with_seed(seed).build()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn top_card(&self) -> Card {
        self.top_card
    }

    pub fn hand(&self, player: Player) -> &[Card] {
        &self.hands[player.index()]
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Number of moves applied through either path since the deal.
    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn draw_pile_len(&self) -> usize {
        self.piles.draw_len()
    }

    pub fn discard_pile_len(&self) -> usize {
        self.piles.discard_len()
    }

    pub fn player_name(&self, player: Player) -> &str {
        &self.names[player.index()]
    }

    /// Size of the deck the game was dealt from.
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// Cards across both piles, the top card and both hands. Equals
    /// [`Game::deck_size`] for any sequence of moves.
    pub fn card_count(&self) -> usize {
        self.piles.draw_len()
            + self.piles.discard_len()
            + 1
            + self.hands.iter().map(Vec::len).sum::<usize>()
    }

    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(winner) => GameStatus::Finished { winner },
            None => GameStatus::InProgress,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        if !self.game_over {
            return None;
        }
        Player::BOTH
            .into_iter()
            .find(|player| self.hand(*player).is_empty())
    }

    pub fn state_view(&self, perspective: Player) -> GameStateView {
        let players = Player::BOTH.map(|player| PlayerPublicState {
            player,
            name: self.player_name(player).to_string(),
            hand_size: self.hand(player).len(),
            is_current: player == self.current_player,
        });
        GameStateView {
            status: self.status(),
            self_player: perspective,
            current_player: self.current_player,
            top_card: self.top_card,
            draw_pile_count: self.piles.draw_len(),
            discard_pile_count: self.piles.discard_len(),
            move_count: self.move_count,
            players,
            hand: self.hand(perspective).to_vec(),
        }
    }

    /// Moves `player` could make right now; empty once the game is over.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        if self.game_over {
            return Vec::new();
        }
        action::legal_moves(self.hand(player), &self.top_card)
    }

    /// Applies a locally decided move through the authoritative path.
    pub fn apply_move(&mut self, player: Player, mv: Move) -> MoveOutcome {
        match mv {
            Move::Play { card, chosen_color } => self.play_card(card, chosen_color, player),
            Move::Draw => self.player_draw_card(player),
        }
    }

    /// Mirrors a move the peer already committed through the replay path.
    pub fn apply_remote(&mut self, player: Player, mv: Move) -> MoveOutcome {
        match mv {
            Move::Play { card, chosen_color } => {
                self.apply_remote_move(card, chosen_color, player)
            }
            Move::Draw => self.apply_remote_draw(player),
        }
    }

    /// Authoritative play. Skip and Reverse flip the turn twice (net zero in a
    /// two-player game); every other card flips it once unless the game ended.
    pub fn play_card(&mut self, card: Card, chosen_color: Color, player: Player) -> MoveOutcome {
        if self.game_over {
            return self.ignore(player, IgnoreReason::GameOver);
        }
        if !card.is_playable_on(&self.top_card) {
            return self.ignore(
                player,
                IgnoreReason::NotPlayable {
                    card,
                    top: self.top_card,
                },
            );
        }
        if !self.hand(player).contains(&card) {
            return self.ignore(player, IgnoreReason::NotInHand(card));
        }
        if card.rank().is_wild() && chosen_color.is_wild() {
            return self.ignore(player, IgnoreReason::UnresolvedWild(card));
        }

        self.place_card(card, chosen_color, player);
        if card.rank().skips_opponent() {
            self.switch_turn();
        }
        self.check_game_over();
        if !self.game_over {
            self.switch_turn();
        }
        self.move_count += 1;
        debug!(%player, %card, top = %self.top_card, next = %self.current_player, "card played");
        MoveOutcome::Applied
    }

    /// Replay of a peer's play. Validates by hand containment (wild cards are
    /// trusted even when absent) and never touches `current_player`.
    pub fn apply_remote_move(
        &mut self,
        card: Card,
        chosen_color: Color,
        player: Player,
    ) -> MoveOutcome {
        if self.game_over {
            return self.ignore(player, IgnoreReason::GameOver);
        }
        if !card.is_wild() && !self.hand(player).contains(&card) {
            return self.ignore(player, IgnoreReason::NotInHand(card));
        }
        if card.rank().is_wild() && chosen_color.is_wild() {
            return self.ignore(player, IgnoreReason::UnresolvedWild(card));
        }

        self.place_card(card, chosen_color, player);
        self.check_game_over();
        self.move_count += 1;
        debug!(%player, %card, top = %self.top_card, "remote card replayed");
        MoveOutcome::Applied
    }

    /// Authoritative draw: one card (if any is left), then the turn passes.
    pub fn player_draw_card(&mut self, player: Player) -> MoveOutcome {
        if self.game_over {
            return self.ignore(player, IgnoreReason::GameOver);
        }
        self.draw_into(player, 1);
        self.switch_turn();
        self.move_count += 1;
        debug!(%player, next = %self.current_player, "card drawn");
        MoveOutcome::Applied
    }

    /// Replay of a peer's draw; the turn is left alone.
    pub fn apply_remote_draw(&mut self, player: Player) -> MoveOutcome {
        if self.game_over {
            return self.ignore(player, IgnoreReason::GameOver);
        }
        self.draw_into(player, 1);
        self.move_count += 1;
        debug!(%player, "remote draw replayed");
        MoveOutcome::Applied
    }

    /// Plays one turn for the built-in opponent in the current seat: the first
    /// playable card in hand order, or a draw when nothing fits.
    pub fn perform_ai_turn(&mut self) -> Option<Move> {
        if self.game_over {
            return None;
        }
        let player = self.current_player;
        let view = self.state_view(player);
        let legal_moves = self.legal_moves(player);
        let mv = FirstPlayableBot.select_move(&view, &legal_moves);
        self.apply_move(player, mv).is_applied().then_some(mv)
    }

    /// True iff `player` holds exactly one card.
    pub fn can_press_uno(&self, player: Player) -> bool {
        self.hand(player).len() == 1
    }

    /// Calling UNO with anything but exactly one card costs two cards.
    pub fn press_uno(&mut self, player: Player) -> UnoCall {
        if self.game_over {
            return UnoCall::Ignored;
        }
        if self.can_press_uno(player) {
            debug!(%player, "uno called");
            return UnoCall::Safe;
        }
        let drawn = self.draw_into(player, UNO_PENALTY);
        debug!(%player, drawn, "false uno call penalized");
        UnoCall::Penalized { drawn }
    }

    /// Hands turn ownership to `player` as announced by the peer that made the
    /// last move. The replay operations never do this themselves.
    ///
    /// Applies after game over too: a Skip or Reverse that empties the hand
    /// still flipped the sender's turn once.
    pub fn adopt_turn(&mut self, player: Player) {
        if self.current_player == player {
            return;
        }
        debug!(from = %self.current_player, to = %player, "adopting peer turn");
        self.current_player = player;
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder { config, deck } = builder;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let deck = if let Some(deck) = deck {
            deck
        } else {
            let mut deck = full_deck();
            deck.shuffle(&mut rng);
            deck
        };
        let minimum = HAND_SIZE * 2 + 1;
        if deck.len() < minimum {
            return Err(GameError::DeckTooSmall {
                minimum,
                actual: deck.len(),
            });
        }
        let deck_size = deck.len();

        let mut piles = Piles::new(deck, rng);
        let mut hands: [Vec<Card>; 2] = [Vec::with_capacity(HAND_SIZE), Vec::with_capacity(HAND_SIZE)];
        for _ in 0..HAND_SIZE {
            for hand in hands.iter_mut() {
                hand.push(piles.draw().ok_or(GameError::InvalidConfiguration(
                    "deck exhausted while dealing hands",
                ))?);
            }
        }
        let top_card = piles.draw_initial_top().ok_or(GameError::InvalidConfiguration(
            "deck holds no colored card for the opening top card",
        ))?;

        info!(seed = config.seed, %top_card, "new game dealt");
        Ok(Game {
            names: config.names,
            seed: config.seed,
            deck_size,
            piles,
            hands,
            top_card,
            current_player: Player::One,
            game_over: false,
            move_count: 0,
        })
    }

    /// Effects shared by both paths: hand removal, discard push and the rank
    /// effect. Turn ownership is left to the caller.
    fn place_card(&mut self, card: Card, chosen_color: Color, player: Player) {
        let hand = &mut self.hands[player.index()];
        if let Some(position) = hand.iter().position(|held| *held == card) {
            hand.remove(position);
        }
        self.piles.discard(self.top_card);
        self.top_card = card;

        match card.rank() {
            Rank::DrawTwo => {
                self.draw_into(player.other(), DRAW_TWO_PENALTY);
            }
            Rank::Wild => {
                self.top_card = card.with_color(chosen_color);
            }
            Rank::WildDrawFour => {
                self.top_card = card.with_color(chosen_color);
                self.draw_into(player.other(), DRAW_FOUR_PENALTY);
            }
            Rank::Skip | Rank::Reverse | Rank::Number(_) => {}
        }
    }

    /// Draws up to `count` cards into `player`'s hand, returning how many arrived.
    fn draw_into(&mut self, player: Player, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            match self.piles.draw() {
                Some(card) => {
                    self.hands[player.index()].push(card);
                    drawn += 1;
                }
                None => {
                    debug!(%player, "draw and discard piles exhausted");
                    break;
                }
            }
        }
        drawn
    }

    fn switch_turn(&mut self) {
        self.current_player = self.current_player.other();
    }

    fn check_game_over(&mut self) {
        if self.hands.iter().any(Vec::is_empty) {
            self.game_over = true;
            info!(winner = ?self.winner(), moves = self.move_count + 1, "game over");
        }
    }

    fn ignore(&self, player: Player, reason: IgnoreReason) -> MoveOutcome {
        debug!(%player, ?reason, "move ignored");
        MoveOutcome::Ignored(reason)
    }
}
