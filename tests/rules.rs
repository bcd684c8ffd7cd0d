use unoduel::card::{self, DECK_SIZE, HAND_SIZE};
use unoduel::{
    Card, Color, Game, GameBuilder, GameError, GameStatus, IgnoreReason, Move, MoveOutcome,
    Player, Rank, UnoCall,
};

/// Lays out a deck so that dealing gives `one` and `two` (in order), then `top`,
/// leaving `draw` as the draw pile (its last card is drawn first).
fn stacked_deck(one: &[Card], two: &[Card], top: Card, draw: &[Card]) -> Vec<Card> {
    assert_eq!(one.len(), HAND_SIZE);
    assert_eq!(two.len(), HAND_SIZE);
    let mut deck = draw.to_vec();
    deck.push(top);
    for index in (0..HAND_SIZE).rev() {
        deck.push(two[index]);
        deck.push(one[index]);
    }
    deck
}

fn filler(color: Color) -> [Card; HAND_SIZE] {
    [
        Card::number(color, 1),
        Card::number(color, 2),
        Card::number(color, 3),
        Card::number(color, 4),
        Card::number(color, 6),
        Card::number(color, 7),
        Card::number(color, 8),
    ]
}

fn game_with(one: &[Card], two: &[Card], top: Card, draw: &[Card]) -> Result<Game, GameError> {
    Game::builder()
        .with_deck(stacked_deck(one, two, top, draw))
        .build()
}

fn snapshot(game: &Game) -> (Vec<Card>, Vec<Card>, Card, Player, usize, usize, bool, u64) {
    (
        game.hand(Player::One).to_vec(),
        game.hand(Player::Two).to_vec(),
        game.top_card(),
        game.current_player(),
        game.draw_pile_len(),
        game.discard_pile_len(),
        game.is_game_over(),
        game.move_count(),
    )
}

#[test]
fn initial_setup_deals_seven_each() -> Result<(), GameError> {
    let game = Game::new(42)?;
    assert_eq!(game.hand(Player::One).len(), HAND_SIZE);
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE);
    assert_eq!(game.draw_pile_len(), DECK_SIZE - 2 * HAND_SIZE - 1);
    assert_eq!(game.discard_pile_len(), 0);
    assert!(!game.top_card().is_wild());
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.card_count(), DECK_SIZE);
    assert_eq!(game.status(), GameStatus::InProgress);
    Ok(())
}

#[test]
fn same_seed_deals_identical_games() -> Result<(), GameError> {
    let a = Game::new(7)?;
    let b = Game::new(7)?;
    assert_eq!(snapshot(&a), snapshot(&b));
    Ok(())
}

#[test]
fn opening_top_card_is_never_wild() -> Result<(), GameError> {
    let one = filler(Color::Red);
    let two = filler(Color::Blue);
    let draw = [Card::number(Color::Green, 9)];
    // A wild lands on top first and must be put back.
    let deck = stacked_deck(&one, &two, Card::wild(), &draw);
    let game = GameBuilder::new().with_deck(deck).build()?;
    assert_eq!(game.top_card(), Card::number(Color::Green, 9));
    assert_eq!(game.draw_pile_len(), 1);
    Ok(())
}

#[test]
fn deck_too_small_is_rejected() {
    let result = GameBuilder::new().with_deck(card::full_deck()[..10].to_vec()).build();
    assert!(matches!(
        result,
        Err(GameError::DeckTooSmall { minimum: 15, actual: 10 })
    ));
}

#[test]
fn unplayable_card_leaves_state_unchanged() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[0] = Card::number(Color::Blue, 7);
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    let before = snapshot(&game);
    let outcome = game.play_card(Card::number(Color::Blue, 7), Color::Blue, Player::One);
    assert_eq!(
        outcome,
        MoveOutcome::Ignored(IgnoreReason::NotPlayable {
            card: Card::number(Color::Blue, 7),
            top: Card::number(Color::Red, 5),
        })
    );
    assert_eq!(snapshot(&game), before);
    Ok(())
}

#[test]
fn card_missing_from_hand_is_ignored() -> Result<(), GameError> {
    let mut game = game_with(
        &filler(Color::Blue),
        &filler(Color::Green),
        Card::number(Color::Red, 5),
        &[],
    )?;
    let before = snapshot(&game);
    let outcome = game.play_card(Card::number(Color::Red, 9), Color::Red, Player::One);
    assert_eq!(
        outcome,
        MoveOutcome::Ignored(IgnoreReason::NotInHand(Card::number(Color::Red, 9)))
    );
    assert_eq!(snapshot(&game), before);
    Ok(())
}

#[test]
fn skip_and_reverse_keep_the_turn() -> Result<(), GameError> {
    let mut one = filler(Color::Red);
    one[0] = Card::new(Color::Red, Rank::Skip);
    one[1] = Card::new(Color::Red, Rank::Reverse);
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;

    assert!(game.play_card(one[0], Color::Red, Player::One).is_applied());
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.top_card(), one[0]);

    assert!(game.play_card(one[1], Color::Red, Player::One).is_applied());
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.hand(Player::One).len(), HAND_SIZE - 2);
    assert_eq!(game.discard_pile_len(), 2);
    Ok(())
}

#[test]
fn number_card_passes_the_turn() -> Result<(), GameError> {
    let mut game = game_with(
        &filler(Color::Red),
        &filler(Color::Green),
        Card::number(Color::Red, 5),
        &[],
    )?;
    assert!(game.play_card(Card::number(Color::Red, 3), Color::Red, Player::One).is_applied());
    assert_eq!(game.current_player(), Player::Two);
    assert_eq!(game.top_card(), Card::number(Color::Red, 3));
    assert_eq!(game.move_count(), 1);
    Ok(())
}

#[test]
fn draw_two_feeds_opponent_and_passes_turn() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[3] = Card::new(Color::Red, Rank::DrawTwo);
    let draw = filler(Color::Yellow);
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &draw)?;

    let outcome = game.play_card(one[3], Color::Red, Player::One);
    assert!(outcome.is_applied());
    assert_eq!(game.top_card(), Card::new(Color::Red, Rank::DrawTwo));
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE + 2);
    assert_eq!(game.hand(Player::One).len(), HAND_SIZE - 1);
    assert_eq!(game.current_player(), Player::Two);
    // The two drawn cards come off the end of the draw pile.
    assert_eq!(&game.hand(Player::Two)[HAND_SIZE..], &[draw[6], draw[5]]);
    assert_eq!(game.card_count(), game.deck_size());
    Ok(())
}

#[test]
fn wild_binds_chosen_color() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[0] = Card::wild();
    let mut two = filler(Color::Green);
    two[0] = Card::number(Color::Yellow, 8);
    two[1] = Card::number(Color::Red, 0);
    let mut game = game_with(&one, &two, Card::number(Color::Red, 5), &[])?;

    assert!(game.play_card(Card::wild(), Color::Yellow, Player::One).is_applied());
    assert_eq!(game.top_card(), Card::new(Color::Yellow, Rank::Wild));
    assert_eq!(game.top_card().color(), Color::Yellow);
    assert_eq!(game.current_player(), Player::Two);

    // Red no longer fits; the chosen color does.
    let red = game.play_card(Card::number(Color::Red, 0), Color::Red, Player::Two);
    assert!(!red.is_applied());
    assert!(game.play_card(Card::number(Color::Yellow, 8), Color::Yellow, Player::Two).is_applied());
    Ok(())
}

#[test]
fn wild_without_color_is_refused() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[0] = Card::wild();
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    let before = snapshot(&game);
    let outcome = game.play_card(Card::wild(), Color::Wild, Player::One);
    assert_eq!(outcome, MoveOutcome::Ignored(IgnoreReason::UnresolvedWild(Card::wild())));
    assert_eq!(snapshot(&game), before);
    Ok(())
}

#[test]
fn wild_draw_four_binds_color_and_feeds_four() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[6] = Card::wild_draw_four();
    let draw = filler(Color::Yellow);
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &draw)?;

    assert!(game.play_card(Card::wild_draw_four(), Color::Green, Player::One).is_applied());
    assert_eq!(game.top_card(), Card::new(Color::Green, Rank::WildDrawFour));
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE + 4);
    assert_eq!(game.draw_pile_len(), draw.len() - 4);
    assert_eq!(game.current_player(), Player::Two);
    Ok(())
}

#[test]
fn empty_draw_pile_reshuffles_discard() -> Result<(), GameError> {
    let mut game = game_with(
        &filler(Color::Red),
        &filler(Color::Green),
        Card::number(Color::Red, 5),
        &[],
    )?;
    assert_eq!(game.draw_pile_len(), 0);
    assert!(game.play_card(Card::number(Color::Red, 1), Color::Red, Player::One).is_applied());
    assert_eq!(game.discard_pile_len(), 1);

    assert!(game.player_draw_card(Player::Two).is_applied());
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE + 1);
    assert_eq!(game.hand(Player::Two).last(), Some(&Card::number(Color::Red, 5)));
    assert_eq!(game.discard_pile_len(), 0);
    assert_eq!(game.draw_pile_len(), 0);
    assert_eq!(game.current_player(), Player::One);

    // Both piles are empty now: the draw yields nothing but the turn still passes.
    assert!(game.player_draw_card(Player::One).is_applied());
    assert_eq!(game.hand(Player::One).len(), HAND_SIZE - 1);
    assert_eq!(game.current_player(), Player::Two);
    assert_eq!(game.card_count(), game.deck_size());
    Ok(())
}

#[test]
fn draw_two_with_exhausted_piles_is_tolerated() -> Result<(), GameError> {
    let mut one = filler(Color::Red);
    one[0] = Card::new(Color::Red, Rank::DrawTwo);
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    assert!(game.play_card(one[0], Color::Red, Player::One).is_applied());
    // Only the old top card was available to draw.
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE + 1);
    assert_eq!(game.discard_pile_len(), 0);
    assert_eq!(game.card_count(), game.deck_size());
    Ok(())
}

#[test]
fn emptying_a_hand_ends_the_game_for_good() -> Result<(), GameError> {
    let skip = Card::new(Color::Red, Rank::Skip);
    let one = [skip, skip, skip, skip, skip, skip, Card::number(Color::Red, 3)];
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &filler(Color::Blue))?;

    for _ in 0..6 {
        assert!(game.play_card(skip, Color::Red, Player::One).is_applied());
        assert!(!game.is_game_over());
    }
    assert!(game.can_press_uno(Player::One));
    assert!(game.play_card(Card::number(Color::Red, 3), Color::Red, Player::One).is_applied());
    assert!(game.is_game_over());
    assert_eq!(game.winner(), Some(Player::One));
    assert_eq!(game.status(), GameStatus::Finished { winner: Player::One });
    // No flip once the game is over.
    assert_eq!(game.current_player(), Player::One);

    let frozen = snapshot(&game);
    assert_eq!(
        game.play_card(Card::number(Color::Green, 3), Color::Green, Player::Two),
        MoveOutcome::Ignored(IgnoreReason::GameOver)
    );
    assert!(!game.player_draw_card(Player::Two).is_applied());
    assert!(!game.apply_remote_draw(Player::Two).is_applied());
    assert!(!game.apply_remote_move(Card::number(Color::Green, 3), Color::Green, Player::Two).is_applied());
    assert_eq!(game.press_uno(Player::Two), UnoCall::Ignored);
    assert_eq!(game.perform_ai_turn(), None);
    assert_eq!(snapshot(&game), frozen);
    assert!(game.legal_moves(Player::Two).is_empty());
    Ok(())
}

#[test]
fn last_card_skip_flips_once_and_turn_can_still_be_adopted() -> Result<(), GameError> {
    let skip = Card::new(Color::Red, Rank::Skip);
    let mut game = game_with(&[skip; HAND_SIZE], &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    for _ in 0..HAND_SIZE {
        assert!(game.play_card(skip, Color::Red, Player::One).is_applied());
    }
    assert_eq!(game.winner(), Some(Player::One));
    assert_eq!(game.current_player(), Player::Two);

    game.adopt_turn(Player::One);
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.winner(), Some(Player::One));
    Ok(())
}

#[test]
fn uno_call_penalizes_unless_one_card_left() -> Result<(), GameError> {
    let mut game = game_with(
        &filler(Color::Red),
        &filler(Color::Green),
        Card::number(Color::Red, 5),
        &filler(Color::Blue),
    )?;
    assert!(!game.can_press_uno(Player::Two));
    assert_eq!(game.press_uno(Player::Two), UnoCall::Penalized { drawn: 2 });
    assert_eq!(game.hand(Player::Two).len(), HAND_SIZE + 2);
    // Calling UNO is not a move: turn and move count stay put.
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.move_count(), 0);
    Ok(())
}

#[test]
fn uno_call_with_one_card_is_safe() -> Result<(), GameError> {
    let skip = Card::new(Color::Red, Rank::Skip);
    let one = [skip, skip, skip, skip, skip, skip, Card::number(Color::Red, 3)];
    let mut game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    for _ in 0..6 {
        assert!(game.play_card(skip, Color::Red, Player::One).is_applied());
    }
    assert_eq!(game.press_uno(Player::One), UnoCall::Safe);
    assert_eq!(game.hand(Player::One).len(), 1);
    Ok(())
}

#[test]
fn legal_moves_list_wilds_per_color_and_end_with_draw() -> Result<(), GameError> {
    let mut one = filler(Color::Blue);
    one[0] = Card::number(Color::Red, 9);
    one[1] = Card::wild();
    one[2] = Card::number(Color::Red, 9);
    let game = game_with(&one, &filler(Color::Green), Card::number(Color::Red, 5), &[])?;
    let moves = game.legal_moves(Player::One);
    assert_eq!(
        moves,
        vec![
            Move::play(Card::number(Color::Red, 9)),
            Move::play_wild(Card::wild(), Color::Red),
            Move::play_wild(Card::wild(), Color::Yellow),
            Move::play_wild(Card::wild(), Color::Green),
            Move::play_wild(Card::wild(), Color::Blue),
            Move::Draw,
        ]
    );
    Ok(())
}
