use unoduel::card::HAND_SIZE;
use unoduel::{
    Bot, Card, Color, FirstPlayableBot, Game, GameBuilder, GameError, IgnoreReason, Move,
    MoveOutcome, Player, Rank,
};

fn stacked_deck(one: &[Card], two: &[Card], top: Card, draw: &[Card]) -> Vec<Card> {
    let mut deck = draw.to_vec();
    deck.push(top);
    for index in (0..HAND_SIZE).rev() {
        deck.push(two[index]);
        deck.push(one[index]);
    }
    deck
}

fn mirrored(one: &[Card], two: &[Card], top: Card, draw: &[Card]) -> Result<(Game, Game), GameError> {
    let game = GameBuilder::new()
        .with_deck(stacked_deck(one, two, top, draw))
        .build()?;
    Ok((game.clone(), game))
}

fn assert_same_cards(local: &Game, replica: &Game) {
    assert_eq!(local.hand(Player::One), replica.hand(Player::One));
    assert_eq!(local.hand(Player::Two), replica.hand(Player::Two));
    assert_eq!(local.top_card(), replica.top_card());
    assert_eq!(local.draw_pile_len(), replica.draw_pile_len());
    assert_eq!(local.discard_pile_len(), replica.discard_pile_len());
    assert_eq!(local.is_game_over(), replica.is_game_over());
    assert_eq!(local.move_count(), replica.move_count());
}

fn hand(cards: [Card; 3]) -> [Card; HAND_SIZE] {
    [
        cards[0],
        cards[1],
        cards[2],
        Card::number(Color::Blue, 1),
        Card::number(Color::Blue, 2),
        Card::number(Color::Blue, 3),
        Card::number(Color::Blue, 4),
    ]
}

fn greens() -> [Card; HAND_SIZE] {
    [1, 2, 3, 4, 6, 7, 8].map(|value| Card::number(Color::Green, value))
}

#[test]
fn replayed_draw_two_matches_authoritative_play() -> Result<(), GameError> {
    let draw_two = Card::new(Color::Red, Rank::DrawTwo);
    let one = hand([draw_two, Card::number(Color::Red, 9), Card::number(Color::Yellow, 0)]);
    let draw = [Card::number(Color::Yellow, 5), Card::number(Color::Yellow, 6)];
    let (mut local, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &draw)?;

    assert!(local.play_card(draw_two, Color::Red, Player::One).is_applied());
    assert!(replica.apply_remote_move(draw_two, Color::Red, Player::One).is_applied());

    assert_same_cards(&local, &replica);
    assert_eq!(replica.hand(Player::Two).len(), HAND_SIZE + 2);
    assert_eq!(local.current_player(), Player::Two);
    assert_eq!(replica.current_player(), Player::One);
    Ok(())
}

#[test]
fn replayed_wild_draw_four_binds_the_same_color() -> Result<(), GameError> {
    let one = hand([Card::wild_draw_four(), Card::number(Color::Red, 9), Card::number(Color::Yellow, 0)]);
    let draw = [1, 2, 3, 4].map(|value| Card::number(Color::Yellow, value));
    let (mut local, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &draw)?;

    let mv = Move::play_wild(Card::wild_draw_four(), Color::Blue);
    assert!(local.apply_move(Player::One, mv).is_applied());
    assert!(replica.apply_remote(Player::One, mv).is_applied());

    assert_same_cards(&local, &replica);
    assert_eq!(replica.top_card(), Card::new(Color::Blue, Rank::WildDrawFour));
    Ok(())
}

#[test]
fn replay_never_moves_the_turn() -> Result<(), GameError> {
    let one = hand([
        Card::number(Color::Red, 9),
        Card::new(Color::Red, Rank::Skip),
        Card::number(Color::Yellow, 0),
    ]);
    let (_, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &[])?;

    assert!(replica.apply_remote_move(Card::number(Color::Red, 9), Color::Red, Player::One).is_applied());
    assert_eq!(replica.current_player(), Player::One);
    assert!(replica.apply_remote_move(Card::new(Color::Red, Rank::Skip), Color::Red, Player::One).is_applied());
    assert_eq!(replica.current_player(), Player::One);
    assert!(replica.apply_remote_draw(Player::Two).is_applied());
    assert_eq!(replica.current_player(), Player::One);
    assert_eq!(replica.move_count(), 3);
    Ok(())
}

#[test]
fn replay_skips_the_playability_check() -> Result<(), GameError> {
    // The peer already validated the move against its own top card.
    let one = hand([Card::number(Color::Yellow, 0), Card::number(Color::Red, 9), Card::number(Color::Red, 8)]);
    let (_, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &[])?;
    let outcome = replica.apply_remote_move(Card::number(Color::Yellow, 0), Color::Yellow, Player::One);
    assert!(outcome.is_applied());
    assert_eq!(replica.top_card(), Card::number(Color::Yellow, 0));
    Ok(())
}

#[test]
fn replayed_card_missing_from_hand_is_ignored() -> Result<(), GameError> {
    let one = hand([Card::number(Color::Red, 9), Card::number(Color::Red, 8), Card::number(Color::Red, 7)]);
    let (_, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &[])?;
    let outcome = replica.apply_remote_move(Card::number(Color::Red, 0), Color::Red, Player::One);
    assert_eq!(
        outcome,
        MoveOutcome::Ignored(IgnoreReason::NotInHand(Card::number(Color::Red, 0)))
    );
    assert_eq!(replica.move_count(), 0);
    assert_eq!(replica.top_card(), Card::number(Color::Red, 5));
    Ok(())
}

#[test]
fn replayed_wild_is_trusted_even_when_absent() -> Result<(), GameError> {
    let one = hand([Card::number(Color::Red, 9), Card::number(Color::Red, 8), Card::number(Color::Red, 7)]);
    let (_, mut replica) = mirrored(&one, &greens(), Card::number(Color::Red, 5), &[])?;
    let outcome = replica.apply_remote_move(Card::wild(), Color::Green, Player::One);
    assert!(outcome.is_applied());
    assert_eq!(replica.top_card(), Card::new(Color::Green, Rank::Wild));
    assert_eq!(replica.hand(Player::One).len(), HAND_SIZE);
    Ok(())
}

#[test]
fn replayed_last_card_skip_adopts_the_final_turn() -> Result<(), GameError> {
    let skip = Card::new(Color::Red, Rank::Skip);
    let (mut local, mut replica) = mirrored(&[skip; HAND_SIZE], &greens(), Card::number(Color::Red, 5), &[])?;

    for _ in 0..HAND_SIZE {
        assert!(local.play_card(skip, Color::Red, Player::One).is_applied());
        assert!(replica.apply_remote_move(skip, Color::Red, Player::One).is_applied());
        replica.adopt_turn(local.current_player());
        assert_same_cards(&local, &replica);
    }
    assert!(replica.is_game_over());
    assert_eq!(local.current_player(), Player::Two);
    assert_eq!(replica.current_player(), Player::Two);
    assert_eq!(local.state_view(Player::One), replica.state_view(Player::One));
    assert_eq!(local.state_view(Player::Two), replica.state_view(Player::Two));
    Ok(())
}

#[test]
fn replay_with_adopted_turns_tracks_a_full_game() -> Result<(), GameError> {
    let mut local = Game::new(2024)?;
    let mut replica = Game::new(2024)?;
    let mut bot = FirstPlayableBot::new();

    for _ in 0..500 {
        if local.is_game_over() {
            break;
        }
        let player = local.current_player();
        let view = local.state_view(player);
        let mv = bot.select_move(&view, &local.legal_moves(player));
        assert!(local.apply_move(player, mv).is_applied());

        assert!(replica.apply_remote(player, mv).is_applied());
        replica.adopt_turn(local.current_player());

        assert_same_cards(&local, &replica);
        assert_eq!(local.current_player(), replica.current_player());
    }
    assert_eq!(local.winner(), replica.winner());
    Ok(())
}
