use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, info, warn};

use unoduel::{
    Bot, FirstPlayableBot, Game, GameError, Player, RandomBot, describe_move, render_state,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BotKind {
    /// First playable card in hand order
    First,
    /// Uniformly random legal move
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Run bot-versus-bot games and report who wins.")]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 100)]
    games: usize,

    /// Base RNG seed (deck + bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on moves per game; longer games are abandoned
    #[arg(long = "max-turns", default_value_t = 2_000)]
    max_turns: usize,

    /// Show the state and chosen move each turn
    #[arg(long = "visualize", action = ArgAction::SetTrue)]
    visualize: bool,

    /// Bot for seat one
    #[arg(long = "one", value_enum, default_value_t = BotKind::First)]
    one: BotKind,

    /// Bot for seat two
    #[arg(long = "two", value_enum, default_value_t = BotKind::Random)]
    two: BotKind,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let mut wins = [0usize; 2];
    let mut abandoned = 0usize;
    for index in 0..args.games {
        let seed = args.seed.wrapping_add(index as u64);
        let mut bots = [create_bot(args.one, seed, 1), create_bot(args.two, seed, 2)];
        match play_one(Game::new(seed)?, &mut bots, args)? {
            Some(winner) => wins[winner.number() as usize - 1] += 1,
            None => abandoned += 1,
        }
    }
    println!(
        "{} games: seat one ({:?}) won {}, seat two ({:?}) won {}, {} abandoned",
        args.games, args.one, wins[0], args.two, wins[1], abandoned
    );
    Ok(())
}

fn play_one(
    mut game: Game,
    bots: &mut [Box<dyn Bot>; 2],
    args: &Args,
) -> Result<Option<Player>, GameError> {
    for _ in 0..args.max_turns {
        if let Some(winner) = game.winner() {
            return Ok(Some(winner));
        }
        let current = game.current_player();
        let state = game.state_view(current);
        let legal_moves = game.legal_moves(current);
        if args.visualize {
            println!("{}", render_state(&state));
        }
        let mv = bots[current.number() as usize - 1].select_move(&state, &legal_moves);
        if args.visualize {
            println!("Chosen move: {}\n", describe_move(&mv));
        }
        if !game.apply_move(current, mv).is_applied() {
            return Err(GameError::InvalidConfiguration("bot chose a move the engine rejected"));
        }
        if game.card_count() != game.deck_size() {
            return Err(GameError::InvalidConfiguration("card count drifted during play"));
        }
    }
    if game.is_game_over() {
        return Ok(game.winner());
    }
    warn!(seed = game.seed(), "move limit reached; game abandoned");
    Ok(None)
}

fn create_bot(kind: BotKind, seed: u64, seat: u64) -> Box<dyn Bot> {
    match kind {
        BotKind::First => Box::new(FirstPlayableBot::new()),
        BotKind::Random => {
            let seed = seed ^ (seat * 0x9E37_79B9);
            info!(seed, seat, "random bot seeded");
            Box::new(RandomBot::new(StdRng::seed_from_u64(seed)))
        }
    }
}
