use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tokio::runtime::Handle;
use tracing::Level;

use unoduel::bots::Command;
use unoduel::session::{self, SessionHandle};
use unoduel::{
    GameBuilder, HumanBot, Opponent, PeerChannel, Player, SessionConfig, SessionEnd,
    render_state,
};

const DEFAULT_PORT: u16 = 5_555;

#[derive(Parser, Debug)]
#[command(name = "uno", about = "Two-player UNO against the built-in opponent or a peer.")]
struct Args {
    /// Name shown to the other player
    #[arg(short = 'n', long = "name", default_value = "Player")]
    name: String,

    /// Log more (-v info, -vv debug); logs go to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play against the built-in opponent
    Ai {
        /// Deck shuffle seed (random when omitted)
        #[arg(short = 's', long = "seed")]
        seed: Option<u64>,

        /// Pause before each opponent move, in milliseconds
        #[arg(long = "delay-ms", default_value_t = 500)]
        delay_ms: u64,
    },
    /// Wait for a peer to join; the host plays first
    Host {
        #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Deck shuffle seed shared with the peer (random when omitted)
        #[arg(short = 's', long = "seed")]
        seed: Option<u64>,
    },
    /// Join a hosted game
    Join {
        #[arg(long = "host", default_value = "127.0.0.1")]
        host: String,

        #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (game, config, opponent) = match args.mode {
        Mode::Ai { seed, delay_ms } => {
            let game = GameBuilder::new()
                .with_seed(seed.unwrap_or_else(rand::random))
                .with_names(args.name.clone(), "AI")
                .build()?;
            let config = SessionConfig {
                bot_delay: Duration::from_millis(delay_ms),
                ..SessionConfig::default()
            };
            (game, config, Opponent::BuiltIn)
        }
        Mode::Host { port, seed } => {
            println!("Waiting for an opponent on port {port}...");
            let peer = PeerChannel::listen(port)
                .await
                .with_context(|| format!("failed to host on port {port}"))?;
            let seed = seed.unwrap_or_else(rand::random);
            let game = session::host_game(&peer, seed, &args.name).await?;
            let config = SessionConfig {
                local: Player::One,
                ..SessionConfig::default()
            };
            (game, config, Opponent::Peer(Arc::new(peer)))
        }
        Mode::Join { host, port } => {
            let peer = PeerChannel::connect(&host, port)
                .await
                .with_context(|| format!("failed to connect to {host}:{port}"))?;
            let game = session::join_game(&peer, &args.name).await?;
            let config = SessionConfig {
                local: Player::Two,
                ..SessionConfig::default()
            };
            (game, config, Opponent::Peer(Arc::new(peer)))
        }
    };

    let (handle, task) = session::spawn(game, config, opponent);
    // Detached: a thread parked on stdin must not hold up process exit.
    let prompt_handle = handle.clone();
    let runtime = Handle::current();
    let name = args.name.clone();
    thread::spawn(move || prompt_loop(prompt_handle, runtime, name));

    let end = task.await.context("session task panicked")??;
    let view = handle.state();
    println!("\n{}", render_state(&view));
    match end {
        SessionEnd::Finished { winner } => {
            println!("Game over. {} wins!", view.player(winner).name);
        }
        SessionEnd::PeerClosed => println!("Opponent disconnected."),
        SessionEnd::Shutdown => println!("Game abandoned."),
    }
    Ok(())
}

/// Prompts whenever the local seat holds the turn.
fn prompt_loop(handle: SessionHandle, runtime: Handle, name: String) {
    let mut human = HumanBot::new(name);
    let mut state = handle.subscribe();
    loop {
        let view = match runtime.block_on(state.wait_for(|view| view.is_my_turn() || view.is_game_over())) {
            Ok(view) => view.clone(),
            Err(_) => return,
        };
        if view.is_game_over() {
            return;
        }
        let legal_moves = view.legal_moves();
        let submitted = match human.prompt(&view, &legal_moves) {
            Command::Move(mv) => handle.blocking_submit(mv),
            Command::CallUno => handle.blocking_call_uno(),
            Command::Quit => {
                let _ = runtime.block_on(handle.shutdown());
                return;
            }
        };
        // Re-prompt only once the session has processed the intent.
        if submitted.is_err() || runtime.block_on(state.changed()).is_err() {
            return;
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
