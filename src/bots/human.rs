use std::io::{self, BufRead, Write};

use crate::action::Move;
use crate::bot::Bot;
use crate::state::GameStateView;
use crate::visualize::{describe_move, render_state};

/// What a human typed at the prompt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Move(Move),
    CallUno,
    Quit,
}

/// Interactive bot that queries a human via standard input.
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Shows the state and legal moves, then reads lines until one parses.
    /// End of input counts as quitting.
    pub fn prompt(&mut self, state: &GameStateView, legal_moves: &[Move]) -> Command {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        loop {
            println!("\n=== {}'s turn ===", self.name);
            println!("{}", render_state(state));
            println!("Available moves:");
            for (index, mv) in legal_moves.iter().enumerate() {
                println!("  [{index}] {}", describe_move(mv));
            }
            println!("Type the move index, 'uno', 'help' or 'q' to quit.");
            print!("Selection: ");
            if io::stdout().flush().is_err() {
                eprintln!("failed to flush stdout");
            }
            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => return Command::Quit,
                Ok(_) => {}
                Err(_) => {
                    eprintln!("failed to read input");
                    continue;
                }
            }
            match parse_command(line.trim(), legal_moves) {
                Some(command) => return command,
                None if line.trim().eq_ignore_ascii_case("help") => {
                    println!("Enter the number next to the move you want to make.");
                    println!("Call 'uno' when you hold a single card; a false call draws two.");
                }
                None => println!("Invalid input: '{}'. Please enter a listed number.", line.trim()),
            }
        }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

impl Bot for HumanBot {
    fn select_move(&mut self, state: &GameStateView, legal_moves: &[Move]) -> Move {
        loop {
            match self.prompt(state, legal_moves) {
                Command::Move(mv) => return mv,
                Command::CallUno => println!("UNO can't be called from here; pick a move."),
                Command::Quit => {
                    println!("Exiting game at user's request.");
                    std::process::exit(0);
                }
            }
        }
    }
}

/// Parses a prompt line: a move index, `uno`, or `q`/`quit`.
pub fn parse_command(input: &str, legal_moves: &[Move]) -> Option<Command> {
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }
    if input.eq_ignore_ascii_case("uno") {
        return Some(Command::CallUno);
    }
    let choice = input.parse::<usize>().ok()?;
    legal_moves.get(choice).copied().map(Command::Move)
}
