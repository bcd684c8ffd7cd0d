use std::fmt::Write;

use crate::action::Move;
use crate::state::{GameStateView, GameStatus};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_hand_indices: bool,
    pub show_pile_counts: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_hand_indices: true,
            show_pile_counts: true,
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::InProgress => String::from("In progress"),
        GameStatus::Finished { winner } => {
            format!("{} wins!", state.player(winner).name)
        }
    };
    let _ = writeln!(out, "Game status: {status}");
    let current = &state.player(state.current_player).name;
    let _ = writeln!(
        out,
        "Turn: {current}{}",
        if state.is_my_turn() { " (You)" } else { "" }
    );
    let _ = writeln!(out, "Top card: {}", state.top_card);
    if options.show_pile_counts {
        let _ = writeln!(
            out,
            "Draw pile: {}  |  Discard pile: {}",
            state.draw_pile_count, state.discard_pile_count
        );
    }
    let opponent = state.opponent();
    let _ = writeln!(out, "{}: {} cards", opponent.name, opponent.hand_size);
    if state.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else {
        let entries = state
            .hand
            .iter()
            .enumerate()
            .map(|(idx, card)| {
                if options.show_hand_indices {
                    format!("{idx}:{card}")
                } else {
                    card.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "Hand: {entries}");
    }
    out
}

pub fn describe_move(mv: &Move) -> String {
    match mv {
        Move::Play { card, chosen_color } if card.rank().is_wild() => {
            format!("Play {card} as {chosen_color}")
        }
        Move::Play { card, .. } => format!("Play {card}"),
        Move::Draw => String::from("Draw a card"),
    }
}
