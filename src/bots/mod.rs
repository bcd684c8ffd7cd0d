pub mod first_playable;
pub mod human;
pub mod random;

pub use first_playable::FirstPlayableBot;
pub use human::{Command, HumanBot};
pub use random::RandomBot;
