//! Memory game match engine
//!
//! - `deck`: themes, difficulties and shuffled deals
//! - `round`: the flip/match/mismatch state machine and scoring
//! - `session`: timed resolution of pairs on the tokio runtime

pub mod deck;
pub mod round;
pub mod session;

pub use deck::{Card, Deck, Difficulty, Theme};
pub use round::{format_clock, MatchOutcome, Resolution, Round, Selection};
pub use session::{MatchSession, Phase, RoundSnapshot};
