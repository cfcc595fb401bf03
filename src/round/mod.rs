//! Round controller module
//!
//! Everything about a single round lives here. Like a simulation step it is
//! pure: time only advances through `tick`, randomness comes from a seeded
//! RNG, and there are no platform dependencies.

pub mod config;
pub mod controller;
pub mod deck;
pub mod state;

pub use config::{COUNTDOWN_PRESETS, RoundConfig, SCORE_TARGET_PRESETS};
pub use controller::RoundController;
pub use deck::QuestionDeck;
pub use state::{AnswerOutcome, PrepStep, RoundPhase, RoundState, RoundSummary};
