//! Round state and the values the controller hands back to its host

use serde::{Deserialize, Serialize};

use super::config::RoundConfig;

/// Lifecycle stage of a round. Ordering follows play order, and a round
/// never moves to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Category chosen, deck shuffled, waiting for the 3-2-1
    Prep,
    /// Showing 3, 2, 1, GO
    Countdown321,
    /// Questions on screen, clock running
    Active,
    /// Round finished, state frozen
    Over,
}

/// One step of the pre-round countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepStep {
    Count(u8),
    Go,
}

/// Mutable state of the round in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    /// Correct answers so far
    pub score: u32,
    /// Seconds left (countdown rounds only, zero otherwise)
    pub remaining: f64,
    /// Seconds spent in the active phase
    pub elapsed: f64,
    /// Suppresses answers during a gesture cooldown
    pub input_locked: bool,
    /// Next number to show in the 3-2-1 (0 means GO is next)
    pub prep_remaining: u8,
    /// Questions answered or skipped
    pub questions_seen: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Prep,
            score: 0,
            remaining: 0.0,
            elapsed: 0.0,
            input_locked: false,
            prep_remaining: 3,
            questions_seen: 0,
        }
    }
}

impl RoundState {
    /// Fresh state for a round with the given config
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            remaining: config.initial_remaining(),
            ..Self::default()
        }
    }
}

/// Result of an answer (button press or tilt)
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Round continues with this question
    Next(String),
    /// The answer finished the round
    Finished(RoundSummary),
    /// Input was locked; nothing changed
    Suppressed,
}

/// Frozen result of a finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub category: String,
    pub config: RoundConfig,
    pub score: u32,
    /// Seconds spent in the active phase
    pub elapsed: f64,
    /// True when a score target round reached its goal
    pub target_reached: bool,
    pub questions_seen: u32,
}

impl RoundSummary {
    /// Result text shown when the round ends
    pub fn message(&self) -> String {
        match self.config {
            RoundConfig::Countdown { .. } => format!("Time's up!\nFinal score: {}", self.score),
            RoundConfig::ScoreTarget { .. } => {
                format!("Challenge complete!\nTime: {:.1} s", self.elapsed)
            }
        }
    }
}
