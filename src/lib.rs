//! Heads Up - a tilt-to-answer charades party game
//!
//! Core modules:
//! - `round`: Round controller (deck, phases, score, clock, input lock)
//! - `scheduler`: Cancellable one-shot and periodic tasks on a driven clock
//! - `sensor`: Tilt sensor seam and gesture detection
//! - `session`: Game screen host turning time and input into events
//! - `bank`: Question bank loaded from JSON
//! - `settings`: Mode/target preferences
//! - `history`: Finished round records
//! - `web`: Browser bindings (wasm32 only)

pub mod bank;
pub mod error;
pub mod history;
pub mod round;
pub mod scheduler;
pub mod sensor;
pub mod session;
pub mod settings;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bank::QuestionBank;
pub use error::{RoundError, StorageError};
pub use history::RoundHistory;
pub use round::{RoundConfig, RoundController, RoundPhase};
pub use session::{GameSession, SessionEvent};
pub use settings::{GameMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Game tick interval while a round is active (10 Hz)
    pub const TICK_INTERVAL: f64 = 0.1;
    /// Sensor poll interval while a round is active
    pub const SENSOR_POLL_INTERVAL: f64 = 0.1;
    /// Spacing between the 3, 2, 1, GO prep steps
    pub const PREP_STEP_INTERVAL: f64 = 1.0;
    /// Number of prep steps before the round goes active (3, 2, 1, GO)
    pub const PREP_STEPS: u8 = 4;
    /// Hold on "GO!" before questions appear
    pub const GO_HOLD: f64 = 0.5;
    /// How long the result stays up before returning to the question bank
    pub const RESULT_HOLD: f64 = 4.0;

    /// Vertical acceleration (m/s²) that counts as a deliberate tilt
    pub const TILT_THRESHOLD: f32 = 7.0;
    /// Re-trigger suppression after a tilt gesture
    pub const TILT_COOLDOWN: f64 = 1.5;

    /// Slack when comparing accumulated tick time against zero
    pub const TIME_EPSILON: f64 = 1e-9;
}
