//! Round configuration
//!
//! A round is either played against the clock or until a number of correct
//! answers is reached. The target travels with the mode so every decision
//! point matches on one value.

use serde::{Deserialize, Serialize};

use crate::error::RoundError;

/// Round lengths offered for countdown rounds (seconds)
pub const COUNTDOWN_PRESETS: [u32; 4] = [30, 60, 90, 120];
/// Correct-answer goals offered for score target rounds
pub const SCORE_TARGET_PRESETS: [u32; 4] = [5, 10, 15, 20];

/// How a round ends and what it is measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundConfig {
    /// Guess as many as possible before the clock runs out
    Countdown { seconds: f64 },
    /// Race to `count` correct answers, timed
    ScoreTarget { count: u32 },
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig::Countdown { seconds: 60.0 }
    }
}

impl RoundConfig {
    pub fn countdown(seconds: f64) -> Result<Self, RoundError> {
        let config = RoundConfig::Countdown { seconds };
        config.validate()?;
        Ok(config)
    }

    pub fn score_target(count: u32) -> Result<Self, RoundError> {
        let config = RoundConfig::ScoreTarget { count };
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive or non-finite targets
    pub fn validate(&self) -> Result<(), RoundError> {
        match *self {
            RoundConfig::Countdown { seconds } => {
                if !seconds.is_finite() || seconds <= 0.0 {
                    return Err(RoundError::InvalidConfig(format!(
                        "countdown length must be a positive number of seconds, got {seconds}"
                    )));
                }
            }
            RoundConfig::ScoreTarget { count } => {
                if count == 0 {
                    return Err(RoundError::InvalidConfig(
                        "score target must be at least one question".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Target as a plain number (seconds or question count)
    pub fn target(&self) -> f64 {
        match *self {
            RoundConfig::Countdown { seconds } => seconds,
            RoundConfig::ScoreTarget { count } => count as f64,
        }
    }

    /// Clock value at round start: full length for countdowns, zero otherwise
    pub fn initial_remaining(&self) -> f64 {
        match *self {
            RoundConfig::Countdown { seconds } => seconds,
            RoundConfig::ScoreTarget { .. } => 0.0,
        }
    }

    pub fn is_countdown(&self) -> bool {
        matches!(self, RoundConfig::Countdown { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_targets() {
        assert!(matches!(
            RoundConfig::countdown(0.0),
            Err(RoundError::InvalidConfig(_))
        ));
        assert!(matches!(
            RoundConfig::countdown(-5.0),
            Err(RoundError::InvalidConfig(_))
        ));
        assert!(matches!(
            RoundConfig::countdown(f64::NAN),
            Err(RoundError::InvalidConfig(_))
        ));
        assert!(matches!(
            RoundConfig::score_target(0),
            Err(RoundError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_presets_are_valid() {
        for secs in COUNTDOWN_PRESETS {
            assert!(RoundConfig::countdown(secs as f64).is_ok());
        }
        for count in SCORE_TARGET_PRESETS {
            assert!(RoundConfig::score_target(count).is_ok());
        }
    }

    #[test]
    fn test_initial_remaining() {
        assert_eq!(RoundConfig::Countdown { seconds: 90.0 }.initial_remaining(), 90.0);
        assert_eq!(RoundConfig::ScoreTarget { count: 5 }.initial_remaining(), 0.0);
    }
}
