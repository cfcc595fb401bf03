//! Round controller
//!
//! Drives one round from category selection to completion. The host feeds it
//! prep steps, fixed ticks and answers; the controller owns the deck, score,
//! clock and input lock and refuses anything outside the phase it belongs to.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::config::RoundConfig;
use super::deck::QuestionDeck;
use super::state::{AnswerOutcome, PrepStep, RoundPhase, RoundState, RoundSummary};
use crate::consts::TIME_EPSILON;
use crate::error::RoundError;

#[derive(Debug, Clone)]
pub struct RoundController {
    rng: Pcg32,
    category: String,
    config: RoundConfig,
    deck: QuestionDeck,
    state: RoundState,
    summary: Option<RoundSummary>,
}

impl RoundController {
    /// Create an idle controller. The seed drives every shuffle it performs.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            category: String::new(),
            config: RoundConfig::default(),
            deck: QuestionDeck::default(),
            state: RoundState::default(),
            summary: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn deck(&self) -> &QuestionDeck {
        &self.deck
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_input_locked(&self) -> bool {
        self.state.input_locked
    }

    /// Question currently on screen (only meaningful once active)
    pub fn current_question(&self) -> Option<&str> {
        self.deck.current()
    }

    /// Result of the finished round, available once the phase is `Over`
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    fn require(&self, operation: &'static str, allowed: &[RoundPhase]) -> Result<(), RoundError> {
        if allowed.contains(&self.state.phase) {
            Ok(())
        } else {
            log::debug!("Rejected {} in phase {:?}", operation, self.state.phase);
            Err(RoundError::InvalidPhaseOperation {
                operation,
                phase: self.state.phase,
            })
        }
    }

    /// Load a shuffled deck and reset score, clock and lock for a new round.
    ///
    /// Leaves the controller untouched when the deck is empty or the config
    /// is invalid.
    pub fn start(
        &mut self,
        category: impl Into<String>,
        questions: &[String],
        config: RoundConfig,
    ) -> Result<(), RoundError> {
        self.require("start", &[RoundPhase::Prep])?;
        config.validate()?;
        if questions.is_empty() {
            return Err(RoundError::EmptyDeck);
        }

        self.category = category.into();
        self.config = config;
        self.deck = QuestionDeck::new(questions, &mut self.rng);
        self.state = RoundState::new(&config);
        self.summary = None;

        log::info!(
            "Round started: category '{}', {} questions, {:?}",
            self.category,
            self.deck.len(),
            self.config
        );
        Ok(())
    }

    /// Advance the 3, 2, 1, GO sequence by one step. GO makes the round active.
    pub fn advance_prep(&mut self) -> Result<PrepStep, RoundError> {
        self.require("advance_prep", &[RoundPhase::Prep, RoundPhase::Countdown321])?;
        if self.deck.is_empty() {
            return Err(RoundError::EmptyDeck);
        }

        if self.state.phase == RoundPhase::Prep {
            self.state.phase = RoundPhase::Countdown321;
            log::debug!("Phase -> Countdown321");
        }

        if self.state.prep_remaining > 0 {
            let n = self.state.prep_remaining;
            self.state.prep_remaining -= 1;
            Ok(PrepStep::Count(n))
        } else {
            self.state.phase = RoundPhase::Active;
            log::debug!("Phase -> Active");
            Ok(PrepStep::Go)
        }
    }

    /// Advance the round clock. Returns the summary if the countdown ran out.
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn tick(&mut self, dt: f64) -> Result<Option<RoundSummary>, RoundError> {
        self.require("tick", &[RoundPhase::Active])?;
        if !dt.is_finite() || dt < 0.0 {
            return Ok(None);
        }

        match self.config {
            RoundConfig::Countdown { .. } => {
                self.state.elapsed += dt.min(self.state.remaining);
                self.state.remaining -= dt;
                if self.state.remaining <= TIME_EPSILON {
                    self.state.remaining = 0.0;
                    return Ok(Some(self.finish(false)));
                }
            }
            RoundConfig::ScoreTarget { .. } => {
                self.state.elapsed += dt;
            }
        }
        Ok(None)
    }

    /// Register a correct guess
    pub fn answer_correct(&mut self) -> Result<AnswerOutcome, RoundError> {
        self.require("answer_correct", &[RoundPhase::Active])?;
        if self.state.input_locked {
            return Ok(AnswerOutcome::Suppressed);
        }

        self.state.score += 1;
        self.next_question();

        if let RoundConfig::ScoreTarget { count } = self.config {
            if self.state.score >= count {
                return Ok(AnswerOutcome::Finished(self.finish(true)));
            }
        }
        Ok(self.continue_with_current())
    }

    /// Pass on the current question
    pub fn answer_skip(&mut self) -> Result<AnswerOutcome, RoundError> {
        self.require("answer_skip", &[RoundPhase::Active])?;
        if self.state.input_locked {
            return Ok(AnswerOutcome::Suppressed);
        }

        self.next_question();
        Ok(self.continue_with_current())
    }

    /// Suppress answers until `release_input` is called. The caller owns the
    /// timer that releases the lock after `duration` seconds.
    pub fn lock_input_for(&mut self, duration: f64) -> Result<f64, RoundError> {
        self.require("lock_input_for", &[RoundPhase::Active])?;
        self.state.input_locked = true;
        Ok(duration)
    }

    /// Clear the input lock. Harmless when nothing is locked.
    pub fn release_input(&mut self) {
        self.state.input_locked = false;
    }

    /// Return a finished round to `Prep` so a new one can be started
    pub fn reset(&mut self) -> Result<(), RoundError> {
        self.require("reset", &[RoundPhase::Over])?;
        self.deck = QuestionDeck::default();
        self.state = RoundState::default();
        self.summary = None;
        log::debug!("Phase -> Prep");
        Ok(())
    }

    /// Clock and progress line for the top bar
    pub fn status_line(&self) -> String {
        match self.config {
            RoundConfig::Countdown { .. } => format!("{}s", self.state.remaining.floor() as u64),
            RoundConfig::ScoreTarget { count } => format!(
                "Progress: {}/{}  ({:.1}s)",
                self.state.score, count, self.state.elapsed
            ),
        }
    }

    fn next_question(&mut self) {
        self.state.questions_seen += 1;
        self.deck.advance(&mut self.rng);
    }

    fn continue_with_current(&self) -> AnswerOutcome {
        AnswerOutcome::Next(self.deck.current().unwrap_or_default().to_string())
    }

    fn finish(&mut self, target_reached: bool) -> RoundSummary {
        self.state.phase = RoundPhase::Over;
        self.state.input_locked = false;
        let summary = RoundSummary {
            category: self.category.clone(),
            config: self.config,
            score: self.state.score,
            elapsed: self.state.elapsed,
            target_reached,
            questions_seen: self.state.questions_seen,
        };
        log::info!(
            "Round over: category '{}', score {}, {:.1}s",
            summary.category,
            summary.score,
            summary.elapsed
        );
        self.summary = Some(summary.clone());
        summary
    }
}
