//! Game session
//!
//! Hosts one round the way the game screen does: the 3-2-1 lead-in, the
//! 10 Hz game tick, sensor polling with a re-trigger cooldown, and the
//! result hold before returning to the question bank. All timing runs
//! through a `Scheduler`, so leaving the screen cancels everything that is
//! still pending. The presentation layer renders the returned events.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::error::RoundError;
use crate::round::{AnswerOutcome, PrepStep, RoundConfig, RoundController, RoundPhase, RoundSummary};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::sensor::{TiltDetector, TiltGesture, TiltSensor};

/// Prompt shown while the players get ready
pub const READY_PROMPT: &str = "Place phone\non forehead";
/// Status line before the clock starts
pub const READY_STATUS: &str = "Get ready...";

/// What the presentation layer should show or play
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum SessionEvent {
    /// Large text in the question area outside active play
    Prompt(String),
    /// Top bar text (clock / progress)
    Status(String),
    /// 3, 2, 1 lead-in
    Countdown(u8),
    Go,
    /// New question on screen
    Question(String),
    /// An answer registered (cue for the correct/wrong sound)
    Answered { correct: bool },
    RoundOver(RoundSummary),
    /// Result hold finished, go back to category selection
    ReturnToBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    PrepStep,
    BeginPlay,
    GameTick,
    SensorPoll,
    ReleaseLock,
    ReturnToBank,
}

#[derive(Debug, Clone, Copy)]
enum Input {
    Correct,
    Skip,
}

pub struct GameSession<S: TiltSensor> {
    round: RoundController,
    scheduler: Scheduler<Task>,
    sensor: S,
    detector: TiltDetector,
    seeds: Pcg32,
    /// Questions are up and input is accepted
    playing: bool,
    tick_task: Option<TaskHandle>,
    poll_task: Option<TaskHandle>,
    lock_task: Option<TaskHandle>,
}

impl<S: TiltSensor> GameSession<S> {
    pub fn new(sensor: S, seed: u64) -> Self {
        let mut seeds = Pcg32::seed_from_u64(seed);
        Self {
            round: RoundController::new(seeds.random()),
            scheduler: Scheduler::new(),
            sensor,
            detector: TiltDetector::default(),
            seeds,
            playing: false,
            tick_task: None,
            poll_task: None,
            lock_task: None,
        }
    }

    pub fn with_detector(mut self, detector: TiltDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Session clock in seconds
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// Select a category and begin the lead-in. Any round in progress is
    /// discarded.
    pub fn enter(
        &mut self,
        category: &str,
        questions: &[String],
        config: RoundConfig,
    ) -> Result<Vec<SessionEvent>, RoundError> {
        self.leave();
        self.round.start(category, questions, config)?;

        self.scheduler
            .schedule_interval(PREP_STEP_INTERVAL, Task::PrepStep);

        Ok(vec![
            SessionEvent::Prompt(READY_PROMPT.to_string()),
            SessionEvent::Status(READY_STATUS.to_string()),
        ])
    }

    /// Tear down: cancel every pending task, stop the sensor and drop the
    /// round.
    pub fn leave(&mut self) {
        self.scheduler.cancel_all();
        self.sensor.disable();
        self.playing = false;
        self.tick_task = None;
        self.poll_task = None;
        self.lock_task = None;
        if self.round.phase() != RoundPhase::Prep || !self.round.deck().is_empty() {
            self.round = RoundController::new(self.seeds.random());
        }
    }

    /// Advance the session clock and run everything that came due
    pub fn advance(&mut self, dt: f64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        self.scheduler.advance(dt);
        while let Some(fired) = self.scheduler.next_due() {
            match fired.payload {
                Task::PrepStep => self.on_prep_step(fired.handle, &mut events),
                Task::BeginPlay => self.on_begin_play(&mut events),
                Task::GameTick => self.on_game_tick(&mut events),
                Task::SensorPoll => self.on_sensor_poll(&mut events),
                Task::ReleaseLock => {
                    self.lock_task = None;
                    self.round.release_input();
                }
                Task::ReturnToBank => {
                    if let Err(e) = self.round.reset() {
                        log::warn!("Return to bank with round in unexpected state: {}", e);
                    }
                    events.push(SessionEvent::ReturnToBank);
                }
            }
        }
        events
    }

    /// "Correct" button
    pub fn press_correct(&mut self) -> Result<Vec<SessionEvent>, RoundError> {
        self.press(Input::Correct)
    }

    /// "Skip" button
    pub fn press_skip(&mut self) -> Result<Vec<SessionEvent>, RoundError> {
        self.press(Input::Skip)
    }

    fn press(&mut self, input: Input) -> Result<Vec<SessionEvent>, RoundError> {
        let mut events = Vec::new();
        if !self.playing {
            // Buttons stay disabled through the lead-in and the GO hold
            return Err(RoundError::InvalidPhaseOperation {
                operation: match input {
                    Input::Correct => "answer_correct",
                    Input::Skip => "answer_skip",
                },
                phase: self.round.phase(),
            });
        }
        self.answer(input, &mut events)?;
        Ok(events)
    }

    fn answer(
        &mut self,
        input: Input,
        events: &mut Vec<SessionEvent>,
    ) -> Result<bool, RoundError> {
        let outcome = match input {
            Input::Correct => self.round.answer_correct()?,
            Input::Skip => self.round.answer_skip()?,
        };
        let correct = matches!(input, Input::Correct);

        match outcome {
            AnswerOutcome::Suppressed => return Ok(false),
            AnswerOutcome::Next(question) => {
                events.push(SessionEvent::Answered { correct });
                events.push(SessionEvent::Status(self.round.status_line()));
                events.push(SessionEvent::Question(question));
            }
            AnswerOutcome::Finished(summary) => {
                events.push(SessionEvent::Answered { correct });
                events.push(SessionEvent::Status(self.round.status_line()));
                self.finish(summary, events);
            }
        }
        Ok(true)
    }

    fn on_prep_step(&mut self, handle: TaskHandle, events: &mut Vec<SessionEvent>) {
        match self.round.advance_prep() {
            Ok(PrepStep::Count(n)) => events.push(SessionEvent::Countdown(n)),
            Ok(PrepStep::Go) => {
                self.scheduler.cancel(handle);
                events.push(SessionEvent::Go);
                // Hold on GO before questions appear; answers stay locked
                if let Err(e) = self.round.lock_input_for(GO_HOLD) {
                    log::warn!("Could not lock input for GO hold: {}", e);
                }
                self.scheduler.schedule_once(GO_HOLD, Task::BeginPlay);
            }
            Err(e) => {
                log::warn!("Lead-in stopped: {}", e);
                self.scheduler.cancel(handle);
            }
        }
    }

    fn on_begin_play(&mut self, events: &mut Vec<SessionEvent>) {
        if self.round.phase() != RoundPhase::Active {
            return;
        }
        self.round.release_input();
        self.playing = true;

        events.push(SessionEvent::Status(self.round.status_line()));
        if let Some(question) = self.round.current_question() {
            events.push(SessionEvent::Question(question.to_string()));
        }

        self.tick_task = Some(self.scheduler.schedule_interval(TICK_INTERVAL, Task::GameTick));
        if self.sensor.enable() {
            log::debug!("Tilt sensor enabled");
            self.poll_task = Some(
                self.scheduler
                    .schedule_interval(SENSOR_POLL_INTERVAL, Task::SensorPoll),
            );
        } else {
            log::info!("No tilt sensor available, buttons only");
        }
    }

    fn on_game_tick(&mut self, events: &mut Vec<SessionEvent>) {
        match self.round.tick(TICK_INTERVAL) {
            Ok(None) => events.push(SessionEvent::Status(self.round.status_line())),
            Ok(Some(summary)) => {
                events.push(SessionEvent::Status(self.round.status_line()));
                self.finish(summary, events);
            }
            Err(e) => log::debug!("Game tick skipped: {}", e),
        }
    }

    fn on_sensor_poll(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.playing || self.round.is_input_locked() {
            return;
        }
        let Some(reading) = self.sensor.acceleration() else {
            return;
        };
        let input = match self.detector.classify(&reading) {
            Some(TiltGesture::Correct) => Input::Correct,
            Some(TiltGesture::Skip) => Input::Skip,
            None => return,
        };

        match self.answer(input, events) {
            Ok(true) if self.round.phase() == RoundPhase::Active => {
                if let Ok(duration) = self.round.lock_input_for(self.detector.cooldown) {
                    self.lock_task = Some(self.scheduler.schedule_once(duration, Task::ReleaseLock));
                }
            }
            Ok(_) => {}
            Err(e) => log::debug!("Tilt ignored: {}", e),
        }
    }

    fn finish(&mut self, summary: RoundSummary, events: &mut Vec<SessionEvent>) {
        for task in [self.tick_task.take(), self.poll_task.take(), self.lock_task.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(task);
        }
        self.sensor.disable();
        self.playing = false;

        events.push(SessionEvent::Prompt(summary.message()));
        events.push(SessionEvent::RoundOver(summary));
        self.scheduler.schedule_once(RESULT_HOLD, Task::ReturnToBank);
    }
}
