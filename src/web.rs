//! Browser bindings
//!
//! The page owns rendering, the animation frame loop and the devicemotion
//! listener. It forwards elapsed time, button presses and accelerometer
//! readings here and renders the JSON event lists that come back.

use wasm_bindgen::prelude::*;

use crate::bank::{QuestionBank, RANDOM_CHALLENGE};
use crate::history::{RoundHistory, now_ms};
use crate::sensor::{ManualSensor, TiltReading};
use crate::session::{GameSession, SessionEvent};
use crate::settings::{GameMode, Settings};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Heads Up starting...");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<ManualSensor>,
    bank: QuestionBank,
    settings: Settings,
    history: RoundHistory,
}

#[wasm_bindgen]
impl WebGame {
    /// `bank_json` is the fetched words.json body, if the page has one
    #[wasm_bindgen(constructor)]
    pub fn new(bank_json: Option<String>) -> WebGame {
        let bank = match bank_json.as_deref().map(QuestionBank::from_json) {
            Some(Ok(bank)) => bank,
            Some(Err(e)) => {
                log::warn!("Using built-in question bank: {}", e);
                QuestionBank::default()
            }
            None => QuestionBank::default(),
        };
        let seed = rand::random::<u64>();
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            session: GameSession::new(ManualSensor::new(), seed),
            bank,
            settings: Settings::load(),
            history: RoundHistory::load(),
        }
    }

    /// Category names as a JSON array, random challenge first
    pub fn categories(&self) -> String {
        let names: Vec<&str> = std::iter::once(RANDOM_CHALLENGE)
            .chain(self.bank.names())
            .collect();
        serde_json::to_string(&names).unwrap_or_default()
    }

    pub fn enter(&mut self, category: &str) -> Result<String, JsValue> {
        let questions = if category == RANDOM_CHALLENGE {
            self.bank.random_challenge()
        } else {
            self.bank
                .get(category)
                .ok_or_else(|| to_js(format!("no category named '{}'", category)))?
                .to_vec()
        };
        let config = self.settings.round_config().map_err(to_js)?;
        let events = self
            .session
            .enter(category, &questions, config)
            .map_err(to_js)?;
        self.emit(events)
    }

    /// Called every animation frame with seconds since the last one
    pub fn advance(&mut self, dt: f64) -> Result<String, JsValue> {
        let events = self.session.advance(dt.min(0.1));
        self.emit(events)
    }

    pub fn press_correct(&mut self) -> Result<String, JsValue> {
        let events = self.session.press_correct().map_err(to_js)?;
        self.emit(events)
    }

    pub fn press_skip(&mut self) -> Result<String, JsValue> {
        let events = self.session.press_skip().map_err(to_js)?;
        self.emit(events)
    }

    /// Latest devicemotion acceleration including gravity
    pub fn push_tilt(&mut self, x: f32, y: f32, z: f32) {
        self.session.sensor_mut().push(TiltReading::new(x, y, z));
    }

    pub fn leave(&mut self) {
        self.session.leave();
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = GameMode::from_str(mode).ok_or_else(|| to_js("unknown mode"))?;
        self.settings.switch_mode(mode);
        self.settings.save().map_err(to_js)
    }

    pub fn set_target(&mut self, value: u32) -> Result<(), JsValue> {
        self.settings.set_target(value).map_err(to_js)?;
        self.settings.save().map_err(to_js)
    }

    pub fn settings(&self) -> String {
        serde_json::to_string(&self.settings).unwrap_or_default()
    }

    pub fn history(&self) -> String {
        serde_json::to_string(&self.history).unwrap_or_default()
    }

    pub fn clear_history(&mut self) -> Result<(), JsValue> {
        self.history.clear();
        self.history.save().map_err(to_js)
    }
}

impl WebGame {
    /// Record finished rounds, then serialize the events for the page
    fn emit(&mut self, events: Vec<SessionEvent>) -> Result<String, JsValue> {
        for event in &events {
            if let SessionEvent::RoundOver(summary) = event {
                self.history.record(summary.clone(), now_ms());
                if let Err(e) = self.history.save() {
                    log::warn!("History not saved: {}", e);
                }
            }
        }
        serde_json::to_string(&events).map_err(to_js)
    }
}
