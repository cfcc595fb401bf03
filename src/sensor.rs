//! Tilt sensor seam and gesture detection
//!
//! The phone is held against the forehead, screen facing out. Tipping it
//! face down means "got it", tipping it face up means "pass". Polling the
//! hardware belongs to the platform layer; this module only defines the
//! reading it hands over and how a reading becomes a gesture.

use serde::{Deserialize, Serialize};

use crate::consts::{TILT_COOLDOWN, TILT_THRESHOLD};

/// 3-axis acceleration in m/s²
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltReading {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Answer signalled by a tilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltGesture {
    /// Face down
    Correct,
    /// Face up
    Skip,
}

/// Source of acceleration readings, owned by the platform layer
pub trait TiltSensor {
    /// Start delivering readings. Returns false if the device has no sensor.
    fn enable(&mut self) -> bool;
    fn disable(&mut self);
    /// Latest reading, if one is available
    fn acceleration(&self) -> Option<TiltReading>;
}

/// For hosts without an accelerometer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensor;

impl TiltSensor for NoSensor {
    fn enable(&mut self) -> bool {
        false
    }

    fn disable(&mut self) {}

    fn acceleration(&self) -> Option<TiltReading> {
        None
    }
}

/// Sensor fed by the host (e.g. a devicemotion listener)
#[derive(Debug, Clone, Default)]
pub struct ManualSensor {
    enabled: bool,
    reading: Option<TiltReading>,
}

impl ManualSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: TiltReading) {
        self.reading = Some(reading);
    }

    pub fn clear(&mut self) {
        self.reading = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TiltSensor for ManualSensor {
    fn enable(&mut self) -> bool {
        self.enabled = true;
        true
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn acceleration(&self) -> Option<TiltReading> {
        if self.enabled { self.reading } else { None }
    }
}

/// Maps readings to gestures using a vertical-axis threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltDetector {
    pub threshold: f32,
    /// Seconds to ignore further gestures after one fires
    pub cooldown: f64,
}

impl Default for TiltDetector {
    fn default() -> Self {
        Self {
            threshold: TILT_THRESHOLD,
            cooldown: TILT_COOLDOWN,
        }
    }
}

impl TiltDetector {
    pub fn classify(&self, reading: &TiltReading) -> Option<TiltGesture> {
        let z = reading.z;
        if !z.is_finite() || z == 0.0 {
            return None;
        }
        if z < -self.threshold {
            Some(TiltGesture::Correct)
        } else if z > self.threshold {
            Some(TiltGesture::Skip)
        } else {
            None
        }
    }
}
