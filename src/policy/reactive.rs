//! Hand-tuned Braitenberg-style steering, the non-learning baseline.
//!
//! Steers toward the brighter side, repels from close obstacles and backs
//! out when boxed in.

use crate::kinematics::DriveCommand;
use crate::sensor::SensorReadings;

const BASE_FORWARD: f64 = 45.0;
const BRIGHTNESS_FORWARD_GAIN: f64 = 80.0;
const BRIGHTNESS_TURN_GAIN: f64 = 120.0;
const AVOID_FORWARD_GAIN: f64 = 95.0;
const AVOID_TURN_GAIN: f64 = 220.0;
const ESCAPE_CENTER: f64 = 0.85;
const ESCAPE_SIDE: f64 = 0.65;
const ESCAPE_FORWARD: f64 = -20.0;
const ESCAPE_TURN: f64 = 130.0;
const FORWARD_RANGE: (f64, f64) = (-40.0, 110.0);

/// Fixed phototaxis-with-avoidance rule.
#[derive(Debug, Clone, Copy)]
pub struct ReactiveController {
    max_turn_rate: f64,
}

impl ReactiveController {
    pub fn new(max_turn_rate: f64) -> Self {
        Self { max_turn_rate }
    }

    pub fn command(&self, readings: &SensorReadings) -> DriveCommand {
        let [left, center, right] = readings;
        let (avoid_l, avoid_c, avoid_r) = (left.proximity(), center.proximity(), right.proximity());

        let mut forward = BASE_FORWARD + BRIGHTNESS_FORWARD_GAIN * center.brightness;
        let mut turn = BRIGHTNESS_TURN_GAIN * (right.brightness - left.brightness);

        forward -= AVOID_FORWARD_GAIN * avoid_c;
        turn += AVOID_TURN_GAIN * (avoid_l - avoid_r);

        // boxed in: back off and swing away from the closer side
        if avoid_c > ESCAPE_CENTER && (avoid_l > ESCAPE_SIDE || avoid_r > ESCAPE_SIDE) {
            forward = ESCAPE_FORWARD;
            turn += if avoid_l > avoid_r {
                -ESCAPE_TURN
            } else {
                ESCAPE_TURN
            };
        }

        DriveCommand {
            forward: forward.clamp(FORWARD_RANGE.0, FORWARD_RANGE.1),
            turn: turn.clamp(-self.max_turn_rate, self.max_turn_rate),
        }
    }
}
