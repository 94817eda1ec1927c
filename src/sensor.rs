//! Ray-based distance and brightness sensing.
//!
//! Each sensing event casts three rays (left, center, right) from the robot
//! center. A ray reports the distance to the first obstacle or wall and the
//! light intensity probed at a fixed point ahead along the ray.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::environment::Environment;
use crate::types::Pose;

/// One ray's reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading {
    /// Absolute ray heading (robot heading plus ray offset).
    pub angle: f64,
    pub distance: f64,
    pub brightness: f64,
    pub max_range: f64,
}

impl SensorReading {
    /// Hit distance normalized by range, clamped to `[0, 1]`.
    pub fn normalized_distance(&self) -> f64 {
        (self.distance / self.max_range).clamp(0.0, 1.0)
    }

    /// `1 - normalized_distance`: 1 when touching, 0 when nothing in range.
    pub fn proximity(&self) -> f64 {
        1.0 - self.normalized_distance()
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            angle: 0.0,
            distance: 0.0,
            brightness: 0.0,
            max_range: 1.0,
        }
    }
}

/// The three readings of one sensing event, ordered left, center, right.
pub type SensorReadings = [SensorReading; SimConfig::SENSOR_COUNT];

/// Casts the configured rays against an environment.
#[derive(Debug, Clone, Copy)]
pub struct SensorArray {
    angles: [f64; SimConfig::SENSOR_COUNT],
    range: f64,
    step: f64,
    probe_offset: f64,
}

impl SensorArray {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            angles: config.sensor_angles,
            range: config.sensor_range,
            step: config.sensor_step,
            probe_offset: config.brightness_probe_offset,
        }
    }

    /// Senses the environment from `pose`.
    pub fn sense(&self, env: &Environment, pose: &Pose) -> SensorReadings {
        self.angles.map(|offset| {
            let heading = pose.theta + offset;
            let distance = env.distance_to_obstacle(&pose.position, heading, self.range, self.step);
            // the probe offset is applied twice: brightness is read 2x offset ahead
            let probe = pose
                .position
                .advanced(heading, self.probe_offset)
                .advanced(heading, self.probe_offset);
            SensorReading {
                angle: heading,
                distance,
                brightness: env.brightness(&probe),
                max_range: self.range,
            }
        })
    }
}

/// Feature vector fed to the policy network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFeatures(pub [f64; SensorFeatures::DIM]);

impl SensorFeatures {
    /// Input dimension of the policy network.
    pub const DIM: usize = 9;

    /// Encodes readings as
    /// `[dL, dC, dR, bL, bC, bR, bR - bL, 1 - dC, 1]`
    /// where `d` is the normalized hit distance and `b` the probed brightness.
    pub fn from_readings(readings: &SensorReadings) -> Self {
        let [left, center, right] = readings;
        Self([
            left.normalized_distance(),
            center.normalized_distance(),
            right.normalized_distance(),
            left.brightness,
            center.brightness,
            right.brightness,
            right.brightness - left.brightness,
            center.proximity(),
            1.0,
        ])
    }

    pub fn as_array(&self) -> &[f64; Self::DIM] {
        &self.0
    }
}
