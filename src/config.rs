//! Configuration for the phototaxis simulation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::training::TrainerConfig;

/// Which controller drives the agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ControllerKind {
    /// Gaussian policy network trained online by policy gradient.
    #[default]
    Learned,
    /// Fixed Braitenberg-style steering rule; never learns.
    Reactive,
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerKind::Learned => write!(f, "learned"),
            ControllerKind::Reactive => write!(f, "reactive"),
        }
    }
}

/// Configuration for the simulation.
///
/// Controls world geometry, robot dynamics, sensing, map generation,
/// reward shaping and (through [`TrainerConfig`]) the learning rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimConfig {
    // --- World ---
    /// Width of the world domain.
    pub world_width: f64,
    /// Height of the world domain.
    pub world_height: f64,
    /// Margin along every edge that counts as wall.
    pub wall_padding: f64,
    /// Upper bound on a single integration step, in seconds.
    pub dt_max: f64,

    // --- Robot ---
    pub robot_radius: f64,
    pub wheel_base: f64,
    pub max_wheel_speed: f64,
    /// Forward speed produced by a throttle action of 1.
    pub max_forward_speed: f64,
    /// Turn rate (rad/s) produced by a turn action of 1.
    pub max_turn_rate: f64,
    /// Heading noise amplitude applied on a bump (uniform in ±value).
    pub bump_heading_jitter: f64,
    /// Wheel speed multiplier applied on a bump.
    pub bump_damping: f64,
    pub trail_capacity: usize,

    // --- Spawning ---
    /// Distance from the world edge inside which spawns are sampled.
    pub spawn_margin: f64,
    /// Extra clearance over the robot radius required at spawn.
    pub spawn_clearance: f64,
    pub spawn_attempts: usize,

    // --- Sensors ---
    /// Ray headings relative to the robot heading (left, center, right).
    pub sensor_angles: [f64; 3],
    pub sensor_range: f64,
    /// Ray-march step length.
    pub sensor_step: f64,
    /// Offset of the brightness probe along the ray; applied twice.
    pub brightness_probe_offset: f64,

    // --- Map generation ---
    pub obstacle_count: usize,
    pub obstacle_margin: f64,
    pub obstacle_width_range: (f64, f64),
    pub obstacle_height_range: (f64, f64),
    pub light_margin: f64,
    pub light_clearance: f64,
    pub light_attempts: usize,
    pub light_sigma: f64,

    // --- Reward shaping ---
    /// Coefficient on the per-tick brightness change.
    pub reward_brightness_delta: f64,
    /// Coefficient on the absolute brightness at the new pose.
    pub reward_intensity: f64,
    /// Constant per-tick cost.
    pub reward_step_cost: f64,
    /// Penalty coefficient on center-ray obstacle proximity.
    pub reward_proximity: f64,
    pub reward_collision: f64,
    pub reward_goal: f64,
    /// Goal radius is `robot_radius + goal_margin`.
    pub goal_margin: f64,

    // --- Population ---
    pub agent_count: usize,
    pub controller: ControllerKind,

    // --- Learning ---
    pub trainer: TrainerConfig,
}

impl SimConfig {
    /// Number of sensor rays per sensing event.
    pub const SENSOR_COUNT: usize = 3;

    /// Distance to the light center below which the goal bonus fires.
    pub fn goal_radius(&self) -> f64 {
        self.robot_radius + self.goal_margin
    }

    /// Checks that the configuration can drive a numerically stable run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("dt_max", self.dt_max),
            ("robot_radius", self.robot_radius),
            ("wheel_base", self.wheel_base),
            ("max_wheel_speed", self.max_wheel_speed),
            ("max_forward_speed", self.max_forward_speed),
            ("max_turn_rate", self.max_turn_rate),
            ("sensor_range", self.sensor_range),
            ("sensor_step", self.sensor_step),
            ("light_sigma", self.light_sigma),
            ("learning_rate", self.trainer.learning_rate),
            ("sigma_min", self.trainer.sigma_min),
            ("weight_limit", self.trainer.weight_limit),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negatives = [
            ("wall_padding", self.wall_padding),
            ("spawn_margin", self.spawn_margin),
            ("bump_heading_jitter", self.bump_heading_jitter),
        ];
        for (field, value) in non_negatives {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.bump_damping) {
            return Err(ConfigError::DampingOutOfRange(self.bump_damping));
        }

        if 2.0 * self.wall_padding >= self.world_width.min(self.world_height) {
            return Err(ConfigError::WorldTooSmall {
                width: self.world_width,
                height: self.world_height,
                padding: self.wall_padding,
            });
        }
        if self.trail_capacity == 0 {
            return Err(ConfigError::ZeroTrailCapacity);
        }
        if self.trainer.initial_sigma < self.trainer.sigma_min {
            return Err(ConfigError::SigmaBelowFloor {
                sigma: self.trainer.initial_sigma,
                sigma_min: self.trainer.sigma_min,
            });
        }
        if !(self.trainer.sigma_decay > 0.0 && self.trainer.sigma_decay <= 1.0) {
            return Err(ConfigError::DecayOutOfRange(self.trainer.sigma_decay));
        }
        if !(0.0..1.0).contains(&self.trainer.baseline_decay) {
            return Err(ConfigError::BaselineDecayOutOfRange(
                self.trainer.baseline_decay,
            ));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 960.0,
            world_height: 640.0,
            wall_padding: 10.0,
            dt_max: 0.03,
            robot_radius: 16.0,
            wheel_base: 34.0,
            max_wheel_speed: 120.0,
            max_forward_speed: 95.0,
            max_turn_rate: 3.2,
            bump_heading_jitter: 0.4,
            bump_damping: 0.3,
            trail_capacity: 900,
            spawn_margin: 50.0,
            spawn_clearance: 4.0,
            spawn_attempts: 300,
            sensor_angles: [-0.6, 0.0, 0.6],
            sensor_range: 130.0,
            sensor_step: 4.0,
            brightness_probe_offset: 18.0,
            obstacle_count: 12,
            obstacle_margin: 80.0,
            obstacle_width_range: (45.0, 120.0),
            obstacle_height_range: (35.0, 100.0),
            light_margin: 80.0,
            light_clearance: 30.0,
            light_attempts: 200,
            light_sigma: 110.0,
            reward_brightness_delta: 5.4,
            reward_intensity: 0.025,
            reward_step_cost: 0.008,
            reward_proximity: 0.03,
            reward_collision: 0.08,
            reward_goal: 0.12,
            goal_margin: 15.0,
            agent_count: 6,
            controller: ControllerKind::Learned,
            trainer: TrainerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.goal_radius(), 31.0);
    }

    #[test]
    fn rejects_non_positive_wheel_base() {
        let cfg = SimConfig {
            wheel_base: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "wheel_base",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_sigma_below_floor() {
        let mut cfg = SimConfig::default();
        cfg.trainer.initial_sigma = 0.01;
        cfg.trainer.sigma_min = 0.05;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SigmaBelowFloor { .. })
        ));
    }

    #[test]
    fn rejects_zero_sigma_floor() {
        let mut cfg = SimConfig::default();
        cfg.trainer.sigma_min = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "sigma_min",
                ..
            })
        ));
    }

    #[test]
    fn rejects_padding_that_fills_world() {
        let cfg = SimConfig {
            world_width: 20.0,
            wall_padding: 10.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::WorldTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_zero_drive_limits() {
        let cfg = SimConfig {
            max_turn_rate: 0.0,
            controller: ControllerKind::Reactive,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "max_turn_rate",
                value: 0.0
            })
        );
        let cfg = SimConfig {
            max_forward_speed: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                field: "max_forward_speed",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_damping_outside_unit_range() {
        for damping in [-0.1, 1.5, f64::NAN] {
            let cfg = SimConfig {
                bump_damping: damping,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::DampingOutOfRange(_))
            ));
        }
    }

    #[test]
    fn rejects_negative_spawn_margin() {
        let cfg = SimConfig {
            spawn_margin: -5.0,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Negative {
                field: "spawn_margin",
                value: -5.0
            })
        );
    }

    #[test]
    fn rejects_growing_sigma() {
        let mut cfg = SimConfig::default();
        cfg.trainer.sigma_decay = 1.01;
        assert_eq!(cfg.validate(), Err(ConfigError::DecayOutOfRange(1.01)));
    }
}
