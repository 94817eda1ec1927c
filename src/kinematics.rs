//! Differential-drive kinematics with collision resolution.

use rand::Rng;

use crate::config::SimConfig;
use crate::environment::Environment;
use crate::policy::OUTPUT_DIM;
use crate::types::{Pose, Position, WheelSpeeds};

/// Chassis-level command: forward speed and turn rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// World units per second.
    pub forward: f64,
    /// Radians per second.
    pub turn: f64,
}

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The proposed pose was blocked and rejected.
    pub collision: bool,
}

/// Turns commands into wheel speeds and advances the pose.
#[derive(Debug, Clone, Copy)]
pub struct KinematicIntegrator {
    wheel_base: f64,
    max_wheel_speed: f64,
    max_forward_speed: f64,
    max_turn_rate: f64,
    robot_radius: f64,
    bump_heading_jitter: f64,
    bump_damping: f64,
}

impl KinematicIntegrator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            wheel_base: config.wheel_base,
            max_wheel_speed: config.max_wheel_speed,
            max_forward_speed: config.max_forward_speed,
            max_turn_rate: config.max_turn_rate,
            robot_radius: config.robot_radius,
            bump_heading_jitter: config.bump_heading_jitter,
            bump_damping: config.bump_damping,
        }
    }

    /// Scales a normalized `[throttle, turn]` action into a drive command.
    pub fn command_from_action(&self, action: &[f64; OUTPUT_DIM]) -> DriveCommand {
        DriveCommand {
            forward: action[0] * self.max_forward_speed,
            turn: action[1] * self.max_turn_rate,
        }
    }

    /// Inverse of [`Self::command_from_action`], clipped to `[-1, 1]`.
    pub fn action_from_command(&self, command: &DriveCommand) -> [f64; OUTPUT_DIM] {
        [
            (command.forward / self.max_forward_speed).clamp(-1.0, 1.0),
            (command.turn / self.max_turn_rate).clamp(-1.0, 1.0),
        ]
    }

    /// Differential-drive wheel speeds for a command, each clamped to the wheel limit.
    pub fn wheel_speeds(&self, command: &DriveCommand) -> WheelSpeeds {
        let half = command.turn * self.wheel_base / 2.0;
        let limit = self.max_wheel_speed;
        WheelSpeeds::new(
            (command.forward - half).clamp(-limit, limit),
            (command.forward + half).clamp(-limit, limit),
        )
    }

    /// Integrates one Euler step of length `dt`.
    ///
    /// `wheels` is overwritten with the commanded speeds. If the proposed
    /// pose is blocked, `pose` keeps its position and heading, the heading is
    /// then jittered, and both wheel speeds are damped.
    pub fn step<R: Rng + ?Sized>(
        &self,
        pose: &mut Pose,
        wheels: &mut WheelSpeeds,
        command: &DriveCommand,
        dt: f64,
        env: &Environment,
        rng: &mut R,
    ) -> StepOutcome {
        *wheels = self.wheel_speeds(command);

        let linear = wheels.linear();
        let angular = wheels.angular(self.wheel_base);
        let proposed = Position::new(
            pose.position.x + pose.theta.cos() * linear * dt,
            pose.position.y + pose.theta.sin() * linear * dt,
        );

        if env.blocked(&proposed, self.robot_radius) {
            if self.bump_heading_jitter > 0.0 {
                pose.theta += rng.gen_range(-self.bump_heading_jitter..self.bump_heading_jitter);
            }
            wheels.damp(self.bump_damping);
            return StepOutcome { collision: true };
        }

        pose.position = proposed;
        pose.theta += angular * dt;
        StepOutcome { collision: false }
    }
}
