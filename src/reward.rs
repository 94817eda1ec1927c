//! Per-tick reward shaping.
//!
//! Combines brightness progress, absolute intensity, a constant step cost,
//! obstacle proximity, collision and goal events.

use crate::config::SimConfig;

/// Measurements the reward is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardInputs {
    /// Brightness at the pose held at the start of the tick.
    pub prev_brightness: f64,
    /// Brightness at the pose after integration.
    pub brightness: f64,
    /// `1 - normalized center-ray distance`, from this tick's sensing.
    pub center_proximity: f64,
    pub collision: bool,
    pub distance_to_goal: f64,
}

/// Reward with its individual terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardBreakdown {
    pub progress: f64,
    pub intensity: f64,
    pub step_cost: f64,
    pub proximity: f64,
    pub collision: f64,
    pub goal: f64,
    pub goal_reached: bool,
    pub total: f64,
}

/// Computes rewards from [`RewardInputs`].
#[derive(Debug, Clone, Copy)]
pub struct RewardModel {
    brightness_delta: f64,
    intensity: f64,
    step_cost: f64,
    proximity: f64,
    collision: f64,
    goal: f64,
    goal_radius: f64,
}

impl RewardModel {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            brightness_delta: config.reward_brightness_delta,
            intensity: config.reward_intensity,
            step_cost: config.reward_step_cost,
            proximity: config.reward_proximity,
            collision: config.reward_collision,
            goal: config.reward_goal,
            goal_radius: config.goal_radius(),
        }
    }

    /// Computes the reward for one tick.
    ///
    /// ```text
    /// r = 5.4·Δb + 0.025·b − 0.008 − 0.03·proximity − 0.08·[collision] + 0.12·[goal]
    /// ```
    ///
    /// with the default coefficients. The goal fires strictly inside the goal
    /// radius and is not terminal.
    pub fn compute(&self, inputs: &RewardInputs) -> RewardBreakdown {
        let goal_reached = inputs.distance_to_goal < self.goal_radius;

        let progress = self.brightness_delta * (inputs.brightness - inputs.prev_brightness);
        let intensity = self.intensity * inputs.brightness;
        let step_cost = -self.step_cost;
        let proximity = -self.proximity * inputs.center_proximity;
        let collision = if inputs.collision { -self.collision } else { 0.0 };
        let goal = if goal_reached { self.goal } else { 0.0 };

        RewardBreakdown {
            progress,
            intensity,
            step_cost,
            proximity,
            collision,
            goal,
            goal_reached,
            total: progress + intensity + step_cost + proximity + collision + goal,
        }
    }
}
