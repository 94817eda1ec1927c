//! Read-only per-agent snapshots for rendering and stats consumers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::environment::Environment;
use crate::policy::OUTPUT_DIM;
use crate::sensor::SensorReading;
use crate::training::TrainerState;
use crate::types::{Pose, Position, WheelSpeeds};
use crate::Id;

/// Learning counters and scalars of one agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainerMetrics {
    pub steps: u64,
    pub collisions: u64,
    pub goals: u64,
    pub sigma: f64,
    pub learning_rate: f64,
    pub reward_avg: f64,
    pub last_reward: f64,
    pub learning_enabled: bool,
}

impl From<&TrainerState> for TrainerMetrics {
    fn from(state: &TrainerState) -> Self {
        Self {
            steps: state.steps,
            collisions: state.collisions,
            goals: state.goals,
            sigma: state.sigma,
            learning_rate: state.learning_rate,
            reward_avg: state.reward_avg,
            last_reward: state.last_reward,
            learning_enabled: state.learning_enabled,
        }
    }
}

/// Everything a display needs to draw and describe one agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentSnapshot {
    pub index: usize,
    pub id: Id,
    /// Simulated seconds since the current map was created.
    pub time: f64,
    pub pose: Pose,
    pub wheels: WheelSpeeds,
    /// Oldest first.
    pub trail: Vec<Position>,
    pub sensors: Vec<SensorReading>,
    pub action: [f64; OUTPUT_DIM],
    pub mean: [f64; OUTPUT_DIM],
    pub brightness: f64,
    pub best_brightness: f64,
    pub distance_to_light: f64,
    pub metrics: TrainerMetrics,
}

impl AgentSnapshot {
    pub fn capture(index: usize, agent: &Agent, env: &Environment, time: f64) -> Self {
        Self {
            index,
            id: agent.id.clone(),
            time,
            pose: agent.pose,
            wheels: agent.wheels,
            trail: agent.trail.to_vec(),
            sensors: agent.sensors.to_vec(),
            action: agent.last_action,
            mean: agent.last_mean,
            brightness: agent.brightness(env),
            best_brightness: agent.best_brightness,
            distance_to_light: env.distance_to_light(&agent.pose.position),
            metrics: TrainerMetrics::from(&agent.trainer),
        }
    }
}

impl fmt::Display for AgentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Agent {} ===", self.index)?;
        writeln!(f, "  Time:                {:.1} s", self.time)?;
        writeln!(f, "  Position:            {}", self.pose.position)?;
        writeln!(f, "  Heading:             {:.2} rad", self.pose.wrapped_heading())?;
        writeln!(
            f,
            "  Wheel speeds (L/R):  {:.1} / {:.1}",
            self.wheels.left, self.wheels.right
        )?;
        writeln!(f, "  Current brightness:  {:.3}", self.brightness)?;
        writeln!(f, "  Best brightness:     {:.3}", self.best_brightness)?;
        writeln!(f, "  Distance to light:   {:.1}", self.distance_to_light)?;
        writeln!(
            f,
            "  Action (mean):       [{:.2}, {:.2}] ([{:.2}, {:.2}])",
            self.action[0], self.action[1], self.mean[0], self.mean[1]
        )?;
        let m = &self.metrics;
        writeln!(
            f,
            "  Steps / bumps / goals: {} / {} / {}",
            m.steps, m.collisions, m.goals
        )?;
        writeln!(
            f,
            "  Sigma: {:.3}  LR: {}  Learning: {}",
            m.sigma,
            m.learning_rate,
            if m.learning_enabled { "on" } else { "off" }
        )?;
        write!(
            f,
            "  Reward avg / last:   {:.4} / {:.4}",
            m.reward_avg, m.last_reward
        )
    }
}
