//! A fixed-size population of independent agents.

use rand::Rng;
use tracing::trace;

use crate::agent::{Agent, AgentTickReport};
use crate::config::{ControllerKind, SimConfig};
use crate::environment::Environment;
use crate::kinematics::KinematicIntegrator;
use crate::policy::ReactiveController;
use crate::reward::RewardModel;
use crate::sensor::SensorArray;
use crate::training::PolicyGradientTrainer;

/// The stateless stages every agent runs through each tick.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    pub controller: ControllerKind,
    pub sensors: SensorArray,
    pub kinematics: KinematicIntegrator,
    pub reactive: ReactiveController,
    pub reward: RewardModel,
    pub trainer: PolicyGradientTrainer,
}

impl Pipeline {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            controller: config.controller,
            sensors: SensorArray::new(config),
            kinematics: KinematicIntegrator::new(config),
            reactive: ReactiveController::new(config.max_turn_rate),
            reward: RewardModel::new(config),
            trainer: PolicyGradientTrainer::new(&config.trainer),
        }
    }
}

/// Aggregate of one pool tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub reports: Vec<AgentTickReport>,
    pub collisions: usize,
    pub goals: usize,
    pub mean_reward: f64,
}

/// Owns every agent and drives one pipeline pass per agent per tick.
#[derive(Debug, Clone, Default)]
pub struct AgentPool {
    agents: Vec<Agent>,
}

impl AgentPool {
    /// Spawns `count` agents with fresh brains.
    pub fn spawn<R: Rng + ?Sized>(
        count: usize,
        env: &Environment,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        Self {
            agents: (0..count).map(|_| Agent::spawn(env, config, rng)).collect(),
        }
    }

    /// Advances every agent by `dt`. Agents are processed in index order and
    /// never observe one another.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        pipeline: &Pipeline,
        env: &Environment,
        dt: f64,
        rng: &mut R,
    ) -> TickSummary {
        let reports: Vec<AgentTickReport> = self
            .agents
            .iter_mut()
            .map(|agent| agent.tick(pipeline, env, dt, rng))
            .collect();

        let collisions = reports.iter().filter(|r| r.collision).count();
        let goals = reports.iter().filter(|r| r.reward.goal_reached).count();
        let mean_reward = if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(|r| r.reward.total).sum::<f64>() / reports.len() as f64
        };
        trace!(agents = reports.len(), collisions, goals, mean_reward, "pool tick");

        TickSummary {
            reports,
            collisions,
            goals,
            mean_reward,
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    /// Resamples every agent's pose, keeping brains.
    pub fn reset_all_poses<R: Rng + ?Sized>(
        &mut self,
        env: &Environment,
        config: &SimConfig,
        rng: &mut R,
    ) {
        for agent in &mut self.agents {
            agent.reset_pose(env, config, rng);
        }
    }

    /// Sets the learning flag on every agent.
    pub fn set_learning_enabled(&mut self, enabled: bool) {
        for agent in &mut self.agents {
            agent.trainer.learning_enabled = enabled;
        }
    }
}
