//! Agent state and the per-tick sense → act → learn pipeline.

use rand::Rng;
use std::f64::consts::TAU;
use tracing::warn;

use crate::config::{ControllerKind, SimConfig};
use crate::environment::Environment;
use crate::policy::{ActionSampler, PolicyNetwork, OUTPUT_DIM};
use crate::pool::Pipeline;
use crate::reward::{RewardBreakdown, RewardInputs};
use crate::sensor::{SensorArray, SensorFeatures, SensorReading, SensorReadings};
use crate::trail::Trail;
use crate::training::TrainerState;
use crate::types::{Pose, WheelSpeeds};
use crate::{generate_id, Id};

/// A sampled spawn pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub pose: Pose,
    /// False when every attempt was blocked and the last candidate was kept.
    pub valid: bool,
}

/// Samples a spawn pose by capped rejection sampling.
///
/// Candidates are drawn inside `spawn_margin` and accepted when not blocked at
/// `robot_radius + spawn_clearance`. Exhausting `spawn_attempts` returns the
/// last candidate with `valid = false`.
pub fn sample_pose<R: Rng + ?Sized>(
    env: &Environment,
    config: &SimConfig,
    rng: &mut R,
) -> PoseSample {
    let margin = config.spawn_margin;
    let clearance = config.robot_radius + config.spawn_clearance;
    let mut pose = Pose::new(env.width / 2.0, env.height / 2.0, 0.0);

    for _ in 0..config.spawn_attempts {
        pose.position.x = uniform(rng, margin, env.width - margin);
        pose.position.y = uniform(rng, margin, env.height - margin);
        if !env.blocked(&pose.position, clearance) {
            pose.theta = rng.gen_range(0.0..TAU);
            return PoseSample { pose, valid: true };
        }
    }

    warn!(
        attempts = config.spawn_attempts,
        x = pose.position.x,
        y = pose.position.y,
        "Spawn sampling exhausted its attempts; keeping last candidate"
    );
    pose.theta = rng.gen_range(0.0..TAU);
    PoseSample { pose, valid: false }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

/// What one agent did during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTickReport {
    pub reward: RewardBreakdown,
    pub collision: bool,
    /// Advantage used for the gradient step, if one was taken.
    pub advantage: Option<f64>,
}

/// A single mobile robot with its own policy and learning state.
///
/// Agents never share state; the environment is read-only to them.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: Id,
    pub pose: Pose,
    pub wheels: WheelSpeeds,
    pub trail: Trail,
    /// Brightness at the current pose, recorded at the end of the last tick.
    pub prev_brightness: f64,
    pub best_brightness: f64,
    /// Readings from the most recent sensing event (left, center, right).
    pub sensors: SensorReadings,
    /// Executed (sampled, clipped) action.
    pub last_action: [f64; OUTPUT_DIM],
    /// Policy mean the action was sampled around.
    pub last_mean: [f64; OUTPUT_DIM],
    pub network: PolicyNetwork,
    pub trainer: TrainerState,
}

impl Agent {
    /// Creates an agent at a freshly sampled pose with a new brain.
    pub fn spawn<R: Rng + ?Sized>(env: &Environment, config: &SimConfig, rng: &mut R) -> Self {
        let sample = sample_pose(env, config, rng);
        let mut agent = Self {
            id: generate_id(),
            pose: sample.pose,
            wheels: WheelSpeeds::default(),
            trail: Trail::with_capacity(config.trail_capacity),
            prev_brightness: 0.0,
            best_brightness: 0.0,
            sensors: [SensorReading::default(); SimConfig::SENSOR_COUNT],
            last_action: [0.0; OUTPUT_DIM],
            last_mean: [0.0; OUTPUT_DIM],
            network: PolicyNetwork::random(rng, config.trainer.init_weight_scale),
            trainer: TrainerState::new(&config.trainer),
        };
        agent.settle_at(sample.pose, env, &SensorArray::new(config));
        agent
    }

    /// Moves the agent to a new sampled pose, keeping its brain.
    pub fn reset_pose<R: Rng + ?Sized>(
        &mut self,
        env: &Environment,
        config: &SimConfig,
        rng: &mut R,
    ) {
        let sample = sample_pose(env, config, rng);
        self.settle_at(sample.pose, env, &SensorArray::new(config));
    }

    /// Replaces the network and trainer state with fresh ones and resets the pose.
    pub fn reset_brain<R: Rng + ?Sized>(
        &mut self,
        env: &Environment,
        config: &SimConfig,
        rng: &mut R,
    ) {
        self.network = PolicyNetwork::random(rng, config.trainer.init_weight_scale);
        self.trainer = TrainerState::new(&config.trainer);
        self.reset_pose(env, config, rng);
    }

    /// Places the agent at `pose` with cleared motion history.
    pub fn settle_at(&mut self, pose: Pose, env: &Environment, sensors: &SensorArray) {
        self.pose = pose;
        self.wheels = WheelSpeeds::default();
        self.trail.clear();
        self.prev_brightness = env.brightness(&pose.position);
        self.best_brightness = self.prev_brightness;
        self.sensors = sensors.sense(env, &pose);
        self.last_action = [0.0; OUTPUT_DIM];
        self.last_mean = [0.0; OUTPUT_DIM];
    }

    /// Brightness at the current pose.
    pub fn brightness(&self, env: &Environment) -> f64 {
        env.brightness(&self.pose.position)
    }

    /// Runs one sense → act → integrate → reward → learn step.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        pipeline: &Pipeline,
        env: &Environment,
        dt: f64,
        rng: &mut R,
    ) -> AgentTickReport {
        let readings = pipeline.sensors.sense(env, &self.pose);
        let center_proximity = readings[1].proximity();

        let (command, cache) = match pipeline.controller {
            ControllerKind::Learned => {
                let features = SensorFeatures::from_readings(&readings);
                let cache = self.network.forward(&features);
                let action = ActionSampler::sample(&cache.mean, self.trainer.sigma, rng);
                self.last_mean = cache.mean;
                self.last_action = action;
                (pipeline.kinematics.command_from_action(&action), Some(cache))
            }
            ControllerKind::Reactive => {
                let command = pipeline.reactive.command(&readings);
                let action = pipeline.kinematics.action_from_command(&command);
                self.last_mean = action;
                self.last_action = action;
                (command, None)
            }
        };

        let outcome = pipeline.kinematics.step(
            &mut self.pose,
            &mut self.wheels,
            &command,
            dt,
            env,
            rng,
        );

        let brightness = self.brightness(env);
        let reward = pipeline.reward.compute(&RewardInputs {
            prev_brightness: self.prev_brightness,
            brightness,
            center_proximity,
            collision: outcome.collision,
            distance_to_goal: env.distance_to_light(&self.pose.position),
        });

        self.trainer.steps += 1;
        if outcome.collision {
            self.trainer.collisions += 1;
        }
        if reward.goal_reached {
            self.trainer.goals += 1;
        }

        let advantage = match cache {
            Some(cache) => {
                pipeline
                    .trainer
                    .update(
                        &mut self.trainer,
                        &mut self.network,
                        &cache,
                        &self.last_action,
                        reward.total,
                    )
                    .advantage
            }
            None => {
                pipeline.trainer.record_reward(&mut self.trainer, reward.total);
                None
            }
        };

        self.trail.push(self.pose.position);
        self.best_brightness = self.best_brightness.max(brightness);
        self.prev_brightness = brightness;
        self.sensors = readings;

        AgentTickReport {
            reward,
            collision: outcome.collision,
            advantage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LightSource, Rect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_env() -> Environment {
        Environment::new(800.0, 600.0, 10.0, vec![], LightSource::new(400.0, 300.0, 110.0))
    }

    #[test]
    fn spawn_pose_is_clear() {
        let mut env = open_env();
        env.obstacles.push(Rect::new(200.0, 200.0, 300.0, 150.0));
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let sample = sample_pose(&env, &config, &mut rng);
            assert!(sample.valid);
            assert!(!env.blocked(&sample.pose.position, config.robot_radius));
            assert!((0.0..TAU).contains(&sample.pose.theta));
        }
    }

    #[test]
    fn exhausted_spawn_returns_last_candidate() {
        let mut env = open_env();
        env.obstacles.push(Rect::new(0.0, 0.0, 800.0, 600.0));
        let config = SimConfig {
            spawn_attempts: 5,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(22);
        let sample = sample_pose(&env, &config, &mut rng);
        assert!(!sample.valid);
        assert!(sample.pose.position.x >= 50.0 && sample.pose.position.x <= 750.0);
    }

    #[test]
    fn spawned_agent_is_fresh() {
        let env = open_env();
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(23);
        let agent = Agent::spawn(&env, &config, &mut rng);
        assert!(agent.trail.is_empty());
        assert_eq!(agent.trainer.steps, 0);
        assert_eq!(agent.trainer.sigma, config.trainer.initial_sigma);
        assert_eq!(agent.prev_brightness, agent.brightness(&env));
        assert!(agent.network.b1.iter().all(|&b| b == 0.0));
        assert_eq!(agent.id.len(), 36);
    }

    #[test]
    fn tick_updates_bookkeeping() {
        let env = open_env();
        let config = SimConfig::default();
        let pipeline = Pipeline::new(&config);
        let mut rng = StdRng::seed_from_u64(24);
        let mut agent = Agent::spawn(&env, &config, &mut rng);
        for _ in 0..10 {
            let report = agent.tick(&pipeline, &env, 0.03, &mut rng);
            assert!(report.advantage.is_some());
        }
        assert_eq!(agent.trainer.steps, 10);
        assert_eq!(agent.trail.len(), 10);
        assert_eq!(agent.trail.latest(), Some(&agent.pose.position));
        assert_eq!(agent.prev_brightness, agent.brightness(&env));
        assert!(agent.best_brightness >= agent.prev_brightness);
        assert!(agent.last_action.iter().all(|a| (-1.0..=1.0).contains(a)));
    }

    #[test]
    fn reset_pose_keeps_brain() {
        let env = open_env();
        let config = SimConfig::default();
        let pipeline = Pipeline::new(&config);
        let mut rng = StdRng::seed_from_u64(25);
        let mut agent = Agent::spawn(&env, &config, &mut rng);
        for _ in 0..5 {
            agent.tick(&pipeline, &env, 0.03, &mut rng);
        }
        let network = agent.network.clone();
        let steps = agent.trainer.steps;
        agent.reset_pose(&env, &config, &mut rng);
        assert_eq!(agent.network, network);
        assert_eq!(agent.trainer.steps, steps);
        assert!(agent.trail.is_empty());
        assert_eq!(agent.wheels, WheelSpeeds::default());
    }

    #[test]
    fn reset_brain_reinitializes_network_and_trainer() {
        let env = open_env();
        let config = SimConfig::default();
        let pipeline = Pipeline::new(&config);
        let mut rng = StdRng::seed_from_u64(26);
        let mut agent = Agent::spawn(&env, &config, &mut rng);
        for _ in 0..5 {
            agent.tick(&pipeline, &env, 0.03, &mut rng);
        }
        let network = agent.network.clone();
        agent.reset_brain(&env, &config, &mut rng);
        assert_ne!(agent.network, network);
        assert_eq!(agent.trainer, TrainerState::new(&config.trainer));
    }

    #[test]
    fn reactive_tick_skips_learning() {
        let env = open_env();
        let config = SimConfig {
            controller: ControllerKind::Reactive,
            ..SimConfig::default()
        };
        let pipeline = Pipeline::new(&config);
        let mut rng = StdRng::seed_from_u64(27);
        let mut agent = Agent::spawn(&env, &config, &mut rng);
        let network = agent.network.clone();
        let report = agent.tick(&pipeline, &env, 0.03, &mut rng);
        assert_eq!(report.advantage, None);
        assert_eq!(agent.network, network);
        assert_eq!(agent.last_action, agent.last_mean);
        assert_eq!(agent.trainer.last_reward, report.reward.total);
    }
}
