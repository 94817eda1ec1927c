//! The top-level simulation: world, population, clock and control surface.
//!
//! A [`Simulation`] is externally clocked. Each call to [`Simulation::advance`]
//! runs at most one tick of every agent; structural changes arrive through
//! [`Simulation::apply`] and are applied between ticks.

use qtty::{Quantity, Second};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::agent::Agent;
use crate::config::{ControllerKind, SimConfig};
use crate::environment::{Environment, MapGenerator};
use crate::error::SimError;
use crate::pool::{AgentPool, Pipeline, TickSummary};
use crate::telemetry::AgentSnapshot;

/// Structural and UI-driven events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    Pause,
    Resume,
    TogglePause,
    /// Moves one agent to a new pose, keeping its brain.
    ResetPose { agent: usize },
    /// Fresh network and trainer state for one agent, plus a new pose.
    ResetBrain { agent: usize },
    /// New obstacle layout and light; every pose is resampled, brains are kept.
    RegenerateEnvironment,
    /// Sets learning for every agent and for brains created later.
    SetLearning { enabled: bool },
    SetAgentLearning { agent: usize, enabled: bool },
    SetController(ControllerKind),
    /// Chooses which agent telemetry reports on.
    SelectAgent { agent: usize },
    /// Replaces the whole population with `count` fresh agents.
    Respawn { count: usize },
}

/// Result of one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Time step actually integrated, after clamping.
    pub dt: f64,
    /// Simulated seconds since the current map was created.
    pub time: f64,
    pub summary: TickSummary,
}

pub struct Simulation {
    config: SimConfig,
    environment: Environment,
    pool: AgentPool,
    pipeline: Pipeline,
    rng: StdRng,
    seed: u64,
    time: Quantity<Second>,
    paused: bool,
    selected: usize,
    ticks: u64,
}

impl Simulation {
    /// Builds a simulation on a freshly generated map.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let environment = MapGenerator::generate(&config, &mut rng);
        Ok(Self::assemble(config, environment, rng, seed))
    }

    /// Builds a simulation on a caller-provided environment.
    pub fn with_environment(
        config: SimConfig,
        environment: Environment,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        environment.validate()?;
        let rng = StdRng::seed_from_u64(seed);
        Ok(Self::assemble(config, environment, rng, seed))
    }

    fn assemble(config: SimConfig, environment: Environment, mut rng: StdRng, seed: u64) -> Self {
        let pool = AgentPool::spawn(config.agent_count, &environment, &config, &mut rng);
        debug!(
            agents = pool.len(),
            obstacles = environment.obstacles.len(),
            seed,
            "Simulation created"
        );
        Self {
            pipeline: Pipeline::new(&config),
            config,
            environment,
            pool,
            rng,
            seed,
            time: Quantity::<Second>::new(0.0),
            paused: false,
            selected: 0,
            ticks: 0,
        }
    }

    /// Advances every agent by the elapsed wall time, clamped to
    /// `[0, dt_max]`. Returns `None` while paused.
    pub fn advance(&mut self, elapsed: Quantity<Second>) -> Option<TickReport> {
        if self.paused {
            return None;
        }
        let raw = elapsed.value();
        let dt = if raw.is_finite() {
            raw.clamp(0.0, self.config.dt_max)
        } else {
            0.0
        };

        let summary = self.pool.tick(&self.pipeline, &self.environment, dt, &mut self.rng);
        self.time = Quantity::<Second>::new(self.time.value() + dt);
        self.ticks += 1;

        Some(TickReport {
            dt,
            time: self.time.value(),
            summary,
        })
    }

    /// Applies a control event. Events addressing a missing agent fail
    /// without changing anything.
    pub fn apply(&mut self, event: ControlEvent) -> Result<(), SimError> {
        match event {
            ControlEvent::Pause => self.paused = true,
            ControlEvent::Resume => self.paused = false,
            ControlEvent::TogglePause => self.paused = !self.paused,
            ControlEvent::ResetPose { agent } => {
                let a = agent_mut(&mut self.pool, agent)?;
                a.reset_pose(&self.environment, &self.config, &mut self.rng);
                debug!(agent, "Agent pose reset");
            }
            ControlEvent::ResetBrain { agent } => {
                let a = agent_mut(&mut self.pool, agent)?;
                a.reset_brain(&self.environment, &self.config, &mut self.rng);
                debug!(agent, "Agent brain reset");
            }
            ControlEvent::RegenerateEnvironment => {
                self.environment = MapGenerator::generate(&self.config, &mut self.rng);
                self.pool.reset_all_poses(&self.environment, &self.config, &mut self.rng);
                self.time = Quantity::<Second>::new(0.0);
                debug!(
                    obstacles = self.environment.obstacles.len(),
                    light_x = self.environment.light.position.x,
                    light_y = self.environment.light.position.y,
                    "Environment regenerated"
                );
            }
            ControlEvent::SetLearning { enabled } => {
                self.config.trainer.learning_enabled = enabled;
                self.pool.set_learning_enabled(enabled);
                debug!(enabled, "Learning toggled for all agents");
            }
            ControlEvent::SetAgentLearning { agent, enabled } => {
                agent_mut(&mut self.pool, agent)?.trainer.learning_enabled = enabled;
                debug!(agent, enabled, "Learning toggled");
            }
            ControlEvent::SetController(kind) => {
                self.config.controller = kind;
                self.pipeline = Pipeline::new(&self.config);
                debug!(controller = %kind, "Controller switched");
            }
            ControlEvent::SelectAgent { agent } => {
                agent_mut(&mut self.pool, agent)?;
                self.selected = agent;
            }
            ControlEvent::Respawn { count } => {
                self.config.agent_count = count;
                self.pool =
                    AgentPool::spawn(count, &self.environment, &self.config, &mut self.rng);
                self.selected = 0;
                debug!(count, "Population respawned");
            }
        }
        Ok(())
    }

    /// Telemetry for agent `index`.
    pub fn snapshot(&self, index: usize) -> Result<AgentSnapshot, SimError> {
        let agent = self.pool.get(index).ok_or(SimError::AgentOutOfRange {
            index,
            len: self.pool.len(),
        })?;
        Ok(AgentSnapshot::capture(index, agent, &self.environment, self.time.value()))
    }

    /// Telemetry for the currently selected agent.
    pub fn selected_snapshot(&self) -> Result<AgentSnapshot, SimError> {
        if self.pool.is_empty() {
            return Err(SimError::EmptyPool);
        }
        self.snapshot(self.selected)
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.pool
            .iter()
            .enumerate()
            .map(|(i, a)| AgentSnapshot::capture(i, a, &self.environment, self.time.value()))
            .collect()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn pool(&self) -> &AgentPool {
        &self.pool
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulated time since the current map was created.
    pub fn time(&self) -> Quantity<Second> {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Ticks run since construction; not reset by regeneration.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

fn agent_mut(pool: &mut AgentPool, index: usize) -> Result<&mut Agent, SimError> {
    let len = pool.len();
    pool.get_mut(index)
        .ok_or(SimError::AgentOutOfRange { index, len })
}
