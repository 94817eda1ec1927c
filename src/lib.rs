//! phototaxis - light-seeking differential-drive agents that learn on board
//!
//! A population of independent robots searches a rectangular world for a
//! Gaussian light source while avoiding obstacles. Each robot senses through
//! three range/brightness rays, acts through a small tanh policy network with
//! Gaussian exploration, and improves that policy every tick with a
//! single-sample REINFORCE update against a running reward baseline.

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod kinematics;
pub mod policy;
pub mod pool;
pub mod reward;
pub mod sensor;
pub mod simulation;
pub mod telemetry;
pub mod trail;
pub mod training;
pub mod types;

pub use agent::Agent;
pub use config::{ControllerKind, SimConfig};
pub use environment::{Environment, MapGenerator};
pub use error::{ConfigError, SimError};
pub use pool::{AgentPool, TickSummary};
pub use simulation::{ControlEvent, Simulation, TickReport};
pub use telemetry::{AgentSnapshot, TrainerMetrics};
pub use training::TrainerConfig;
pub use types::{LightSource, Pose, Position, Rect, WheelSpeeds};

/// Identifier type used for agents.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
