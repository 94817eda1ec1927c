//! Online policy-gradient training of the per-agent policy network.

pub mod trainer;

pub use trainer::{PolicyGradientTrainer, TrainerConfig, TrainerState, UpdateReport};
