//! Control policies: the learned Gaussian policy network and the reactive baseline.

pub mod network;
pub mod reactive;
pub mod sampler;

pub use network::{ForwardCache, PolicyNetwork, HIDDEN_DIM, INPUT_DIM, OUTPUT_DIM};
pub use reactive::ReactiveController;
pub use sampler::ActionSampler;
