//! Online single-sample REINFORCE with a running reward baseline.
//!
//! One gradient-ascent step per tick on the log-likelihood of the executed
//! action under `N(mean, sigma² I)`, weighted by the advantage over an
//! exponentially averaged baseline. Exploration `sigma` is annealed toward a
//! floor while learning is enabled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::policy::{ForwardCache, PolicyNetwork, HIDDEN_DIM, OUTPUT_DIM};

/// Learning hyperparameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrainerConfig {
    /// Step size of each ascent update.
    pub learning_rate: f64,
    /// Exploration scale at brain creation.
    pub initial_sigma: f64,
    /// Floor for the exploration scale.
    pub sigma_min: f64,
    /// Multiplicative annealing applied per learning tick.
    pub sigma_decay: f64,
    /// EMA retention for the reward baseline and reward average.
    pub baseline_decay: f64,
    /// Every weight and bias is clamped to `[-weight_limit, weight_limit]`.
    pub weight_limit: f64,
    /// Weights are initialized uniformly in `[-init_weight_scale, init_weight_scale]`.
    pub init_weight_scale: f64,
    /// Whether new brains start with learning enabled.
    pub learning_enabled: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.02,
            initial_sigma: 0.35,
            sigma_min: 0.05,
            sigma_decay: 0.99995,
            baseline_decay: 0.995,
            weight_limit: 3.0,
            init_weight_scale: 0.25,
            learning_enabled: true,
        }
    }
}

/// Per-agent learning state and counters.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerState {
    pub learning_rate: f64,
    /// Exploration scale shared by both action dimensions.
    pub sigma: f64,
    pub sigma_min: f64,
    pub sigma_decay: f64,
    /// Running baseline subtracted from the reward.
    pub reward_baseline: f64,
    /// Reporting-only running reward average.
    pub reward_avg: f64,
    pub last_reward: f64,
    pub learning_enabled: bool,
    pub steps: u64,
    pub collisions: u64,
    pub goals: u64,
}

impl TrainerState {
    /// Fresh state for a new brain.
    pub fn new(config: &TrainerConfig) -> Self {
        Self {
            learning_rate: config.learning_rate,
            sigma: config.initial_sigma,
            sigma_min: config.sigma_min,
            sigma_decay: config.sigma_decay,
            reward_baseline: 0.0,
            reward_avg: 0.0,
            last_reward: 0.0,
            learning_enabled: config.learning_enabled,
            steps: 0,
            collisions: 0,
            goals: 0,
        }
    }
}

/// What one trainer update did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateReport {
    /// `None` when learning is disabled.
    pub advantage: Option<f64>,
    pub baseline: f64,
}

/// Applies the per-tick policy-gradient update.
#[derive(Debug, Clone, Copy)]
pub struct PolicyGradientTrainer {
    baseline_decay: f64,
    weight_limit: f64,
}

impl PolicyGradientTrainer {
    pub fn new(config: &TrainerConfig) -> Self {
        Self {
            baseline_decay: config.baseline_decay,
            weight_limit: config.weight_limit,
        }
    }

    /// Folds `reward` into the baseline and the reporting average.
    pub fn record_reward(&self, state: &mut TrainerState, reward: f64) {
        let keep = self.baseline_decay;
        state.reward_baseline = keep * state.reward_baseline + (1.0 - keep) * reward;
        state.reward_avg = keep * state.reward_avg + (1.0 - keep) * reward;
        state.last_reward = reward;
    }

    /// Absorbs `reward` into the running averages and, when learning is
    /// enabled, ascends the policy gradient and anneals `sigma`.
    ///
    /// The advantage is taken against the baseline *after* it has absorbed
    /// the current reward.
    pub fn update(
        &self,
        state: &mut TrainerState,
        network: &mut PolicyNetwork,
        cache: &ForwardCache,
        action: &[f64; OUTPUT_DIM],
        reward: f64,
    ) -> UpdateReport {
        self.record_reward(state, reward);

        if !state.learning_enabled {
            return UpdateReport {
                advantage: None,
                baseline: state.reward_baseline,
            };
        }

        let advantage = reward - state.reward_baseline;
        let variance = state.sigma * state.sigma;
        let d_mean: [f64; OUTPUT_DIM] =
            std::array::from_fn(|i| advantage * (action[i] - cache.mean[i]) / variance);

        self.backpropagate(network, cache, &d_mean, state.learning_rate);

        state.sigma = (state.sigma * state.sigma_decay).max(state.sigma_min);

        UpdateReport {
            advantage: Some(advantage),
            baseline: state.reward_baseline,
        }
    }

    /// Gradient ascent through both tanh layers given `d log π / d mean`.
    fn backpropagate(
        &self,
        network: &mut PolicyNetwork,
        cache: &ForwardCache,
        d_mean: &[f64; OUTPUT_DIM],
        lr: f64,
    ) {
        let limit = self.weight_limit;
        let mut d_hidden = [0.0; HIDDEN_DIM];

        for i in 0..OUTPUT_DIM {
            let m = cache.mean[i];
            let d_out = d_mean[i] * (1.0 - m * m);
            for j in 0..HIDDEN_DIM {
                d_hidden[j] += network.w2[i][j] * d_out;
                network.w2[i][j] =
                    (network.w2[i][j] + lr * d_out * cache.hidden[j]).clamp(-limit, limit);
            }
            network.b2[i] = (network.b2[i] + lr * d_out).clamp(-limit, limit);
        }

        for i in 0..HIDDEN_DIM {
            let h = cache.hidden[i];
            let d_pre = d_hidden[i] * (1.0 - h * h);
            for (w, x) in network.w1[i].iter_mut().zip(&cache.input) {
                *w = (*w + lr * d_pre * x).clamp(-limit, limit);
            }
            network.b1[i] = (network.b1[i] + lr * d_pre).clamp(-limit, limit);
        }
    }
}
