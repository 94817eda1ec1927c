//! Two-layer tanh network mapping sensor features to action means.
//!
//! Architecture: `9 → 14 (tanh) → 2 (tanh)`. Outputs are the means of the
//! Gaussian policy over `[throttle, turn]`, both in `[-1, 1]`.

use rand::Rng;

use crate::sensor::SensorFeatures;

/// Input dimension.
pub const INPUT_DIM: usize = SensorFeatures::DIM;
/// Hidden layer width.
pub const HIDDEN_DIM: usize = 14;
/// Output dimension: `[throttle, turn]`.
pub const OUTPUT_DIM: usize = 2;

/// Intermediate values of one forward pass.
///
/// Consumed unmodified by the paired gradient step; never recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardCache {
    pub input: [f64; INPUT_DIM],
    pub hidden: [f64; HIDDEN_DIM],
    pub mean: [f64; OUTPUT_DIM],
}

/// Weights and biases of the policy network.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyNetwork {
    pub w1: [[f64; INPUT_DIM]; HIDDEN_DIM],
    pub b1: [f64; HIDDEN_DIM],
    pub w2: [[f64; HIDDEN_DIM]; OUTPUT_DIM],
    pub b2: [f64; OUTPUT_DIM],
}

impl PolicyNetwork {
    /// Network with every parameter at zero.
    pub fn zeros() -> Self {
        Self {
            w1: [[0.0; INPUT_DIM]; HIDDEN_DIM],
            b1: [0.0; HIDDEN_DIM],
            w2: [[0.0; HIDDEN_DIM]; OUTPUT_DIM],
            b2: [0.0; OUTPUT_DIM],
        }
    }

    /// Weights uniform in `[-scale, scale]`, biases zero.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> Self {
        let mut net = Self::zeros();
        for row in net.w1.iter_mut() {
            for w in row.iter_mut() {
                *w = rng.gen_range(-scale..=scale);
            }
        }
        for row in net.w2.iter_mut() {
            for w in row.iter_mut() {
                *w = rng.gen_range(-scale..=scale);
            }
        }
        net
    }

    /// Pure forward pass.
    pub fn forward(&self, features: &SensorFeatures) -> ForwardCache {
        let input = *features.as_array();

        let mut hidden = [0.0; HIDDEN_DIM];
        for (h, (row, b)) in hidden.iter_mut().zip(self.w1.iter().zip(&self.b1)) {
            let pre: f64 = row.iter().zip(&input).map(|(w, x)| w * x).sum::<f64>() + b;
            *h = pre.tanh();
        }

        let mut mean = [0.0; OUTPUT_DIM];
        for (m, (row, b)) in mean.iter_mut().zip(self.w2.iter().zip(&self.b2)) {
            let pre: f64 = row.iter().zip(&hidden).map(|(w, h)| w * h).sum::<f64>() + b;
            *m = pre.tanh();
        }

        ForwardCache {
            input,
            hidden,
            mean,
        }
    }

    /// Iterates over every weight and bias.
    pub fn parameters(&self) -> impl Iterator<Item = f64> + '_ {
        self.w1
            .iter()
            .flatten()
            .chain(&self.b1)
            .chain(self.w2.iter().flatten())
            .chain(&self.b2)
            .copied()
    }

    /// Largest absolute parameter value; NaN if any parameter is NaN.
    pub fn max_abs_parameter(&self) -> f64 {
        self.parameters().fold(0.0_f64, |acc, p| {
            if acc.is_nan() || p.is_nan() {
                f64::NAN
            } else {
                acc.max(p.abs())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn features() -> SensorFeatures {
        SensorFeatures([0.4, 1.0, 0.8, 0.1, 0.3, 0.2, 0.1, 0.0, 1.0])
    }

    #[test]
    fn init_weights_small_biases_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let net = PolicyNetwork::random(&mut rng, 0.25);
        assert!(net.max_abs_parameter() <= 0.25);
        assert!(net.b1.iter().all(|&b| b == 0.0));
        assert!(net.b2.iter().all(|&b| b == 0.0));
        assert!(net.w1.iter().flatten().any(|&w| w != 0.0));
    }

    #[test]
    fn forward_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(2);
        let net = PolicyNetwork::random(&mut rng, 0.25);
        let a = net.forward(&features());
        let b = net.forward(&features());
        assert_eq!(a, b);
        assert_eq!(a.input, features().0);
    }

    #[test]
    fn outputs_bounded_by_tanh() {
        let mut net = PolicyNetwork::zeros();
        for row in net.w1.iter_mut() {
            row.fill(3.0);
        }
        for row in net.w2.iter_mut() {
            row.fill(-3.0);
        }
        let cache = net.forward(&features());
        for h in cache.hidden {
            assert!(h > 0.99 && h <= 1.0);
        }
        for m in cache.mean {
            assert!((-1.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn max_abs_parameter_reports_nan() {
        let mut net = PolicyNetwork::zeros();
        net.w2[1][4] = -2.5;
        assert_eq!(net.max_abs_parameter(), 2.5);
        net.b1[3] = f64::NAN;
        assert!(net.max_abs_parameter().is_nan());
        assert!(!(net.max_abs_parameter() <= 3.0));
    }

    #[test]
    fn zero_network_outputs_zero() {
        let cache = PolicyNetwork::zeros().forward(&features());
        assert_eq!(cache.hidden, [0.0; HIDDEN_DIM]);
        assert_eq!(cache.mean, [0.0; OUTPUT_DIM]);
    }

    #[test]
    fn bias_shifts_output() {
        let mut net = PolicyNetwork::zeros();
        net.b2 = [0.5, -0.5];
        let cache = net.forward(&features());
        assert!((cache.mean[0] - 0.5_f64.tanh()).abs() < 1e-12);
        assert!((cache.mean[1] + 0.5_f64.tanh()).abs() < 1e-12);
    }
}
