//! Gaussian exploration around the policy mean.

use std::f64::consts::TAU;

use rand::Rng;

use super::network::OUTPUT_DIM;

/// Draws executed actions from `N(mean, sigma² I)`, clipped to `[-1, 1]`.
pub struct ActionSampler;

impl ActionSampler {
    /// Samples one action with independent noise per dimension.
    ///
    /// The returned action is what the robot executes; the unclipped mean is
    /// kept separately by the caller for the gradient step.
    pub fn sample<R: Rng + ?Sized>(
        mean: &[f64; OUTPUT_DIM],
        sigma: f64,
        rng: &mut R,
    ) -> [f64; OUTPUT_DIM] {
        mean.map(|m| (m + sigma * standard_normal(rng)).clamp(-1.0, 1.0))
    }
}

/// One standard-normal draw via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = rng.gen::<f64>().max(f64::EPSILON);
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn actions_always_within_unit_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let means = [[0.0, 0.0], [1.0, -1.0], [0.99, 0.5], [-0.7, 0.2]];
        let sigmas = [0.0, 0.05, 0.35, 2.0, 50.0];
        for mean in &means {
            for &sigma in &sigmas {
                for _ in 0..200 {
                    let a = ActionSampler::sample(mean, sigma, &mut rng);
                    assert!(a.iter().all(|x| (-1.0..=1.0).contains(x)), "{:?}", a);
                }
            }
        }
    }

    #[test]
    fn zero_sigma_returns_mean() {
        let mut rng = StdRng::seed_from_u64(6);
        let a = ActionSampler::sample(&[0.3, -0.4], 0.0, &mut rng);
        assert_eq!(a, [0.3, -0.4]);
    }

    #[test]
    fn standard_normal_moments() {
        let mut rng = StdRng::seed_from_u64(8);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.05, "var {}", var);
    }

    #[test]
    fn dimensions_draw_independent_noise() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = ActionSampler::sample(&[0.0, 0.0], 0.3, &mut rng);
        assert_ne!(a[0], a[1]);
    }
}
