//! Random map generation: obstacle rectangles and light placement.

use rand::Rng;
use tracing::warn;

use super::Environment;
use crate::config::SimConfig;
use crate::types::{LightSource, Rect};

/// Generates obstacle layouts and light positions by rejection sampling.
pub struct MapGenerator;

impl MapGenerator {
    /// Generates a fresh environment for the configured world.
    ///
    /// Obstacles are placed uniformly inside `obstacle_margin` and may
    /// overlap. The light is retried up to `light_attempts` times until it
    /// is not blocked at `light_clearance`; on exhaustion the last candidate
    /// is kept.
    pub fn generate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Environment {
        let (w, h) = (config.world_width, config.world_height);
        let margin = config.obstacle_margin;

        let obstacles = (0..config.obstacle_count)
            .map(|_| {
                let ow = sample(rng, config.obstacle_width_range);
                let oh = sample(rng, config.obstacle_height_range);
                Rect::new(
                    sample(rng, (margin, w - margin - ow)),
                    sample(rng, (margin, h - margin - oh)),
                    ow,
                    oh,
                )
            })
            .collect();

        let mut env = Environment::new(
            w,
            h,
            config.wall_padding,
            obstacles,
            LightSource::new(0.0, 0.0, config.light_sigma),
        );

        let lm = config.light_margin;
        let mut placed = false;
        for _ in 0..config.light_attempts {
            env.light.position.x = sample(rng, (lm, w - lm));
            env.light.position.y = sample(rng, (lm, h - lm));
            if !env.blocked(&env.light.position, config.light_clearance) {
                placed = true;
                break;
            }
        }
        if !placed {
            warn!(
                attempts = config.light_attempts,
                x = env.light.position.x,
                y = env.light.position.y,
                "Light placement exhausted its attempts; keeping last candidate"
            );
        }

        env
    }
}

/// Uniform sample in `[lo, hi)`, collapsing to `lo` for an empty range.
fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
