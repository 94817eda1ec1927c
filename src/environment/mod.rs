//! Static world geometry: bounds, obstacles and the light field.
//!
//! The environment is shared read-only by every agent during a tick and is
//! only replaced wholesale between ticks (see [`crate::Simulation`]).

pub mod map;

pub use map::MapGenerator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{LightSource, Position, Rect};

/// Directional components below this magnitude never bound a wall distance.
const DEGENERATE_DIRECTION: f64 = 1e-6;

/// World bounds, obstacles and the light source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Environment {
    pub width: f64,
    pub height: f64,
    pub wall_padding: f64,
    pub obstacles: Vec<Rect>,
    pub light: LightSource,
}

impl Environment {
    /// Builds an environment from provider-supplied geometry.
    pub fn new(
        width: f64,
        height: f64,
        wall_padding: f64,
        obstacles: Vec<Rect>,
        light: LightSource,
    ) -> Self {
        Self {
            width,
            height,
            wall_padding,
            obstacles,
            light,
        }
    }

    /// Checks that the geometry yields finite brightness and a non-empty
    /// free region.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("width", self.width),
            ("height", self.height),
            ("light.sigma", self.light.sigma),
        ];
        for (field, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.wall_padding >= 0.0) {
            return Err(ConfigError::Negative {
                field: "wall_padding",
                value: self.wall_padding,
            });
        }
        if 2.0 * self.wall_padding >= self.width.min(self.height) {
            return Err(ConfigError::WorldTooSmall {
                width: self.width,
                height: self.height,
                padding: self.wall_padding,
            });
        }
        Ok(())
    }

    /// Normalized Gaussian light intensity at `p`, in (0, 1].
    pub fn brightness(&self, p: &Position) -> f64 {
        let d2 = p.distance_sq_to(&self.light.position);
        (-d2 / (2.0 * self.light.sigma * self.light.sigma)).exp()
    }

    /// Distance from `p` to the light center.
    pub fn distance_to_light(&self, p: &Position) -> f64 {
        p.distance_to(&self.light.position)
    }

    /// True if a disc of radius `r` at `p` touches the padded walls or any obstacle.
    pub fn blocked(&self, p: &Position, r: f64) -> bool {
        let lo = self.wall_padding + r;
        if p.x < lo || p.y < lo {
            return true;
        }
        if p.x > self.width - lo || p.y > self.height - lo {
            return true;
        }
        self.obstacles.iter().any(|rect| rect.intersects_circle(p, r))
    }

    /// True if `p` lies inside the (unpadded) world rectangle.
    pub fn in_bounds(&self, p: &Position) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// Distance along a ray to the nearest obstacle or wall, capped at `max_dist`.
    ///
    /// Obstacles are found by marching in steps of `step`; the first sample
    /// outside the world or inside a rectangle yields the hit distance. Walls
    /// are intersected analytically. The result is never negative.
    pub fn distance_to_obstacle(
        &self,
        origin: &Position,
        angle: f64,
        max_dist: f64,
        step: f64,
    ) -> f64 {
        let (dx, dy) = (angle.cos(), angle.sin());
        let mut nearest = max_dist;

        if !self.obstacles.is_empty() {
            let mut d = 0.0;
            while d <= max_dist {
                let sample = Position::new(origin.x + dx * d, origin.y + dy * d);
                if !self.in_bounds(&sample) || self.obstacles.iter().any(|r| r.contains(&sample))
                {
                    nearest = d;
                    break;
                }
                d += step;
            }
        }

        let wall_x = axis_wall_distance(origin.x, dx, self.width);
        let wall_y = axis_wall_distance(origin.y, dy, self.height);
        nearest.min(wall_x).min(wall_y).max(0.0)
    }
}

/// Distance along one axis to the wall the ray is heading toward.
fn axis_wall_distance(p: f64, dir: f64, max: f64) -> f64 {
    if dir.abs() < DEGENERATE_DIRECTION {
        f64::INFINITY
    } else if dir > 0.0 {
        (max - p) / dir
    } else {
        -p / dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn open_env() -> Environment {
        Environment::new(
            400.0,
            300.0,
            10.0,
            vec![],
            LightSource::new(200.0, 150.0, 110.0),
        )
    }

    #[test]
    fn valid_environment_passes() {
        assert_eq!(open_env().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_light_sigma() {
        let mut env = open_env();
        env.light.sigma = 0.0;
        assert_eq!(
            env.validate(),
            Err(ConfigError::NonPositive {
                field: "light.sigma",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_degenerate_bounds() {
        let mut env = open_env();
        env.height = 0.0;
        assert!(matches!(
            env.validate(),
            Err(ConfigError::NonPositive { field: "height", .. })
        ));
        let mut env = open_env();
        env.wall_padding = 150.0;
        assert!(matches!(
            env.validate(),
            Err(ConfigError::WorldTooSmall { .. })
        ));
    }

    #[test]
    fn brightness_peaks_at_light_center() {
        let env = open_env();
        assert_eq!(env.brightness(&Position::new(200.0, 150.0)), 1.0);
    }

    #[test]
    fn brightness_strictly_decreasing_with_distance() {
        let env = open_env();
        let mut prev = env.brightness(&env.light.position);
        for i in 1..60 {
            let b = env.brightness(&Position::new(200.0 + i as f64 * 5.0, 150.0));
            assert!(b < prev, "brightness must drop at step {}", i);
            assert!(b > 0.0 && b <= 1.0);
            prev = b;
        }
    }

    #[test]
    fn brightness_is_radially_symmetric() {
        let env = open_env();
        let a = env.brightness(&Position::new(230.0, 150.0));
        let b = env.brightness(&Position::new(200.0, 120.0));
        assert!((a - b).abs() < 1e-12);
        assert!(a < 1.0);
    }

    #[test]
    fn blocked_inside_wall_padding() {
        let env = open_env();
        assert!(env.blocked(&Position::new(5.0, 150.0), 0.0));
        assert!(env.blocked(&Position::new(200.0, 295.0), 0.0));
        assert!(!env.blocked(&Position::new(200.0, 150.0), 16.0));
    }

    #[test]
    fn blocked_monotonic_in_radius() {
        let mut env = open_env();
        env.obstacles.push(Rect::new(100.0, 100.0, 40.0, 30.0));
        let points = [
            Position::new(60.0, 60.0),
            Position::new(150.0, 115.0),
            Position::new(300.0, 200.0),
            Position::new(120.0, 150.0),
        ];
        for p in points {
            let mut was_blocked = false;
            for i in 0..200 {
                let r = i as f64 * 0.5;
                let now = env.blocked(&p, r);
                assert!(!was_blocked || now, "blocked flipped back at r={} for {}", r, p);
                was_blocked = now;
            }
        }
    }

    #[test]
    fn blocked_by_obstacle_edge() {
        let mut env = open_env();
        env.obstacles.push(Rect::new(100.0, 100.0, 40.0, 30.0));
        assert!(env.blocked(&Position::new(84.0, 110.0), 16.0));
        assert!(!env.blocked(&Position::new(83.0, 110.0), 16.0));
    }

    #[test]
    fn ray_reaches_wall_analytically() {
        let env = open_env();
        let d = env.distance_to_obstacle(&Position::new(350.0, 150.0), 0.0, 130.0, 4.0);
        assert!((d - 50.0).abs() < 1e-9);
        let d = env.distance_to_obstacle(&Position::new(200.0, 150.0), 0.0, 130.0, 4.0);
        assert_eq!(d, 130.0);
    }

    #[test]
    fn ray_hits_obstacle_on_step_grid() {
        let mut env = open_env();
        env.obstacles.push(Rect::new(250.0, 100.0, 20.0, 100.0));
        let d = env.distance_to_obstacle(&Position::new(200.0, 150.0), 0.0, 130.0, 4.0);
        assert_eq!(d, 52.0);
        // looking away from the obstacle
        let d = env.distance_to_obstacle(&Position::new(200.0, 150.0), PI, 130.0, 4.0);
        assert_eq!(d, 130.0);
    }

    #[test]
    fn degenerate_direction_is_not_binding() {
        let env = open_env();
        // cos(π/2) is ~6e-17: the x wall must not constrain the ray
        let d = env.distance_to_obstacle(&Position::new(395.0, 100.0), FRAC_PI_2, 130.0, 4.0);
        assert!(d.is_finite());
        assert!((d - 130.0).abs() < 1e-9);
        let d = env.distance_to_obstacle(&Position::new(395.0, 250.0), FRAC_PI_2, 130.0, 4.0);
        assert!((d - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ray_from_outside_world_is_not_negative() {
        let env = open_env();
        let d = env.distance_to_obstacle(&Position::new(450.0, 150.0), 0.0, 130.0, 4.0);
        assert_eq!(d, 0.0);
    }
}
