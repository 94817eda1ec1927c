//! Core geometric types shared by the environment, sensors and agents.
//!
//! Defines world positions, agent poses, obstacle rectangles, the light
//! source and wheel speeds.

use std::f64::consts::TAU;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D position in the world domain Ω = [0, W] × [0, H].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Squared Euclidean distance to another position.
    pub fn distance_sq_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.distance_sq_to(other).sqrt()
    }

    /// Returns the point `dist` units away along `angle` (radians).
    pub fn advanced(&self, angle: f64, dist: f64) -> Self {
        Self {
            x: self.x + angle.cos() * dist,
            y: self.y + angle.sin() * dist,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Position plus heading `theta` (radians, unwrapped).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    pub position: Position,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            position: Position::new(x, y),
            theta,
        }
    }

    /// Heading wrapped into `[0, 2π)` for display.
    pub fn wrapped_heading(&self) -> f64 {
        self.theta.rem_euclid(TAU)
    }
}

/// Axis-aligned obstacle rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// True if the point lies inside the rectangle or on its border.
    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Closest point of the rectangle to `p` (p itself when inside).
    pub fn closest_point(&self, p: &Position) -> Position {
        Position::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }

    /// True if a circle of radius `r` centred at `p` touches the rectangle.
    pub fn intersects_circle(&self, p: &Position, r: f64) -> bool {
        self.closest_point(p).distance_sq_to(p) <= r * r
    }
}

/// A Gaussian light source.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightSource {
    pub position: Position,
    /// Spread of the brightness field.
    pub sigma: f64,
}

impl LightSource {
    pub fn new(x: f64, y: f64, sigma: f64) -> Self {
        Self {
            position: Position::new(x, y),
            sigma,
        }
    }
}

/// Left and right wheel speeds (world units per second).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Linear velocity of the chassis centre.
    pub fn linear(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Angular velocity for the given wheel base.
    pub fn angular(&self, wheel_base: f64) -> f64 {
        (self.right - self.left) / wheel_base
    }

    /// Scales both wheels by `factor`.
    pub fn damp(&mut self, factor: f64) {
        self.left *= factor;
        self.right *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_distance() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn position_advanced_along_heading() {
        let p = Position::new(1.0, 1.0).advanced(std::f64::consts::FRAC_PI_2, 2.0);
        assert!((p.x - 1.0).abs() < 1e-10);
        assert!((p.y - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rect_contains_border() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(&Position::new(10.0, 12.0)));
        assert!(r.contains(&Position::new(15.0, 15.0)));
        assert!(!r.contains(&Position::new(15.1, 12.0)));
    }

    #[test]
    fn rect_circle_intersection() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.intersects_circle(&Position::new(5.0, 15.0), 5.0));
        assert!(!r.intersects_circle(&Position::new(4.9, 15.0), 5.0));
        // corner case uses Euclidean distance to the corner
        assert!(!r.intersects_circle(&Position::new(6.0, 6.0), 5.0));
        assert!(r.intersects_circle(&Position::new(7.0, 7.0), 5.0));
    }

    #[test]
    fn wheel_speeds_kinematics() {
        let w = WheelSpeeds::new(10.0, 30.0);
        assert_eq!(w.linear(), 20.0);
        assert!((w.angular(20.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn heading_wraps() {
        let p = Pose::new(0.0, 0.0, -0.5);
        assert!((p.wrapped_heading() - (TAU - 0.5)).abs() < 1e-12);
    }
}
