use kurbo::{Point, Rect, Vec2};
use rand::Rng;

use super::Trail;
use crate::geom;

/// Stochastic gradient-descent walker heading for a fixed optimum.
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    pub pos: Point,
    pub target: Point,
    /// Pixels per frame along the gradient.
    pub speed: f64,
    /// Width of the uniform per-axis noise.
    pub noise: f64,
    /// Distance at which the walker counts as converged.
    pub arrive_radius: f64,
    pub trail: Trail,
}

impl Walker {
    pub fn new(pos: Point, target: Point, speed: f64, noise: f64, trail_cap: usize) -> Self {
        Self {
            pos,
            target,
            speed,
            noise,
            arrive_radius: 5.0,
            trail: Trail::new(trail_cap),
        }
    }

    pub fn with_arrive_radius(mut self, radius: f64) -> Self {
        self.arrive_radius = radius;
        self
    }

    pub fn converged(&self) -> bool {
        self.pos.distance(self.target) <= self.arrive_radius
    }

    /// One optimisation step, clamped to `bounds`. On convergence the walker
    /// is replaced by `respawn(rng)`, which starts with an empty trail.
    pub fn advance<R, F>(self, bounds: Rect, rng: &mut R, respawn: F) -> Self
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut R) -> Walker,
    {
        let delta = self.target - self.pos;
        let dist = delta.hypot();
        if dist <= self.arrive_radius {
            return respawn(rng);
        }
        let mut next = self;
        let step = delta / dist * next.speed;
        let wander = Vec2::new(geom::centered(rng, next.noise), geom::centered(rng, next.noise));
        next.pos = geom::clamp(bounds, next.pos + step + wander);
        next.trail.push(next.pos);
        next
    }
}
