use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

use crate::geom;

/// Sinusoidal wobble added on top of a drifter's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Radians per millisecond.
    pub frequency: f64,
    /// Peak offset in pixels per frame at `entropy == 1`.
    pub amplitude: f64,
}

impl Jitter {
    pub const NONE: Jitter = Jitter {
        frequency: 0.0,
        amplitude: 0.0,
    };

    pub fn offset(&self, time: f64, phase: f64, entropy: f64) -> Vec2 {
        let angle = time * self.frequency + phase;
        let scale = self.amplitude * entropy;
        Vec2::new(angle.sin() * scale, angle.cos() * scale)
    }
}

/// What happens when a drifter crosses the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgePolicy {
    /// Reappear on the opposite edge.
    Wrap,
    /// Point the velocity back inside `inset` pixels from the edge, scaled by
    /// `damping`, and clamp the position to that box.
    Reflect { inset: f64, damping: f64 },
}

impl EdgePolicy {
    /// The region a drifter is guaranteed to occupy after `advance`.
    pub fn region(&self, size: Size) -> Rect {
        match *self {
            EdgePolicy::Wrap => size.to_rect(),
            EdgePolicy::Reflect { inset, .. } => geom::inset(size, inset),
        }
    }
}

/// Free-floating particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drifter {
    pub pos: Point,
    pub vel: Vec2,
    pub radius: f64,
    /// Scales the jitter, in `[0, 1]`.
    pub entropy: f64,
    pub phase: f64,
}

impl Drifter {
    pub fn spawn<R: Rng + ?Sized>(
        region: Rect,
        speed: f64,
        radius: (f64, f64),
        rng: &mut R,
    ) -> Self {
        Self {
            pos: geom::random_in(region, rng),
            vel: geom::random_velocity(rng, speed),
            radius: radius.0 + rng.random::<f64>() * (radius.1 - radius.0),
            entropy: rng.random::<f64>(),
            phase: rng.random::<f64>() * std::f64::consts::TAU,
        }
    }

    /// Fixes the entropy factor; used by scenes whose jitter is uniform.
    pub fn with_entropy(mut self, entropy: f64) -> Self {
        self.entropy = entropy.clamp(0.0, 1.0);
        self
    }

    pub fn advance(self, time: f64, jitter: Jitter, size: Size, edge: EdgePolicy) -> Self {
        let mut next = self;
        next.pos += next.vel + jitter.offset(time, next.phase, next.entropy);
        match edge {
            EdgePolicy::Wrap => {
                if next.pos.x < 0.0 {
                    next.pos.x = size.width;
                } else if next.pos.x > size.width {
                    next.pos.x = 0.0;
                }
                if next.pos.y < 0.0 {
                    next.pos.y = size.height;
                } else if next.pos.y > size.height {
                    next.pos.y = 0.0;
                }
            }
            EdgePolicy::Reflect { damping, .. } => {
                let bounds = edge.region(size);
                if next.pos.x < bounds.x0 {
                    next.vel.x = next.vel.x.abs() * damping;
                    next.pos.x = bounds.x0;
                } else if next.pos.x > bounds.x1 {
                    next.vel.x = -next.vel.x.abs() * damping;
                    next.pos.x = bounds.x1;
                }
                if next.pos.y < bounds.y0 {
                    next.vel.y = next.vel.y.abs() * damping;
                    next.pos.y = bounds.y0;
                } else if next.pos.y > bounds.y1 {
                    next.vel.y = -next.vel.y.abs() * damping;
                    next.pos.y = bounds.y1;
                }
            }
        }
        next
    }
}
