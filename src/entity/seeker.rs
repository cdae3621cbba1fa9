use kurbo::{Point, Rect};
use rand::Rng;

use crate::geom;

/// Agent walking in straight lines to randomly chosen goals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seeker {
    pub pos: Point,
    pub target: Point,
}

impl Seeker {
    pub const SPEED: f64 = 0.5;
    pub const ARRIVE_RADIUS: f64 = 5.0;

    pub fn spawn<R: Rng + ?Sized>(start: Rect, goals: Rect, rng: &mut R) -> Self {
        Self {
            pos: geom::random_in(start, rng),
            target: geom::random_in(goals, rng),
        }
    }

    /// Direction of travel in radians.
    pub fn heading(&self) -> f64 {
        (self.target - self.pos).atan2()
    }

    /// Steps toward the target, or picks a new target from `goals` once it
    /// is within reach.
    pub fn advance<R: Rng + ?Sized>(self, goals: Rect, rng: &mut R) -> Self {
        let delta = self.target - self.pos;
        let dist = delta.hypot();
        if dist > Self::ARRIVE_RADIUS {
            Self {
                pos: self.pos + delta / dist * Self::SPEED,
                ..self
            }
        } else {
            Self {
                target: geom::random_in(goals, rng),
                ..self
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn retargets_on_arrival() {
        let mut rng = SmallRng::seed_from_u64(2);
        let goals = Rect::new(50.0, 50.0, 750.0, 550.0);
        let s = Seeker {
            pos: Point::new(100.0, 100.0),
            target: Point::new(103.0, 104.0),
        };
        let next = s.advance(goals, &mut rng);
        assert_eq!(next.pos, s.pos);
        assert_ne!(next.target, s.target);
        assert!(geom::contains(goals, next.target));
    }
}
