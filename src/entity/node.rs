use kurbo::{Point, Rect, Size};
use rand::Rng;

use super::{Drifter, EdgePolicy, Jitter, Pulse};

/// Floating MDP state: a drifter that carries a value estimate, a
/// terminal flag and a reward pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateNode {
    pub body: Drifter,
    pub value: f64,
    pub terminal: bool,
    pub pulse: Pulse,
}

impl StateNode {
    pub const JITTER: Jitter = Jitter {
        frequency: 0.0008,
        amplitude: 0.15,
    };
    pub const EDGE: EdgePolicy = EdgePolicy::Reflect {
        inset: 80.0,
        damping: 0.9,
    };

    pub fn spawn<R: Rng + ?Sized>(region: Rect, rng: &mut R) -> Self {
        Self {
            body: Drifter::spawn(region, 0.3, (5.0, 9.0), rng).with_entropy(1.0),
            value: rng.random::<f64>(),
            terminal: rng.random_bool(0.12),
            pulse: Pulse::default(),
        }
    }

    pub fn pos(&self) -> Point {
        self.body.pos
    }

    pub fn trigger(self) -> Self {
        Self {
            pulse: self.pulse.trigger(),
            ..self
        }
    }

    pub fn advance(self, time: f64, size: Size, decay: f64) -> Self {
        Self {
            body: self.body.advance(time, Self::JITTER, size, Self::EDGE),
            pulse: self.pulse.advance(decay),
            ..self
        }
    }

    /// Radius breathing slightly over time.
    pub fn breathing_radius(&self, time: f64) -> f64 {
        self.body.radius * (1.0 + (time * 0.002 + self.body.phase).sin() * 0.08)
    }
}
