use kurbo::{Point, Size, Vec2};
use rand::Rng;

use crate::geom;

/// How far past the canvas a label may drift before it is recycled.
pub const LABEL_MARGIN: Vec2 = Vec2::new(200.0, 50.0);

/// Share of the lifespan spent fading in, and again fading out.
const FADE_SHARE: f64 = 0.3;

/// A drifting piece of text with a fade-in / hold / fade-out lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub text: &'static str,
    pub pos: Point,
    pub vel: Vec2,
    /// Frames lived so far.
    pub age: u32,
    /// Total lifespan in frames.
    pub life: u32,
    pub target_opacity: f64,
    pub scale: f64,
    pub rotation: f64,
}

impl Label {
    pub fn spawn<R: Rng + ?Sized>(text: &'static str, size: Size, rng: &mut R) -> Self {
        Self {
            text,
            pos: geom::random_in(size.to_rect(), rng),
            vel: geom::random_velocity(rng, 0.15),
            age: 0,
            life: 800 + rng.random_range(0..400u32),
            target_opacity: 0.08 + rng.random::<f64>() * 0.08,
            scale: 0.7 + rng.random::<f64>() * 0.4,
            rotation: geom::centered(rng, 0.1),
        }
    }

    /// Opacity for the current age: linear ramp up, hold, linear ramp down.
    pub fn opacity(&self) -> f64 {
        if self.life == 0 {
            return 0.0;
        }
        let t = (self.age as f64 / self.life as f64).clamp(0.0, 1.0);
        let envelope = if t < FADE_SHARE {
            t / FADE_SHARE
        } else if t > 1.0 - FADE_SHARE {
            (1.0 - t) / FADE_SHARE
        } else {
            1.0
        };
        self.target_opacity * envelope
    }

    pub fn expired(&self, size: Size) -> bool {
        self.age >= self.life || !geom::contains(geom::outset(size, LABEL_MARGIN), self.pos)
    }

    /// Moves one frame. An expired label respawns at a random position with
    /// a fresh lifespan; with a `pool` it also takes a new text from it.
    pub fn advance<R: Rng + ?Sized>(
        self,
        size: Size,
        pool: Option<&[&'static str]>,
        rng: &mut R,
    ) -> Self {
        let mut next = self;
        next.pos += next.vel;
        next.age = next.age.saturating_add(1);
        if !next.expired(size) {
            return next;
        }
        let text = match pool {
            Some(pool) if !pool.is_empty() => pool[rng.random_range(0..pool.len())],
            _ => next.text,
        };
        Label::spawn(text, size, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fixed(life: u32) -> Label {
        Label {
            text: "H(X)",
            pos: Point::new(100.0, 100.0),
            vel: Vec2::ZERO,
            age: 0,
            life,
            target_opacity: 0.1,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    #[test]
    fn envelope_ramps_holds_and_fades() {
        let mut l = fixed(1000);
        assert_eq!(l.opacity(), 0.0);
        l.age = 150;
        assert!((l.opacity() - 0.05).abs() < 1e-12);
        l.age = 500;
        assert_eq!(l.opacity(), 0.1);
        l.age = 850;
        assert!((l.opacity() - 0.05).abs() < 1e-12);
        l.age = 1000;
        assert_eq!(l.opacity(), 0.0);
    }

    #[test]
    fn respawns_when_life_ends() {
        let mut rng = SmallRng::seed_from_u64(5);
        let size = Size::new(800.0, 600.0);
        let mut l = fixed(3);
        l.age = 2;
        let next = l.advance(size, Some(&["a", "b"]), &mut rng);
        assert_eq!(next.age, 0);
        assert!(next.text == "a" || next.text == "b");
        assert!(next.life >= 800);
    }

    #[test]
    fn respawns_when_out_of_margin() {
        let mut rng = SmallRng::seed_from_u64(6);
        let size = Size::new(800.0, 600.0);
        let mut l = fixed(1000);
        l.pos = Point::new(-199.5, 10.0);
        l.vel = Vec2::new(-1.0, 0.0);
        let next = l.advance(size, None, &mut rng);
        assert_eq!(next.text, "H(X)");
        assert_eq!(next.age, 0);
        assert!(geom::contains(size.to_rect(), next.pos));
    }
}
