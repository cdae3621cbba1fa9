use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

use crate::entity::{Drifter, EdgePolicy, Jitter, Label};
use crate::geom;
use crate::palette::Palette;
use crate::surface::{Surface, TextRun};

const FORMULAS: [&str; 5] = [
    "H(X) = -Σp·log(p)",
    "I(X;Y) = H(X) - H(X|Y)",
    "D_KL(P||Q)",
    "H(X,Y) = H(X) + H(Y|X)",
    "I(X;Y) ≤ min(H(X), H(Y))",
];

const PARTICLES: usize = 20;
const HISTOGRAMS: usize = 3;

const JITTER: Jitter = Jitter {
    frequency: 0.002,
    amplitude: 0.5,
};

const BAR_WIDTH: f64 = 8.0;
const BAR_GAP: f64 = 2.0;
const BAR_MAX_HEIGHT: f64 = 40.0;

/// A small normalized probability histogram that breathes over time.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub base: Point,
    pub bars: Vec<f64>,
    pub phase: f64,
}

impl Histogram {
    fn spawn<R: Rng + ?Sized>(region: Rect, rng: &mut R) -> Self {
        let n = rng.random_range(5..9);
        let raw: Vec<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
        let sum: f64 = raw.iter().sum();
        let bars = if sum > 0.0 {
            raw.iter().map(|v| v / sum).collect()
        } else {
            vec![1.0 / n as f64; n]
        };
        Self {
            base: geom::random_in(region, rng),
            bars,
            phase: rng.random::<f64>() * std::f64::consts::TAU,
        }
    }
}

/// Information-theory backdrop: chaotic wrapping particles, morphing
/// distributions and floating entropy identities.
#[derive(Debug, Clone)]
pub struct EntropyScene {
    size: Size,
    particles: Vec<Drifter>,
    histograms: Vec<Histogram>,
    labels: Vec<Label>,
}

impl EntropyScene {
    pub fn new<R: Rng + ?Sized>(size: Size, rng: &mut R) -> Self {
        let mut scene = Self {
            size,
            particles: Vec::new(),
            histograms: Vec::new(),
            labels: Vec::new(),
        };
        scene.reseed(size, rng);
        scene
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        self.particles = (0..PARTICLES)
            .map(|_| Drifter::spawn(size.to_rect(), 0.3, (2.0, 5.0), rng))
            .collect();
        let region = geom::inset(size, 150.0);
        self.histograms = (0..HISTOGRAMS).map(|_| Histogram::spawn(region, rng)).collect();
        self.labels = FORMULAS.iter().map(|&f| Label::spawn(f, size, rng)).collect();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn particles(&self) -> &[Drifter] {
        &self.particles
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn histograms(&self) -> &[Histogram] {
        &self.histograms
    }

    pub fn frame<R, S>(&mut self, time: f64, palette: &Palette, rng: &mut R, surface: &mut S)
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        surface.fill_rect(self.size.to_rect(), palette.background);

        let fills = [palette.state_dim, palette.value_dim, palette.reward_dim];
        for (idx, hist) in self.histograms.iter().enumerate() {
            let total = hist.bars.len() as f64 * (BAR_WIDTH + BAR_GAP);
            for (i, prob) in hist.bars.iter().enumerate() {
                let wobble = 1.0 + (time * 0.001 + hist.phase + i as f64 * 0.2).sin() * 0.2;
                let h = prob * BAR_MAX_HEIGHT * wobble;
                let x = hist.base.x - total / 2.0 + i as f64 * (BAR_WIDTH + BAR_GAP);
                let bar = Rect::new(x, hist.base.y - h, x + BAR_WIDTH, hist.base.y);
                surface.fill_rect(bar, fills[idx % fills.len()]);
            }
            surface.text(&TextRun::new(
                "P(x)",
                hist.base + Vec2::new(0.0, 15.0),
                9.0,
                palette.text,
            ));
        }

        for p in &mut self.particles {
            *p = p.advance(time, JITTER, self.size, EdgePolicy::Wrap);
            surface.fill_circle(p.pos, p.radius, palette.state_dim);
        }

        for label in &mut self.labels {
            *label = label.advance(self.size, None, rng);
            let opacity = label.opacity();
            if opacity > 0.0 {
                let color = palette.formula.with_alpha(opacity);
                let run = TextRun::new(label.text, label.pos, 11.0, color)
                    .transformed(label.rotation, label.scale);
                surface.text(&run);
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
    fn histograms_are_normalized() {
        let mut rng = SmallRng::seed_from_u64(21);
        let scene = EntropyScene::new(Size::new(1200.0, 800.0), &mut rng);
        assert_eq!(scene.histograms().len(), HISTOGRAMS);
        for h in scene.histograms() {
            assert!((5..=8).contains(&h.bars.len()));
            let sum: f64 = h.bars.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
