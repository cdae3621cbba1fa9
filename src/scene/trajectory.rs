use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

use crate::entity::Walker;
use crate::geom;
use crate::palette::Palette;
use crate::surface::{Align, Oval, Stroke, Surface, TextRun};

const WALKERS: usize = 8;
const TRAIL_CAP: usize = 50;
const NOISE: f64 = 0.3;
const MILESTONES: [&str; 4] = ["t₀", "t₁", "t₂", "t₃"];

/// Career as gradient ascent: noisy walkers converging on an optimum over a
/// contour map, with a timeline down the left edge.
#[derive(Debug, Clone)]
pub struct TrajectoryScene {
    size: Size,
    walkers: Vec<Walker>,
}

impl TrajectoryScene {
    pub fn new<R: Rng + ?Sized>(size: Size, rng: &mut R) -> Self {
        let mut scene = Self {
            size,
            walkers: Vec::new(),
        };
        scene.reseed(size, rng);
        scene
    }

    pub fn target(&self) -> Point {
        Point::new(self.size.width * 0.7, self.size.height * 0.3)
    }

    fn landscape_center(&self) -> Point {
        Point::new(self.size.width * 0.7, self.size.height * 0.35)
    }

    /// Bottom 30 % of the canvas, where restarted walkers appear.
    fn restart_region(&self) -> Rect {
        Rect::new(0.0, self.size.height * 0.7, self.size.width, self.size.height)
    }

    fn spawn_walker<R: Rng + ?Sized>(start: Rect, target: Point, rng: &mut R) -> Walker {
        let start = geom::random_in(start, rng);
        let speed = 0.2 + rng.random::<f64>() * 0.3;
        Walker::new(start, target, speed, NOISE, TRAIL_CAP).with_arrive_radius(10.0)
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        let target = self.target();
        self.walkers = (0..WALKERS)
            .map(|_| Self::spawn_walker(size.to_rect(), target, rng))
            .collect();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn frame<R, S>(&mut self, palette: &Palette, rng: &mut R, surface: &mut S)
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        surface.fill_rect(self.size.to_rect(), palette.background);

        let center = self.landscape_center();
        for i in 1..=5 {
            let oval = Oval {
                center,
                radii: Vec2::new(i as f64 * 60.0, i as f64 * 40.0),
                rotation: 0.2,
            };
            surface.stroke_oval(oval, Stroke::solid(palette.value_dim, 1.0));
        }
        surface.fill_circle(center, 5.0, palette.reward_dim);
        surface.text(&TextRun::new("θ*", center + Vec2::new(0.0, 20.0), 9.0, palette.text));

        let (restart, target) = (self.restart_region(), self.target());
        let bounds = self.size.to_rect();
        let walkers = std::mem::take(&mut self.walkers);
        self.walkers = walkers
            .into_iter()
            .map(|w| w.advance(bounds, rng, |rng| Self::spawn_walker(restart, target, rng)))
            .collect();
        for w in &self.walkers {
            if w.trail.len() > 1 {
                surface.polyline(&w.trail.to_vec(), Stroke::solid(palette.action_dim, 1.0));
            }
            surface.fill_circle(w.pos, 3.0, palette.action.fade(0.5));
        }

        for (i, m) in MILESTONES.iter().enumerate() {
            let y = 100.0 + i as f64 * 120.0;
            surface.fill_circle(Point::new(40.0, y), 4.0, palette.state_dim);
            if i + 1 < MILESTONES.len() {
                surface.line(
                    Point::new(40.0, y + 8.0),
                    Point::new(40.0, y + 112.0),
                    Stroke::dashed(palette.line, 1.0, 3.0, 3.0),
                );
            }
            let run =
                TextRun::new(*m, Point::new(50.0, y + 4.0), 9.0, palette.text).aligned(Align::Left);
            surface.text(&run);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::LIGHT;
    use crate::surface::Recorder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn trails_stay_capped_over_long_runs() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut scene = TrajectoryScene::new(Size::new(1000.0, 700.0), &mut rng);
        let mut rec = Recorder::new();
        for _ in 0..600 {
            scene.frame(&LIGHT, &mut rng, &mut rec);
            assert_eq!(scene.walkers().len(), WALKERS);
            assert!(scene.walkers().iter().all(|w| w.trail.len() <= TRAIL_CAP));
            rec.take();
        }
    }
}
