use kurbo::{Point, Size};
use rand::Rng;

use crate::config::NetworkOptions;
use crate::entity::{Drifter, EdgePolicy, Jitter};
use crate::graph;
use crate::palette::Palette;
use crate::surface::{Stroke, Surface};

const EDGE: EdgePolicy = EdgePolicy::Reflect {
    inset: 0.0,
    damping: 1.0,
};

/// Plain particle network: bouncing dots joined by fading lines.
#[derive(Debug, Clone)]
pub struct NetworkScene {
    size: Size,
    options: NetworkOptions,
    particles: Vec<Drifter>,
}

impl NetworkScene {
    pub fn new<R: Rng + ?Sized>(size: Size, options: NetworkOptions, rng: &mut R) -> Self {
        let mut scene = Self {
            size,
            options,
            particles: Vec::new(),
        };
        scene.reseed(size, rng);
        scene
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        self.particles = (0..self.options.particle_count)
            .map(|_| Drifter::spawn(size.to_rect(), self.options.speed, (1.0, 3.0), rng))
            .collect();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn particles(&self) -> &[Drifter] {
        &self.particles
    }

    pub fn frame<S: Surface + ?Sized>(&mut self, time: f64, palette: &Palette, surface: &mut S) {
        surface.clear();

        let fill = palette.muted.with_alpha(self.options.particle_opacity);
        for p in &mut self.particles {
            *p = p.advance(time, Jitter::NONE, self.size, EDGE);
            surface.fill_circle(p.pos, p.radius, fill);
        }

        let points: Vec<Point> = self.particles.iter().map(|p| p.pos).collect();
        for edge in graph::connections(&points, self.options.connection_distance, 0.0) {
            let alpha = edge.opacity() * self.options.line_opacity;
            surface.line(
                points[edge.a],
                points[edge.b],
                Stroke::solid(palette.muted.with_alpha(alpha), 1.0),
            );
        }
    }
}
