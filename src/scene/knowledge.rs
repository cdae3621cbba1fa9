use kurbo::{Point, Size};
use rand::Rng;

use crate::entity::{Drifter, EdgePolicy, Jitter};
use crate::geom;
use crate::graph::{self, Edge};
use crate::palette::Palette;
use crate::surface::{Stroke, Surface, TextRun};

const LABELS: [&str; 6] = ["∂L/∂θ", "argmax", "Σ", "∇", "π(a|s)", "𝔼[R]"];

const NODES: usize = 15;
const JITTER: Jitter = Jitter {
    frequency: 0.0008,
    amplitude: 0.1,
};
const EDGE: EdgePolicy = EdgePolicy::Reflect {
    inset: 30.0,
    damping: 1.0,
};
/// Marker travel per millisecond, in edge lengths.
const FLOW_RATE: f64 = 0.0003;

/// Citation network: slowly drifting nodes with knowledge flowing along
/// the edges between close pairs.
#[derive(Debug, Clone)]
pub struct KnowledgeScene {
    size: Size,
    threshold: f64,
    nodes: Vec<Drifter>,
    edges: Vec<Edge>,
}

impl KnowledgeScene {
    pub const DEFAULT_THRESHOLD: f64 = 180.0;

    pub fn new<R: Rng + ?Sized>(size: Size, rng: &mut R) -> Self {
        let mut scene = Self::with_nodes(size, Vec::new(), Self::DEFAULT_THRESHOLD);
        scene.reseed(size, rng);
        scene
    }

    /// A scene over caller-placed nodes.
    pub fn with_nodes(size: Size, nodes: Vec<Drifter>, threshold: f64) -> Self {
        Self {
            size,
            threshold,
            nodes,
            edges: Vec::new(),
        }
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        let region = geom::inset(size, 50.0);
        self.nodes = (0..NODES)
            .map(|_| Drifter::spawn(region, 0.15, (4.0, 8.0), rng).with_entropy(1.0))
            .collect();
        self.edges.clear();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn nodes(&self) -> &[Drifter] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Drifter] {
        &mut self.nodes
    }

    /// Edges drawn by the last frame.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn frame<S: Surface + ?Sized>(&mut self, time: f64, palette: &Palette, surface: &mut S) {
        surface.fill_rect(self.size.to_rect(), palette.background);

        let points: Vec<Point> = self.nodes.iter().map(|n| n.pos).collect();
        self.edges = graph::connections(&points, self.threshold, 0.0);
        for edge in &self.edges {
            let (from, to) = (points[edge.a], points[edge.b]);
            surface.line(from, to, Stroke::solid(palette.line, 1.0));
            let t = graph::marker_progress(time, edge.a, FLOW_RATE);
            surface.fill_circle(from.lerp(to, t), 2.0, palette.state_dim);
        }

        for node in &mut self.nodes {
            *node = node.advance(time, JITTER, self.size, EDGE);
            surface.glow(node.pos, node.radius * 3.0, palette.value_dim);
            surface.fill_circle(node.pos, node.radius, palette.value_dim);
        }

        let wrap = (self.size.width - 100.0).max(1.0);
        for (i, label) in LABELS.iter().enumerate() {
            let x = 80.0 + (i as f64 * 200.0).rem_euclid(wrap);
            let y = 60.0 + (i / 4) as f64 * 250.0;
            surface.text(&TextRun::new(*label, Point::new(x, y), 10.0, palette.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DARK;
    use crate::surface::Recorder;
    use kurbo::Vec2;

    fn node(x: f64, y: f64) -> Drifter {
        Drifter {
            pos: Point::new(x, y),
            vel: Vec2::ZERO,
            radius: 5.0,
            entropy: 0.0,
            phase: 0.0,
        }
    }

    #[test]
    fn markers_follow_edges() {
        let nodes = vec![node(100.0, 100.0), node(200.0, 100.0)];
        let mut scene = KnowledgeScene::with_nodes(Size::new(800.0, 600.0), nodes, 150.0);
        let mut rec = Recorder::new();
        scene.frame(0.0, &DARK, &mut rec);
        assert_eq!(scene.edges().len(), 1);
        assert_eq!(rec.lines_with(DARK.line), 1);
        assert!(rec.commands.iter().any(|c| matches!(
            c,
            crate::surface::Command::FillCircle { center, radius, .. }
                if *radius == 2.0 && *center == Point::new(100.0, 100.0)
        )));
    }
}
