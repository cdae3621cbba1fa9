//! Distance-based connections between nodes of one scene.

use kurbo::Point;

/// Connection between nodes `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub threshold: f64,
}

impl Edge {
    /// Fades linearly from 1 at zero distance to 0 at the threshold.
    pub fn opacity(&self) -> f64 {
        (1.0 - self.distance / self.threshold).clamp(0.0, 1.0)
    }
}

/// Every pair closer than `threshold` (strictly) and at least `min_distance`
/// apart. Read-only over the positions.
pub fn connections(points: &[Point], threshold: f64, min_distance: f64) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (a, p) in points.iter().enumerate() {
        for (offset, q) in points[a + 1..].iter().enumerate() {
            let distance = p.distance(*q);
            if distance < threshold && distance >= min_distance {
                edges.push(Edge {
                    a,
                    b: a + 1 + offset,
                    distance,
                    threshold,
                });
            }
        }
    }
    edges
}

/// Position in `[0, 1)` of the marker travelling along edge `index`.
pub fn marker_progress(time: f64, index: usize, rate: f64) -> f64 {
    (time * rate + index as f64 * 0.1).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        let pts = [Point::new(0.0, 0.0), Point::new(150.0, 0.0), Point::new(0.0, 149.0)];
        let edges = connections(&pts, 150.0, 0.0);
        assert_eq!(edges.len(), 1);
        assert_eq!((edges[0].a, edges[0].b), (0, 2));
    }

    #[test]
    fn minimum_distance_excludes_crowded_pairs() {
        let pts = [Point::new(0.0, 0.0), Point::new(30.0, 0.0), Point::new(100.0, 0.0)];
        let edges = connections(&pts, 180.0, 40.0);
        let pairs: Vec<_> = edges.iter().map(|e| (e.a, e.b)).collect();
        assert_eq!(pairs, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn opacity_decays_linearly() {
        let e = Edge {
            a: 0,
            b: 1,
            distance: 75.0,
            threshold: 150.0,
        };
        assert!((e.opacity() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn marker_wraps() {
        let p = marker_progress(10_000.0, 3, 0.0003);
        assert!((0.0..1.0).contains(&p));
        assert!((p - 0.3).abs() < 1e-9);
    }
}
