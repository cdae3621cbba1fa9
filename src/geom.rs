//! Small helpers on top of `kurbo` shared by entities and scenes.

use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

/// The canvas rectangle grown by `margin` on each side.
pub fn outset(size: Size, margin: Vec2) -> Rect {
    Rect::new(
        -margin.x,
        -margin.y,
        size.width + margin.x,
        size.height + margin.y,
    )
}

/// The canvas rectangle shrunk by `inset` on each side. Collapses to the
/// center line when the canvas is narrower than twice the inset.
pub fn inset(size: Size, inset: f64) -> Rect {
    let (x0, x1) = span(size.width, inset);
    let (y0, y1) = span(size.height, inset);
    Rect::new(x0, y0, x1, y1)
}

fn span(extent: f64, inset: f64) -> (f64, f64) {
    if extent < inset * 2.0 {
        (extent / 2.0, extent / 2.0)
    } else {
        (inset, extent - inset)
    }
}

/// Inclusive containment; `kurbo::Rect::contains` excludes the far edges.
pub fn contains(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Nearest point of `rect` to `p`.
pub fn clamp(rect: Rect, p: Point) -> Point {
    Point::new(p.x.clamp(rect.x0, rect.x1), p.y.clamp(rect.y0, rect.y1))
}

/// Uniform point in `rect`. Degenerate rects yield their origin corner.
pub fn random_in<R: Rng + ?Sized>(rect: Rect, rng: &mut R) -> Point {
    Point::new(
        rect.x0 + rng.random::<f64>() * rect.width(),
        rect.y0 + rng.random::<f64>() * rect.height(),
    )
}

/// Uniform value in `[-0.5, 0.5) * scale`.
pub fn centered<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * scale
}

/// Velocity with each axis uniform in `[-speed/2, speed/2)`.
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f64) -> Vec2 {
    Vec2::new(centered(rng, speed), centered(rng, speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn inset_collapses_on_small_canvas() {
        let r = inset(Size::new(100.0, 400.0), 80.0);
        assert_eq!(r.x0, 50.0);
        assert_eq!(r.x1, 50.0);
        assert_eq!(r.y0, 80.0);
        assert_eq!(r.y1, 320.0);
    }

    #[test]
    fn clamp_snaps_to_nearest_edge() {
        let rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(clamp(rect, Point::new(418.2, 323.8)), Point::new(400.0, 300.0));
        assert_eq!(clamp(rect, Point::new(-5.0, 120.0)), Point::new(0.0, 120.0));
        assert_eq!(clamp(rect, Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
    }

    #[test]
    fn random_points_stay_in_rect() {
        let mut rng = SmallRng::seed_from_u64(3);
        let rect = Rect::new(50.0, 50.0, 750.0, 550.0);
        for _ in 0..500 {
            assert!(contains(rect, random_in(rect, &mut rng)));
        }
    }
}
