use std::f64::consts::PI;

use kurbo::{Point, Size, Vec2};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::entity::{Label, StateNode, Walker};
use crate::geom;
use crate::graph;
use crate::palette::Palette;
use crate::surface::{Align, Oval, Stroke, Surface, TextRun};
use crate::trigger::TriggerSource;

/// Formula pool shared by every floating label of the hero.
pub const FORMULAS: [&str; 25] = [
    "V(s) = max_a Q(s,a)",
    "Q(s,a) = R + γ·V(s')",
    "V*(s) = max_a Σ P(s'|s,a)[R + γV*(s')]",
    "∇J(θ) = 𝔼[∇log π_θ · R]",
    "π*(a|s) = argmax Q*(s,a)",
    "H(X) = -Σ p(x)log p(x)",
    "I(X;Y) = H(X) - H(X|Y)",
    "D_KL(P||Q) = Σ P log(P/Q)",
    "θ ← θ - α∇L(θ)",
    "L = 𝔼[(y - ŷ)²]",
    "min_θ 𝔼[L(f_θ(x), y)]",
    "p(x|θ) = N(μ, σ²)",
    "P(A|B) = P(B|A)P(A)/P(B)",
    "𝔼[X] = Σ x·p(x)",
    "Nash: ∀i, u_i(s*) ≥ u_i(s)",
    "minimax: max_x min_y f(x,y)",
    "EU = Σ p(s)·U(s)",
    "argmax_a Σ P(s|a)U(s)",
    "δ = r + γV(s') - V(s)",
    "TD(0): V(s) ← V(s) + αδ",
    "J = 𝔼[R] + βH(π)",
    "π ∝ exp(Q/τ)",
    "A(s,a) = Q(s,a) - V(s)",
    "ρ(π) = lim 𝔼[Σγᵗrₜ]",
    "∂L/∂w = δ·∂Q/∂w",
];

const MAX_FORMULAS: usize = 12;
const MAX_STATES: usize = 25;
const WALKERS: usize = 5;
const WALKER_TRAIL: usize = 30;
const TRANSITION_RANGE: (f64, f64) = (40.0, 180.0);
const GRID: f64 = 50.0;

/// Front-page MDP composition: state graph with reward pulses, floating
/// formulas, an optimisation landscape and a feedback-loop diagram.
#[derive(Debug)]
pub struct HeroScene {
    size: Size,
    formulas: Vec<Label>,
    states: Vec<StateNode>,
    walkers: Vec<Walker>,
    triggers: Box<dyn TriggerSource>,
    pulse_decay: f64,
}

impl HeroScene {
    pub fn new<R: Rng + ?Sized>(
        size: Size,
        triggers: Box<dyn TriggerSource>,
        pulse_decay: f64,
        rng: &mut R,
    ) -> Self {
        let mut scene = Self {
            size,
            formulas: Vec::new(),
            states: Vec::new(),
            walkers: Vec::new(),
            triggers,
            pulse_decay,
        };
        scene.reseed(size, rng);
        scene
    }

    /// Label count grows with the width, node count with the area.
    pub fn pool_sizes(size: Size) -> (usize, usize) {
        let formulas = ((size.width / 120.0).floor().max(0.0) as usize).min(MAX_FORMULAS);
        let states = ((size.area() / 40_000.0).floor().max(0.0) as usize).min(MAX_STATES);
        (formulas, states)
    }

    pub fn landscape_center(&self) -> Point {
        Point::new(self.size.width * 0.75, self.size.height * 0.65)
    }

    /// A walker 50-150 px from the landscape center (kept on the canvas),
    /// with fresh speed and noise.
    fn spawn_walker<R: Rng + ?Sized>(size: Size, center: Point, rng: &mut R) -> Walker {
        let angle = rng.random::<f64>() * std::f64::consts::TAU;
        let dist = 50.0 + rng.random::<f64>() * 100.0;
        let start = geom::clamp(size.to_rect(), center + Vec2::from_angle(angle) * dist);
        let speed = 0.3 + rng.random::<f64>() * 0.4;
        let noise = rng.random::<f64>() * 0.5;
        Walker::new(start, center, speed, noise, WALKER_TRAIL)
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        let (formula_count, state_count) = Self::pool_sizes(size);

        let mut shuffled = FORMULAS;
        shuffled.shuffle(rng);
        self.formulas = (0..formula_count)
            .map(|i| Label::spawn(shuffled[i % shuffled.len()], size, rng))
            .collect();

        let region = geom::inset(size, 100.0);
        self.states = (0..state_count).map(|_| StateNode::spawn(region, rng)).collect();

        let center = self.landscape_center();
        self.walkers = (0..WALKERS)
            .map(|_| Self::spawn_walker(size, center, rng))
            .collect();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn formulas(&self) -> &[Label] {
        &self.formulas
    }

    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut [StateNode] {
        &mut self.states
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn frame<R, S>(&mut self, time: f64, palette: &Palette, rng: &mut R, surface: &mut S)
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        surface.fill_rect(self.size.to_rect(), palette.background);
        self.draw_grid(palette, surface);
        self.draw_landscape(palette, surface);
        let (w, h) = (self.size.width, self.size.height);
        draw_cloud(Point::new(w * 0.2, h * 0.3), time, palette, surface);
        draw_cloud(Point::new(w * 0.85, h * 0.25), time + 1000.0, palette, surface);

        for label in &mut self.formulas {
            *label = label.advance(self.size, Some(&FORMULAS[..]), rng);
            let opacity = label.opacity();
            if opacity > 0.0 {
                let color = palette.formula.with_alpha(opacity);
                let run = TextRun::new(label.text, label.pos, 14.0, color)
                    .transformed(label.rotation, label.scale);
                surface.text(&run);
            }
        }

        if let Some(i) = self.triggers.poll(time, self.states.len()) {
            if let Some(node) = self.states.get_mut(i) {
                *node = node.trigger();
            }
        }

        self.draw_transitions(palette, surface);

        for node in &mut self.states {
            *node = node.advance(time, self.size, self.pulse_decay);
            draw_state(node, time, palette, surface);
        }

        let (size, center) = (self.size, self.landscape_center());
        let bounds = size.to_rect();
        let walkers = std::mem::take(&mut self.walkers);
        self.walkers = walkers
            .into_iter()
            .map(|w| w.advance(bounds, rng, |rng| Self::spawn_walker(size, center, rng)))
            .collect();
        for w in &self.walkers {
            if w.trail.len() > 1 {
                surface.polyline(&w.trail.to_vec(), Stroke::solid(palette.action_dim, 1.0));
            }
            surface.fill_circle(w.pos, 3.0, palette.action);
        }

        self.draw_feedback_loop(palette, surface);
    }

    fn draw_grid<S: Surface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        let stroke = Stroke::solid(palette.grid, 0.5);
        let mut x = 0.0;
        while x < self.size.width {
            surface.line(Point::new(x, 0.0), Point::new(x, self.size.height), stroke);
            x += GRID;
        }
        let mut y = 0.0;
        while y < self.size.height {
            surface.line(Point::new(0.0, y), Point::new(self.size.width, y), stroke);
            y += GRID;
        }
    }

    fn draw_landscape<S: Surface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        let center = self.landscape_center();
        for r in (20..=140).step_by(25) {
            let r = r as f64;
            let oval = Oval {
                center,
                radii: Vec2::new(r * 1.3, r),
                rotation: 0.3,
            };
            surface.stroke_oval(oval, Stroke::solid(palette.contour, 1.0));
        }
        surface.fill_circle(center, 4.0, palette.value);
        let color = palette.formula.with_alpha(0.3);
        let run =
            TextRun::new("θ*", center + Vec2::new(8.0, 4.0), 10.0, color).aligned(Align::Left);
        surface.text(&run);
    }

    fn draw_transitions<S: Surface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        let points: Vec<Point> = self.states.iter().map(StateNode::pos).collect();
        let (min, max) = TRANSITION_RANGE;
        for edge in graph::connections(&points, max, min) {
            let (from, to) = (points[edge.a], points[edge.b]);
            surface.line(from, to, Stroke::solid(palette.state_dim, 1.0));

            let mid = from.lerp(to, 0.6);
            let angle = (to - from).atan2();
            let arrow = [
                mid,
                mid - Vec2::from_angle(angle - 0.4) * 5.0,
                mid - Vec2::from_angle(angle + 0.4) * 5.0,
            ];
            surface.fill_polygon(&arrow, palette.state_dim);
        }
    }

    fn draw_feedback_loop<S: Surface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        let center = Point::new(120.0, self.size.height - 100.0);
        let r = 35.0;
        let end = PI * 1.8;
        surface.arc(center, r, 0.5, end, Stroke::solid(palette.state_dim, 2.0));

        let tip = center + Vec2::from_angle(end) * r;
        let head = [tip, tip + Vec2::new(8.0, -4.0), tip + Vec2::new(4.0, 6.0)];
        surface.fill_polygon(&head, palette.state);

        let color = palette.formula.with_alpha(0.2);
        for (text, offset) in [
            ("Agent", Vec2::new(0.0, -45.0)),
            ("↓ aₜ", Vec2::new(45.0, 0.0)),
            ("Environment", Vec2::new(0.0, 55.0)),
            ("sₜ, rₜ ↑", Vec2::new(-45.0, 0.0)),
        ] {
            surface.text(&TextRun::new(text, center + offset, 9.0, color));
        }
    }
}

fn draw_state<S>(node: &StateNode, time: f64, palette: &Palette, surface: &mut S)
where
    S: Surface + ?Sized,
{
    let r = node.breathing_radius(time);
    let pulse = node.pulse;
    let (halo, core) = if pulse.is_active() {
        (palette.reward.with_alpha(0.5 * pulse.value()), palette.reward)
    } else if node.terminal {
        (palette.value_dim, palette.value)
    } else {
        (palette.state_dim, palette.state)
    };
    surface.glow(node.pos(), r * 3.0, halo);
    surface.fill_circle(node.pos(), r, core.fade(0.4 + node.value * 0.4));
    surface.fill_circle(node.pos(), r * 0.35, core);
}

/// Gaussian-looking blob of three nested ellipses with a `μ` marker.
fn draw_cloud<S: Surface + ?Sized>(at: Point, time: f64, palette: &Palette, surface: &mut S) {
    let phase = time * 0.001;
    for i in 0..3 {
        let offset = i as f64 * 0.3;
        let r = 20.0 + i as f64 * 15.0;
        let oval = Oval {
            center: at + Vec2::new((phase + offset).sin() * 5.0, (phase + offset).cos() * 3.0),
            radii: Vec2::new(r * 1.5, r),
            rotation: phase * 0.1,
        };
        surface.fill_oval(oval, palette.value_dim.with_alpha(0.08 - i as f64 * 0.02));
    }
    surface.text(&TextRun::new(
        "μ",
        at + Vec2::new(0.0, 4.0),
        10.0,
        palette.formula.with_alpha(0.15),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DARK;
    use crate::surface::{Command, Recorder};
    use crate::trigger::NoTriggers;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn pool_sizes_follow_canvas() {
        assert_eq!(HeroScene::pool_sizes(Size::new(1440.0, 900.0)), (12, 25));
        assert_eq!(HeroScene::pool_sizes(Size::new(600.0, 400.0)), (5, 6));
        assert_eq!(HeroScene::pool_sizes(Size::ZERO), (0, 0));
    }

    #[test]
    fn pulsed_node_glows_in_reward_color() {
        let mut rng = SmallRng::seed_from_u64(8);
        let size = Size::new(1200.0, 800.0);
        let mut scene = HeroScene::new(size, Box::new(NoTriggers), 0.94, &mut rng);
        scene.states_mut()[0] = scene.states()[0].trigger();
        let mut rec = Recorder::new();
        scene.frame(16.0, &DARK, &mut rng, &mut rec);
        let reward_glows = rec.count(|c| {
            matches!(c, Command::Glow { color, .. }
                if (color.r, color.g, color.b) == (DARK.reward.r, DARK.reward.g, DARK.reward.b))
        });
        assert_eq!(reward_glows, 1);
    }

    #[test]
    fn walkers_stay_on_small_canvas() {
        let mut rng = SmallRng::seed_from_u64(21);
        let size = Size::new(400.0, 300.0);
        let mut scene = HeroScene::new(size, Box::new(NoTriggers), 0.94, &mut rng);
        let mut rec = Recorder::new();
        for f in 0..2000 {
            scene.frame(f as f64 * 16.0, &DARK, &mut rng, &mut rec);
            rec.take();
            for w in scene.walkers() {
                assert!(geom::contains(size.to_rect(), w.pos), "frame {f}: {:?}", w.pos);
            }
        }
    }
}
