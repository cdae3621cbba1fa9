use kurbo::{Point, Rect, Size, Vec2};
use rand::Rng;

use crate::entity::Seeker;
use crate::geom;
use crate::palette::Palette;
use crate::surface::{Stroke, Surface, TextRun};

const AGENTS: usize = 5;
const BLOCKS: usize = 8;

/// Obstacle or goal cell in the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub center: Point,
    pub side: f64,
    pub goal: bool,
}

impl Block {
    fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.side, self.side))
    }
}

/// Agents wandering between goals over a sparse grid world.
#[derive(Debug, Clone)]
pub struct AgentEnvScene {
    size: Size,
    agents: Vec<Seeker>,
    blocks: Vec<Block>,
}

impl AgentEnvScene {
    pub fn new<R: Rng + ?Sized>(size: Size, rng: &mut R) -> Self {
        let mut scene = Self {
            size,
            agents: Vec::new(),
            blocks: Vec::new(),
        };
        scene.reseed(size, rng);
        scene
    }

    fn goals(&self) -> Rect {
        geom::inset(self.size, 50.0)
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        self.size = size;
        let start = geom::inset(size, 100.0);
        let goals = self.goals();
        self.agents = (0..AGENTS).map(|_| Seeker::spawn(start, goals, rng)).collect();
        self.blocks = (0..BLOCKS)
            .map(|_| Block {
                center: geom::random_in(size.to_rect(), rng),
                side: 20.0 + rng.random::<f64>() * 30.0,
                goal: rng.random_bool(0.3),
            })
            .collect();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn agents(&self) -> &[Seeker] {
        &self.agents
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn frame<R, S>(&mut self, palette: &Palette, rng: &mut R, surface: &mut S)
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        surface.fill_rect(self.size.to_rect(), palette.background);

        for block in &self.blocks {
            let color = if block.goal {
                palette.reward_dim
            } else {
                palette.state_dim
            };
            surface.stroke_rect(block.rect(), Stroke::solid(color, 1.0));
            if block.goal {
                surface.fill_rect(block.rect(), palette.reward_dim);
            }
        }

        let goals = self.goals();
        for agent in &mut self.agents {
            *agent = agent.advance(goals, rng);
            surface.line(
                agent.pos,
                agent.target,
                Stroke::dashed(palette.action_dim, 1.0, 4.0, 4.0),
            );
            surface.fill_circle(agent.pos, 6.0, palette.action_dim);

            let heading = agent.heading();
            let tip = agent.pos + Vec2::from_angle(heading) * 10.0;
            let left = agent.pos + Vec2::from_angle(heading - 0.5) * 6.0;
            let right = agent.pos + Vec2::from_angle(heading + 0.5) * 6.0;
            surface.fill_polygon(&[tip, left, right], palette.action.fade(0.3));
        }

        surface.text(&TextRun::new(
            "s → a → s' → r",
            Point::new(self.size.width / 2.0, 40.0),
            10.0,
            palette.text,
        ));
    }
}
