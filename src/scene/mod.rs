//! The fixed set of background compositions, dispatched by `match`.

mod agent_env;
mod entropy;
mod hero;
mod knowledge;
mod network;
mod trajectory;

use std::fmt;
use std::str::FromStr;

use kurbo::Size;
use rand::Rng;

pub use agent_env::{AgentEnvScene, Block};
pub use entropy::{EntropyScene, Histogram};
pub use hero::{HeroScene, FORMULAS};
pub use knowledge::KnowledgeScene;
pub use network::NetworkScene;
pub use trajectory::TrajectoryScene;

use crate::config::EngineConfig;
use crate::error::Error;
use crate::palette::Palette;
use crate::surface::Surface;
use crate::trigger::RewardSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Network,
    Hero,
    Entropy,
    Knowledge,
    AgentEnv,
    Trajectory,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Network,
        SceneKind::Hero,
        SceneKind::Entropy,
        SceneKind::Knowledge,
        SceneKind::AgentEnv,
        SceneKind::Trajectory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Network => "network",
            SceneKind::Hero => "hero",
            SceneKind::Entropy => "entropy",
            SceneKind::Knowledge => "knowledge",
            SceneKind::AgentEnv => "agent",
            SceneKind::Trajectory => "trajectory",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "network" | "particles" => Ok(SceneKind::Network),
            "hero" | "mdp" => Ok(SceneKind::Hero),
            "entropy" => Ok(SceneKind::Entropy),
            "knowledge" | "knowledge-graph" => Ok(SceneKind::Knowledge),
            "agent" | "agent-env" => Ok(SceneKind::AgentEnv),
            "trajectory" => Ok(SceneKind::Trajectory),
            other => Err(Error::UnknownScene(other.to_string())),
        }
    }
}

/// One live composition with its entity pools.
#[derive(Debug)]
pub enum Scene {
    Network(NetworkScene),
    Hero(HeroScene),
    Entropy(EntropyScene),
    Knowledge(KnowledgeScene),
    AgentEnv(AgentEnvScene),
    Trajectory(TrajectoryScene),
}

impl Scene {
    pub fn build<R: Rng + ?Sized>(
        kind: SceneKind,
        size: Size,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Self {
        match kind {
            SceneKind::Network => {
                Scene::Network(NetworkScene::new(size, config.network.clone(), rng))
            }
            SceneKind::Hero => {
                let schedule = RewardSchedule::new(
                    config.reward_interval_ms,
                    config.reward_probability,
                    rng.random(),
                );
                Scene::Hero(HeroScene::new(size, Box::new(schedule), config.pulse_decay, rng))
            }
            SceneKind::Entropy => Scene::Entropy(EntropyScene::new(size, rng)),
            SceneKind::Knowledge => Scene::Knowledge(KnowledgeScene::new(size, rng)),
            SceneKind::AgentEnv => Scene::AgentEnv(AgentEnvScene::new(size, rng)),
            SceneKind::Trajectory => Scene::Trajectory(TrajectoryScene::new(size, rng)),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Network(_) => SceneKind::Network,
            Scene::Hero(_) => SceneKind::Hero,
            Scene::Entropy(_) => SceneKind::Entropy,
            Scene::Knowledge(_) => SceneKind::Knowledge,
            Scene::AgentEnv(_) => SceneKind::AgentEnv,
            Scene::Trajectory(_) => SceneKind::Trajectory,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Scene::Network(s) => s.size(),
            Scene::Hero(s) => s.size(),
            Scene::Entropy(s) => s.size(),
            Scene::Knowledge(s) => s.size(),
            Scene::AgentEnv(s) => s.size(),
            Scene::Trajectory(s) => s.size(),
        }
    }

    /// Total entities across the scene's pools.
    pub fn population(&self) -> usize {
        match self {
            Scene::Network(s) => s.particles().len(),
            Scene::Hero(s) => s.formulas().len() + s.states().len() + s.walkers().len(),
            Scene::Entropy(s) => s.particles().len() + s.histograms().len() + s.labels().len(),
            Scene::Knowledge(s) => s.nodes().len(),
            Scene::AgentEnv(s) => s.agents().len() + s.blocks().len(),
            Scene::Trajectory(s) => s.walkers().len(),
        }
    }

    /// Rebuilds every pool for a new canvas size.
    pub fn reseed<R: Rng + ?Sized>(&mut self, size: Size, rng: &mut R) {
        log::debug!("reseeding {} scene at {}x{}", self.kind(), size.width, size.height);
        match self {
            Scene::Network(s) => s.reseed(size, rng),
            Scene::Hero(s) => s.reseed(size, rng),
            Scene::Entropy(s) => s.reseed(size, rng),
            Scene::Knowledge(s) => s.reseed(size, rng),
            Scene::AgentEnv(s) => s.reseed(size, rng),
            Scene::Trajectory(s) => s.reseed(size, rng),
        }
    }

    /// Advances every entity one frame and draws the result.
    pub fn frame<R, S>(&mut self, time: f64, palette: &Palette, rng: &mut R, surface: &mut S)
    where
        R: Rng + ?Sized,
        S: Surface + ?Sized,
    {
        match self {
            Scene::Network(s) => s.frame(time, palette, surface),
            Scene::Hero(s) => s.frame(time, palette, rng, surface),
            Scene::Entropy(s) => s.frame(time, palette, rng, surface),
            Scene::Knowledge(s) => s.frame(time, palette, surface),
            Scene::AgentEnv(s) => s.frame(palette, rng, surface),
            Scene::Trajectory(s) => s.frame(palette, rng, surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DARK;
    use crate::surface::Recorder;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn parses_names_and_aliases() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
        assert_eq!("knowledge-graph".parse::<SceneKind>().unwrap(), SceneKind::Knowledge);
        assert_eq!("agent-env".parse::<SceneKind>().unwrap(), SceneKind::AgentEnv);
        assert_eq!("mdp".parse::<SceneKind>().unwrap(), SceneKind::Hero);
        assert!(matches!(
            "aurora".parse::<SceneKind>(),
            Err(Error::UnknownScene(name)) if name == "aurora"
        ));
    }

    #[test]
    fn population_is_fixed_across_frames() {
        let mut rng = SmallRng::seed_from_u64(99);
        let config = EngineConfig::default();
        let size = Size::new(1280.0, 720.0);
        for kind in SceneKind::ALL {
            let mut scene = Scene::build(kind, size, &config, &mut rng);
            let population = scene.population();
            assert!(population > 0, "{kind}");
            let mut rec = Recorder::new();
            for f in 0..300 {
                scene.frame(f as f64 * 16.7, &DARK, &mut rng, &mut rec);
                rec.take();
            }
            assert_eq!(scene.population(), population, "{kind}");
        }
    }

    #[test]
    fn reseed_resizes_in_place() {
        let mut rng = SmallRng::seed_from_u64(5);
        let config = EngineConfig::default();
        let mut scene = Scene::build(SceneKind::Hero, Size::new(1440.0, 900.0), &config, &mut rng);
        scene.reseed(Size::new(480.0, 800.0), &mut rng);
        assert_eq!(scene.kind(), SceneKind::Hero);
        assert_eq!(scene.size(), Size::new(480.0, 800.0));
        let Scene::Hero(hero) = &scene else { unreachable!() };
        assert_eq!(hero.formulas().len(), 4);
        assert_eq!(hero.states().len(), 9);
    }
}
