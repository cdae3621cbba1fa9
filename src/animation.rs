//! A scene bound to its frame driver: the unit a canvas mounts.

use kurbo::Size;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::driver::{Debounce, FrameDriver, FrameHost, Lifecycle};
use crate::error::Result;
use crate::palette::{ColorMode, Palette};
use crate::scene::{Scene, SceneKind};
use crate::surface::Surface;

#[derive(Debug)]
pub struct Animation {
    scene: Scene,
    driver: FrameDriver,
    resize: Debounce,
    pending_size: Option<Size>,
    rng: SmallRng,
}

impl Animation {
    /// Builds the scene for `size`. `reduced_motion` is read once here and
    /// never re-checked.
    pub fn new(
        kind: SceneKind,
        size: Size,
        config: &EngineConfig,
        seed: u64,
        reduced_motion: bool,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(config.seed.unwrap_or(seed));
        let scene = Scene::build(kind, size, config, &mut rng);
        Ok(Self::from_scene(scene, config, rng, reduced_motion))
    }

    /// Wraps an already-built scene, e.g. one with a custom trigger source.
    pub fn from_scene(
        scene: Scene,
        config: &EngineConfig,
        rng: SmallRng,
        reduced_motion: bool,
    ) -> Self {
        if reduced_motion {
            log::debug!("reduced motion requested; {} scene stays still", scene.kind());
        }
        Self {
            scene,
            driver: FrameDriver::new(reduced_motion).with_threshold(config.visibility_threshold),
            resize: Debounce::new(config.resize_debounce_ms),
            pending_size: None,
            rng,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn state(&self) -> Lifecycle {
        self.driver.state()
    }

    pub fn frames(&self) -> u64 {
        self.driver.frames()
    }

    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        self.driver.start(host);
    }

    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        self.driver.stop(host);
    }

    pub fn set_document_visible<H: FrameHost + ?Sized>(&mut self, visible: bool, host: &mut H) {
        self.driver.set_document_visible(visible, host);
    }

    pub fn set_intersection<H: FrameHost + ?Sized>(&mut self, ratio: f64, host: &mut H) {
        self.driver.set_intersection(ratio, host);
    }

    /// Notes a viewport resize; returns the delay after which
    /// [`Animation::settle_resize`] should be called.
    pub fn note_resize(&mut self, size: Size, now_ms: f64) -> f64 {
        self.pending_size = Some(size);
        self.resize.touch(now_ms)
    }

    /// Re-seeds the scene once the resize burst has gone quiet. Returns the
    /// new size when a rebuild happened. Running/paused state is untouched.
    pub fn settle_resize(&mut self, now_ms: f64) -> Option<Size> {
        if !self.resize.due(now_ms) {
            return None;
        }
        let size = self.pending_size.take()?;
        self.scene.reseed(size, &mut self.rng);
        Some(size)
    }

    /// Frame callback: gate on the driver, resolve the palette, advance and
    /// draw. Returns whether anything was drawn.
    pub fn on_frame<S, H>(
        &mut self,
        timestamp: f64,
        mode: ColorMode,
        surface: &mut S,
        host: &mut H,
    ) -> bool
    where
        S: Surface + ?Sized,
        H: FrameHost + ?Sized,
    {
        if !self.driver.on_frame(timestamp, host) {
            return false;
        }
        let palette = Palette::resolve(mode);
        self.scene.frame(timestamp, palette, &mut self.rng, surface);
        true
    }
}
