#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Decorative canvas backgrounds for an academic portfolio site: particle
//! networks, an MDP state graph with reward pulses, entropy and knowledge
//! graph backdrops, agent-environment and trajectory-optimisation sketches.
//!
//! Everything outside `wasm` is host-agnostic and runs under plain
//! `cargo test`; the `wasm` module binds it to the DOM.

pub mod animation;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod geom;
pub mod graph;
pub mod palette;
pub mod scene;
pub mod surface;
pub mod trigger;

pub use animation::Animation;
pub use config::{EngineConfig, NetworkOptions};
pub use driver::{Debounce, FrameDriver, FrameHost, Lifecycle};
pub use error::{Error, Result};
pub use palette::{ColorMode, Palette, Rgba};
pub use scene::{Scene, SceneKind};
pub use surface::{Recorder, Surface};
#[cfg(target_arch = "wasm32")]
pub use wasm::{mount, mount_page, SceneHandle};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod events;
    mod render;

    pub use render::SceneHandle;

    /// Mounts the page's canvases once the module is loaded.
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        let mounted = render::mount_page();
        log::debug!("{} scene(s) mounted on load", mounted.len());
    }

    /// Mounts `#hero-particles` and `#page-background` if present, skipping
    /// (and logging) any that fail. Runs on load; call it again only for
    /// canvases added afterwards.
    #[wasm_bindgen(js_name = mountPage)]
    pub fn mount_page() -> Vec<SceneHandle> {
        render::mount_page()
    }

    /// Mounts `scene` on the canvas with id `canvas_id`. Returns `undefined`
    /// when the canvas is missing or reduced motion is requested.
    #[wasm_bindgen]
    pub fn mount(
        canvas_id: &str,
        scene: &str,
        options: JsValue,
    ) -> Result<Option<SceneHandle>, JsValue> {
        let kind = scene.parse::<crate::SceneKind>().map_err(render::js_error)?;
        let config = render::parse_options(options)?;
        render::mount(canvas_id, kind, &config)
    }
}
