use std::cell::RefCell;
use std::f64::consts::TAU;
use std::fmt;
use std::rc::Rc;

use js_sys::Array;
use kurbo::{Point, Rect, Size};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::dom;
use super::events::Watchers;
use crate::surface::{Align, Oval, Stroke, Surface, TextRun};
use crate::{Animation, EngineConfig, FrameHost, Rgba, SceneKind};

/// The hero canvas on the landing page.
const HERO_CANVAS: &str = "hero-particles";
/// Per-page background canvas, themed by its `data-scene` attribute.
const BACKGROUND_CANVAS: &str = "page-background";

pub(super) type Shared = Rc<RefCell<Mount>>;

/// Everything one mounted canvas needs between callbacks.
///
/// The frame callback and the page listeners hold the `Shared` handle, so a
/// mount stays alive until [`SceneHandle::destroy`] drops them.
pub(super) struct Mount {
    pub(super) animation: Animation,
    pub(super) surface: CanvasSurface,
    pub(super) host: RafHost,
    pub(super) canvas: HtmlCanvasElement,
    watchers: Option<Watchers>,
}

/// JS-side handle to a mounted scene.
#[wasm_bindgen]
pub struct SceneHandle {
    shared: Shared,
}

#[wasm_bindgen]
impl SceneHandle {
    /// Resumes a stopped scene. Does nothing once destroyed.
    pub fn start(&self) {
        let m = &mut *self.shared.borrow_mut();
        if m.watchers.is_some() {
            m.animation.start(&mut m.host);
        }
    }

    pub fn stop(&self) {
        let m = &mut *self.shared.borrow_mut();
        m.animation.stop(&mut m.host);
    }

    /// Stops the scene for good: cancels the pending frame, removes the page
    /// listeners and disconnects the viewport observer. Idempotent.
    pub fn destroy(&self) {
        let (watchers, callback) = {
            let m = &mut *self.shared.borrow_mut();
            m.animation.stop(&mut m.host);
            (m.watchers.take(), m.host.release())
        };
        // Dropped outside the borrow: both hold clones of `shared`.
        if watchers.is_some() {
            log::debug!("{} scene destroyed", self.scene());
        }
        drop(watchers);
        drop(callback);
    }

    #[wasm_bindgen(getter)]
    pub fn scene(&self) -> String {
        self.shared.borrow().animation.scene().kind().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        format!("{:?}", self.shared.borrow().animation.state()).to_lowercase()
    }

    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.shared.borrow().animation.frames() as f64
    }
}

pub(super) fn js_error(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub(super) fn parse_options(options: JsValue) -> Result<EngineConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(EngineConfig::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(js_error)
}

pub(super) fn fit_canvas_and_log(canvas: &HtmlCanvasElement, size: Size) {
    dom::fit_canvas(canvas, size);
    log::debug!("canvas resized to {}x{}", size.width, size.height);
}

/// Mounts the well-known canvases present on the current page. Failures
/// are logged and skipped so one bad canvas never blocks the other.
pub(super) fn mount_page() -> Vec<SceneHandle> {
    let config = EngineConfig::default();
    [
        (HERO_CANVAS, Some(SceneKind::Hero)),
        (BACKGROUND_CANVAS, None),
    ]
    .into_iter()
    .filter_map(|(id, fallback)| match mount_declared(id, fallback, &config) {
        Ok(handle) => handle,
        Err(err) => {
            let reason = err.as_string().unwrap_or_else(|| format!("{err:?}"));
            log::warn!("#{id}: {reason}");
            None
        }
    })
    .collect()
}

/// Mounts the scene named by the canvas' `data-scene` (or legacy
/// `data-theme`) attribute, or `fallback` when it has neither.
fn mount_declared(
    id: &str,
    fallback: Option<SceneKind>,
    config: &EngineConfig,
) -> Result<Option<SceneHandle>, JsValue> {
    let Some(canvas) = dom::find_canvas(id).map_err(js_error)? else {
        return Ok(None);
    };
    let name = canvas
        .get_attribute("data-scene")
        .or_else(|| canvas.get_attribute("data-theme"));
    let kind = match (name, fallback) {
        (Some(name), _) => name.parse().map_err(js_error)?,
        (None, Some(kind)) => kind,
        (None, None) => {
            log::debug!("#{id} has no scene attribute");
            return Ok(None);
        }
    };
    mount(id, kind, config)
}

/// Builds the scene, wires the page events and starts the frame loop.
pub(super) fn mount(
    canvas_id: &str,
    kind: SceneKind,
    config: &EngineConfig,
) -> Result<Option<SceneHandle>, JsValue> {
    let Some(canvas) = dom::find_canvas(canvas_id).map_err(js_error)? else {
        log::debug!("no #{canvas_id} on this page; {kind} scene not mounted");
        return Ok(None);
    };
    if dom::prefers_reduced_motion() {
        log::info!("reduced motion requested; {kind} scene not started");
        return Ok(None);
    }
    let Some(ctx) = canvas.get_context("2d")? else {
        log::warn!("#{canvas_id}: 2d context unavailable");
        return Ok(None);
    };
    let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;

    let size = dom::container_size(&canvas);
    dom::fit_canvas(&canvas, size);
    let animation =
        Animation::new(kind, size, config, dom::random_seed(), false).map_err(js_error)?;

    // `callback` holds the animation-frame closure so that it can keep
    // re-requesting itself. It is filled in once the shared state exists.
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let window = dom::window().map_err(js_error)?;
    let shared: Shared = Rc::new(RefCell::new(Mount {
        animation,
        surface: CanvasSurface {
            ctx,
            canvas: canvas.clone(),
        },
        host: RafHost {
            window,
            callback: callback.clone(),
            handle: None,
        },
        canvas,
        watchers: None,
    }));

    let frame_state = shared.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let m = &mut *frame_state.borrow_mut();
        m.animation
            .on_frame(timestamp, dom::color_mode(), &mut m.surface, &mut m.host);
    }) as Box<dyn FnMut(f64)>));

    let watchers = match Watchers::install(&shared, config.visibility_threshold) {
        Ok(watchers) => watchers,
        Err(err) => {
            let callback = shared.borrow_mut().host.release();
            drop(callback);
            return Err(err);
        }
    };
    {
        let m = &mut *shared.borrow_mut();
        m.watchers = Some(watchers);
        m.animation
            .set_document_visible(dom::document_visible(), &mut m.host);
        m.animation.start(&mut m.host);
    }
    log::debug!("mounted {kind} scene on #{canvas_id}");
    Ok(Some(SceneHandle { shared }))
}

/// Schedules frames through `requestAnimationFrame`.
pub(super) struct RafHost {
    window: Window,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Option<i32>,
}

impl RafHost {
    /// Cancels any pending frame and hands back the frame callback.
    fn release(&mut self) -> Option<Closure<dyn FnMut(f64)>> {
        self.cancel_frame();
        self.callback.borrow_mut().take()
    }
}

impl FrameHost for RafHost {
    fn request_frame(&mut self) {
        if let Some(cb) = self.callback.borrow().as_ref() {
            self.handle = self
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .ok();
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}

/// `Surface` over a 2D canvas context. Failed calls are dropped.
pub(super) struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
}

#[allow(deprecated)]
impl CanvasSurface {
    fn set_fill(&self, color: Rgba) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_string()));
    }

    fn set_stroke(&self, stroke: Stroke) {
        self.ctx.set_stroke_style(&JsValue::from_str(&stroke.color.to_string()));
        self.ctx.set_line_width(stroke.width);
        let segments = match stroke.dash {
            Some([on, off]) => Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
            None => Array::new(),
        };
        let _ = self.ctx.set_line_dash(&segments);
    }

    fn trace(&self, points: &[Point], close: bool) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        if close {
            self.ctx.close_path();
        }
        true
    }

    fn trace_oval(&self, oval: Oval) -> bool {
        self.ctx.begin_path();
        self.ctx
            .ellipse(
                oval.center.x,
                oval.center.y,
                oval.radii.x.max(0.0),
                oval.radii.y.max(0.0),
                oval.rotation,
                0.0,
                TAU,
            )
            .is_ok()
    }

    fn draw_text(&self, run: &TextRun) -> Result<(), JsValue> {
        self.ctx.save();
        let drawn = self.fill_text_at_origin(run);
        self.ctx.restore();
        drawn
    }

    /// Transforms the context to the run's anchor and draws it. Callers
    /// bracket this with `save` / `restore`.
    fn fill_text_at_origin(&self, run: &TextRun) -> Result<(), JsValue> {
        self.ctx.translate(run.anchor.x, run.anchor.y)?;
        self.ctx.rotate(run.rotation)?;
        self.ctx.scale(run.scale, run.scale)?;
        self.ctx.set_font(&run.font());
        self.ctx.set_text_align(match run.align {
            Align::Left => "left",
            Align::Center => "center",
        });
        self.set_fill(run.color);
        self.ctx.fill_text(&run.text, 0.0, 0.0)
    }

    fn draw_glow(&self, center: Point, radius: f64, color: Rgba) -> Result<(), JsValue> {
        let radius = radius.max(0.0);
        let gradient = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)?;
        gradient.add_color_stop(0.0, &color.to_string())?;
        gradient.add_color_stop(1.0, &Rgba::TRANSPARENT.to_string())?;
        self.ctx.set_fill_style(&gradient);
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.set_fill(color);
        self.ctx.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.set_stroke(stroke);
        self.ctx.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU).is_ok() {
            self.set_fill(color);
            self.ctx.fill();
        }
    }

    fn glow(&mut self, center: Point, radius: f64, color: Rgba) {
        let _ = self.draw_glow(center, radius, color);
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.polyline(&[from, to], stroke);
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        if self.trace(points, false) {
            self.set_stroke(stroke);
            self.ctx.stroke();
        }
    }

    fn stroke_oval(&mut self, oval: Oval, stroke: Stroke) {
        if self.trace_oval(oval) {
            self.set_stroke(stroke);
            self.ctx.stroke();
        }
    }

    fn fill_oval(&mut self, oval: Oval, color: Rgba) {
        if self.trace_oval(oval) {
            self.set_fill(color);
            self.ctx.fill();
        }
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius.max(0.0), start, end).is_ok() {
            self.set_stroke(stroke);
            self.ctx.stroke();
        }
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if self.trace(points, true) {
            self.set_fill(color);
            self.ctx.fill();
        }
    }

    fn text(&mut self, run: &TextRun) {
        let _ = self.draw_text(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn offscreen_surface() -> CanvasSurface {
        let canvas: HtmlCanvasElement = dom::document()
            .unwrap()
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        let ctx = canvas.get_context("2d").unwrap().unwrap().dyn_into().unwrap();
        CanvasSurface { ctx, canvas }
    }

    #[wasm_bindgen_test]
    fn text_restores_the_transform() {
        let mut surface = offscreen_surface();
        let run = TextRun::new("θ*", Point::new(40.0, 30.0), 12.0, Rgba::opaque(255, 255, 255))
            .transformed(0.4, 1.5);
        surface.text(&run);
        surface.text(&run);
        let m = surface.ctx.get_transform().unwrap();
        assert_eq!((m.a(), m.b(), m.c(), m.d()), (1.0, 0.0, 0.0, 1.0));
        assert_eq!((m.e(), m.f()), (0.0, 0.0));
    }
}
