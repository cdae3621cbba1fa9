use kurbo::Size;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, Window};

use crate::{ColorMode, Error, Result};

pub(super) fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| Error::Dom("no window".into()))
}

pub(super) fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| Error::Dom("no document".into()))
}

/// `Ok(None)` when no element has this id.
pub(super) fn find_canvas(id: &str) -> Result<Option<HtmlCanvasElement>> {
    let Some(el) = document()?.get_element_by_id(id) else {
        return Ok(None);
    };
    el.dyn_into::<HtmlCanvasElement>()
        .map(Some)
        .map_err(|_| Error::Dom(format!("#{id} is not a canvas")))
}

/// Current `data-theme` of `<html>`, re-read on every call.
pub(super) fn color_mode() -> ColorMode {
    let attr = document()
        .ok()
        .and_then(|d| d.document_element())
        .and_then(|root| root.get_attribute("data-theme"));
    ColorMode::from_attribute(attr.as_deref())
}

pub(super) fn prefers_reduced_motion() -> bool {
    window()
        .ok()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|query| query.matches())
}

pub(super) fn document_visible() -> bool {
    document().map(|d| !d.hidden()).unwrap_or(true)
}

pub(super) fn now_ms() -> f64 {
    window()
        .ok()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Size of the canvas' container, which the canvas is stretched to fill.
pub(super) fn container_size(canvas: &HtmlCanvasElement) -> Size {
    match canvas.parent_element() {
        Some(parent) => {
            let rect = parent.get_bounding_client_rect();
            Size::new(rect.width(), rect.height())
        }
        None => Size::new(canvas.client_width() as f64, canvas.client_height() as f64),
    }
}

pub(super) fn fit_canvas(canvas: &HtmlCanvasElement, size: Size) {
    canvas.set_width(size.width.max(0.0) as u32);
    canvas.set_height(size.height.max(0.0) as u32);
}

pub(super) fn supports_intersection_observer(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

pub(super) fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}
