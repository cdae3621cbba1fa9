use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::dom;
use super::render::{fit_canvas_and_log, js_error, Shared};

/// Timers may fire a hair early against `performance.now()`.
const TIMER_SLACK_MS: f64 = 2.0;

/// Page subscriptions of one mount. Dropping it unsubscribes everything and
/// cancels a pending resize.
pub(super) struct Watchers {
    _visibility: EventListener,
    _viewport: Option<Viewport>,
    _resize: EventListener,
}

impl Watchers {
    pub(super) fn install(shared: &Shared, threshold: f64) -> Result<Self, JsValue> {
        Ok(Self {
            _visibility: watch_visibility(shared.clone())?,
            _viewport: watch_viewport(shared.clone(), threshold)?,
            _resize: watch_resize(shared.clone())?,
        })
    }
}

/// Pause while the tab is hidden, resume when it comes back.
fn watch_visibility(shared: Shared) -> Result<EventListener, JsValue> {
    let document = dom::document().map_err(js_error)?;
    Ok(EventListener::new(&document, "visibilitychange", move |_| {
        let visible = dom::document_visible();
        let m = &mut *shared.borrow_mut();
        m.animation.set_document_visible(visible, &mut m.host);
    }))
}

/// A live `IntersectionObserver`, disconnected on drop.
struct Viewport {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Drop for Viewport {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Pause while less than `threshold` of the canvas is in the viewport.
/// Without `IntersectionObserver` the canvas counts as always visible.
fn watch_viewport(shared: Shared, threshold: f64) -> Result<Option<Viewport>, JsValue> {
    let window = dom::window().map_err(js_error)?;
    if !dom::supports_intersection_observer(&window) {
        log::info!("IntersectionObserver unavailable; animating regardless of scroll position");
        return Ok(None);
    }
    let canvas = shared.borrow().canvas.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
        let m = &mut *shared.borrow_mut();
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let ratio = if entry.is_intersecting() {
                entry.intersection_ratio()
            } else {
                0.0
            };
            m.animation.set_intersection(ratio, &mut m.host);
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(&canvas);
    Ok(Some(Viewport {
        observer,
        _callback: callback,
    }))
}

/// Rebuild the scene once resizing has been quiet for the debounce delay.
fn watch_resize(shared: Shared) -> Result<EventListener, JsValue> {
    let window = dom::window().map_err(js_error)?;
    // Replacing the timeout drops, and so cancels, the previous one.
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    Ok(EventListener::new(&window, "resize", move |_| {
        let delay = {
            let m = &mut *shared.borrow_mut();
            let size = dom::container_size(&m.canvas);
            m.animation.note_resize(size, dom::now_ms())
        };
        let shared = shared.clone();
        let timeout = Timeout::new(delay.ceil() as u32, move || {
            let m = &mut *shared.borrow_mut();
            if let Some(size) = m.animation.settle_resize(dom::now_ms() + TIMER_SLACK_MS) {
                fit_canvas_and_log(&m.canvas, size);
            }
        });
        pending.borrow_mut().replace(timeout);
    }))
}
