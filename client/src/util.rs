use std::cell::RefCell;

use sycamore::prelude::Signal;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Storage, Window};

pub fn log(msg: &str) { web_sys::console::log_1(&JsValue::from_str(msg)); }

pub fn window() -> Option<Window> { web_sys::window() }

// milliseconds on the same clock `requestAnimationFrame` reports
pub fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn local_storage() -> Option<Storage> { window()?.local_storage().ok().flatten() }

pub fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    window()?.document()?.get_element_by_id(id)?.dyn_into().ok()
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

pub fn focus_by_id(id: &str) -> bool {
    let elem = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());
    elem.map_or(false, |e| e.focus().is_ok())
}

pub fn device_pixel_ratio() -> f64 { window().map_or(1.0, |w| w.device_pixel_ratio()) }

// allows `op` to run with a `&mut T` of the signal value, then notifies subscribers
// untracked so effects writing to the signal don't depend on it
pub fn with_signal_mut_untracked<T, R>(signal: &Signal<RefCell<T>>, op: impl FnOnce(&mut T) -> R) -> R {
    let value_rc = signal.get_untracked();
    let result = {
        // dropped before `Signal::set_rc` borrows the inner rc again
        let mut value = value_rc.borrow_mut();
        op(&mut value)
    };
    signal.set_rc(value_rc);
    result
}
