use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Event, EventTarget, Window};

use crate::error::{Error, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(Error::NoDocument)
}

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::ElementNotFound(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| Error::WrongElement {
            id: id.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

/// Window size in device pixels.
pub fn drawing_size(window: &Window) -> (u32, u32) {
    let css = |v: std::result::Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(1.0)
    };
    let dpr = window.device_pixel_ratio().max(1.0);
    let w = (css(window.inner_width()) * dpr).round().max(1.0);
    let h = (css(window.inner_height()) * dpr).round().max(1.0);
    (w as u32, h as u32)
}

pub fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64)
}

/// Register `handler` for `event`; events of another type are ignored.
/// The listener lives for the rest of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F) -> Result<()>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(move |ev: Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
