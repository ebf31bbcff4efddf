use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlElement};

use super::dom;
use crate::config::PopupConfig;
use crate::error::{Error, Result};
use crate::popup::{confetti_burst, ConfettiPiece, Popup, PopupSpawner};

pub const LAYER_ID: &str = "popup-layer";

struct Layer {
    document: Document,
    root: HtmlElement,
}

impl Layer {
    /// Append a styled element and schedule its removal.
    fn add(&self, class: &str, text: Option<&str>, styles: &[(&str, String)], lifetime_ms: i32) -> Result<()> {
        let el = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| Error::Resource("popup element"))?;
        el.set_class_name(class);
        if let Some(text) = text {
            el.set_text_content(Some(text));
        }
        let style = el.style();
        for (name, value) in styles {
            style.set_property(name, value)?;
        }
        self.root.append_child(&el)?;

        let remove = Closure::once_into_js(move || el.remove());
        dom::window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            remove.unchecked_ref(),
            lifetime_ms,
        )?;
        Ok(())
    }

    fn popup(&self, p: &Popup) -> Result<()> {
        self.add(
            "popup",
            Some(&p.text),
            &[
                ("left", format!("{:.2}%", p.left)),
                ("top", format!("{:.2}%", p.top)),
                ("color", p.color.clone()),
                ("font-size", format!("{}px", p.font_px)),
                ("--tilt", format!("{:.1}deg", p.tilt_deg)),
                ("animation-duration", format!("{}ms", p.duration_ms)),
            ],
            p.duration_ms,
        )
    }

    fn confetti(&self, c: &ConfettiPiece) -> Result<()> {
        self.add(
            "confetti",
            None,
            &[
                ("left", format!("{:.2}%", c.left)),
                ("width", format!("{}px", c.width_px)),
                ("height", format!("{}px", c.height_px)),
                ("background", c.color.to_string()),
                ("--drift", format!("{:.2}vw", c.drift)),
                ("--spin", format!("{:.0}deg", c.spin_deg)),
                ("animation-duration", format!("{}ms", c.fall_ms)),
                ("animation-delay", format!("{}ms", c.delay_ms)),
            ],
            (c.fall_ms + c.delay_ms) as i32,
        )
    }
}

/// Emit the confetti burst and start the popup timer. The timer clears
/// itself once the spawner reaches its maximum.
pub fn start(document: &Document, cfg: PopupConfig) -> Result<()> {
    let layer = Layer {
        document: document.clone(),
        root: dom::element_by_id::<HtmlElement>(document, LAYER_ID)?,
    };
    let mut rng: SmallRng = dom::rng();

    let burst = confetti_burst(&mut rng, cfg.confetti);
    let failed = burst.iter().filter(|piece| layer.confetti(piece).is_err()).count();
    if failed > 0 {
        log::warn!("{failed} of {} confetti pieces not shown", burst.len());
    }

    let mut spawner = PopupSpawner::new(cfg);
    let interval_ms = spawner.interval_ms().max(1);
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let window = dom::window()?;

    let tick = {
        let handle = Rc::clone(&handle);
        let window = window.clone();
        Closure::wrap(Box::new(move || {
            let tick = spawner.tick(&mut rng);
            if let Some(popup) = &tick.popup {
                if let Err(e) = layer.popup(popup) {
                    log::warn!("popup #{} not shown: {e}", spawner.count());
                }
            }
            if tick.stop {
                if let Some(id) = handle.take() {
                    window.clear_interval_with_handle(id);
                    log::info!("all {} popups shown", spawner.max());
                }
            }
        }) as Box<dyn FnMut()>)
    };
    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        interval_ms,
    )?;
    handle.set(Some(id));
    tick.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }

    #[wasm_bindgen_test]
    async fn burst_and_timer_fill_the_layer_then_stop() {
        let document = dom::document().unwrap();
        let layer = document.create_element("div").unwrap();
        layer.set_id(LAYER_ID);
        document.body().unwrap().append_child(&layer).unwrap();

        let cfg = PopupConfig {
            max: 2,
            interval_ms: 1,
            lifetime_ms: 10_000,
            confetti: 3,
            ..PopupConfig::default()
        };
        start(&document, cfg).unwrap();
        assert_eq!(layer.child_element_count(), 3, "confetti is emitted up front");

        sleep(300).await;
        assert_eq!(layer.child_element_count(), 5);
        sleep(300).await;
        assert_eq!(layer.child_element_count(), 5, "timer kept spawning past the cap");
        layer.remove();
    }
}
