#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod bloom;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod popup;
pub mod scene;

pub use config::Config;
pub use error::{Error, Result};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::{Config, CONFIG_ELEMENT_ID};
    use crate::error::Error;

    mod audio;
    mod composer;
    mod controls;
    mod dom;
    mod gl;
    mod popups;
    mod render;
    mod show;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let document = dom::document()?;
        let canvas = dom::element_by_id::<web_sys::HtmlCanvasElement>(&document, "c")?;
        let config = load_config(&document);

        render::start(canvas, &config).map_err(|e| {
            log::error!("renderer failed to start: {e}");
            e
        })?;
        show::install(&document, config)?;
        log::info!("event horizon running");
        Ok(())
    }

    /// Defaults, overridden by the page's JSON block when it parses.
    fn load_config(document: &web_sys::Document) -> Config {
        let Some(text) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Config::default();
        };
        Config::from_json(&text).unwrap_or_else(|e: Error| {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            Config::default()
        })
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
