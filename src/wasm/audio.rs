use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlAudioElement};

use super::dom;
use crate::config::AudioConfig;
use crate::error::Result;

/// Background music bound to an `<audio>` element on the page.
pub struct Music {
    element: HtmlAudioElement,
}

impl Music {
    pub fn find(document: &Document, cfg: &AudioConfig) -> Result<Self> {
        let element = dom::element_by_id::<HtmlAudioElement>(document, &cfg.element_id)?;
        element.set_volume(cfg.volume.clamp(0.0, 1.0));
        element.set_loop(cfg.looped);
        Ok(Self { element })
    }

    /// Start playback. Browsers reject `play()` without a user gesture;
    /// that rejection is logged and otherwise ignored.
    pub fn play(&self) {
        match self.element.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("music playback rejected: {e:?}");
                }
            }),
            Err(e) => log::debug!("music playback failed: {e:?}"),
        }
    }
}
