use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, KeyboardEvent, MouseEvent};

use super::audio::Music;
use super::dom::listen;
use super::popups;
use crate::config::Config;
use crate::error::Result;
use crate::popup::StartGate;

const HINT_ID: &str = "start-hint";

/// The first click or key press starts the music and the popups.
pub fn install(document: &Document, cfg: Config) -> Result<()> {
    let music = match Music::find(document, &cfg.audio) {
        Ok(music) => Some(music),
        Err(e) => {
            log::warn!("no background music: {e}");
            None
        }
    };
    let gate = RefCell::new(StartGate::new());
    let doc = document.clone();

    let start: Rc<dyn Fn()> = Rc::new(move || {
        if !gate.borrow_mut().trigger() {
            return;
        }
        log::info!("show started");
        if let Some(hint) = doc.get_element_by_id(HINT_ID) {
            hint.class_list().add_1("hidden").ok();
        }
        if let Some(music) = &music {
            music.play();
        }
        if let Err(e) = popups::start(&doc, cfg.popups.clone()) {
            log::error!("popups failed to start: {e}");
        }
    });

    {
        let start = Rc::clone(&start);
        listen(document, "click", move |_: MouseEvent| start())?;
    }
    listen(document, "keydown", move |_: KeyboardEvent| start())?;
    Ok(())
}
