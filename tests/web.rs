#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn webgl2_context_is_available() {
    let canvas = document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    let ctx = canvas.get_context("webgl2").unwrap();
    assert!(ctx.is_some(), "browser under test lacks WebGL2");
}

#[wasm_bindgen_test]
fn config_block_overrides_defaults() {
    let doc = document();
    let script = doc.create_element("script").unwrap();
    script.set_id("scene-config-test");
    script.set_attribute("type", "application/json").unwrap();
    script.set_text_content(Some(r#"{"popups": {"max": 7}}"#));
    doc.body().unwrap().append_child(&script).unwrap();

    let text = doc
        .get_element_by_id("scene-config-test")
        .and_then(|el| el.text_content())
        .unwrap();
    let cfg = event_horizon::Config::from_json(&text).unwrap();
    assert_eq!(cfg.popups.max, 7);
    assert_eq!(cfg.particles.count, 1000);
    script.remove();
}
