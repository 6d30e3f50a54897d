// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn mounts_and_tears_down() {
    valentine_proposal::start_valentine().unwrap();
    let doc = document();
    assert!(doc.get_element_by_id("vp-root").is_some());
    assert!(doc.get_element_by_id("vp-game").is_some());
    assert!(doc.get_element_by_id("vp-decline").is_some());

    valentine_proposal::teardown();
    assert!(doc.get_element_by_id("vp-root").is_none());
}

#[wasm_bindgen_test]
fn rejects_invalid_config() {
    let res = valentine_proposal::start_valentine_with_config(
        r#"{ "flow": { "evasion": { "vanish_threshold": 0 } } }"#,
    );
    assert!(res.is_err());
    assert!(document().get_element_by_id("vp-root").is_none());
}

#[wasm_bindgen_test]
fn restart_after_teardown_mounts_fresh_controls() {
    use wasm_bindgen::JsCast;

    valentine_proposal::start_valentine().unwrap();
    valentine_proposal::teardown();
    valentine_proposal::start_valentine().unwrap();
    let doc = document();
    let skip: web_sys::HtmlElement = doc.get_element_by_id("vp-skip").unwrap().dyn_into().unwrap();
    // The new mount's listeners are live; the previous ones were dropped.
    skip.click();
    valentine_proposal::game_completed();

    valentine_proposal::teardown();
    assert!(doc.get_element_by_id("vp-root").is_none());
    valentine_proposal::game_completed();
}
