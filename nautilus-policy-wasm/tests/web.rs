//! Browser tests. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use nautilus_policy_wasm::{bandwidth_params, optimized_image_url, LiteModeHandle};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn unknown_quality_label_is_js_error() {
    assert!(optimized_image_url("/a.png", None, "warp").is_err());
    assert!(bandwidth_params("warp").is_err());
}

#[wasm_bindgen_test]
fn motion_callback_receives_flag() {
    let callback = js_sys::Function::new_with_args("reduced", "globalThis.__reduced = reduced;");
    let mut handle = LiteModeHandle::with_motion_callback(callback);
    handle.on_signal(true, Some("2g".into()), false, None, None);
    let seen = js_sys::Reflect::get(&js_sys::global(), &"__reduced".into()).unwrap();
    assert_eq!(seen.as_bool(), Some(true));
}
