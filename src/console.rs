#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(message: &str);
}

/// Writes a warning to the browser console. No-op off the web.
pub(crate) fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    console_warn(message);

    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}
