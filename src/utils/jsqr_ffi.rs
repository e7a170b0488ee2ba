// ============================================================================
// JSQR FFI - Foreign Function Interface para la librería jsQR
// ============================================================================
// Wrapper sin estado: la librería se carga con ScriptDecoderProvider
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `jsQR(data, width, height)` → objeto `{ data, ... }` o `null`
    #[wasm_bindgen(catch, js_name = jsQR)]
    pub fn js_qr(
        data: &js_sys::Uint8ClampedArray,
        width: u32,
        height: u32,
    ) -> Result<JsValue, JsValue>;
}
