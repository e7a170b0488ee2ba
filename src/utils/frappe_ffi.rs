// ============================================================================
// FRAPPE FFI - Foreign Function Interface para el desk de Frappe
// ============================================================================
// Wrappers de frappe.ui.Dialog, frappe.msgprint, frappe.show_alert,
// frappe.model.set_value y frappe.utils.icon - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Dialog)]
    pub type FrappeDialog;

    #[wasm_bindgen(catch, constructor, js_namespace = ["frappe", "ui"])]
    pub fn new(options: &JsValue) -> Result<FrappeDialog, JsValue>;

    #[wasm_bindgen(method)]
    pub fn show(this: &FrappeDialog);

    #[wasm_bindgen(method)]
    pub fn hide(this: &FrappeDialog);

    #[wasm_bindgen(catch, js_namespace = frappe, js_name = msgprint)]
    pub fn msgprint(options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = frappe, js_name = show_alert)]
    pub fn show_alert(options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["frappe", "model"], js_name = set_value)]
    pub fn set_value(
        doctype: &str,
        docname: &str,
        fieldname: &str,
        value: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["frappe", "utils"], js_name = icon)]
    pub fn icon(name: &str, size: &str) -> Result<JsValue, JsValue>;
}

/// Objeto `frappe.form.link_formatters` (None fuera del desk)
pub fn link_formatters() -> Option<js_sys::Object> {
    let window = web_sys::window()?;
    let frappe = js_sys::Reflect::get(&window, &JsValue::from_str("frappe")).ok()?;
    let form = js_sys::Reflect::get(&frappe, &JsValue::from_str("form")).ok()?;
    js_sys::Reflect::get(&form, &JsValue::from_str("link_formatters"))
        .ok()?
        .dyn_into::<js_sys::Object>()
        .ok()
}
