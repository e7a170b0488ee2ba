// ============================================================================
// TOAST VIEW - Notificaciones flotantes
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;
use crate::models::Notice;

/// Renderizar un toast para una notificación
pub fn render_toast(notice: &Notice) -> Result<Element, JsValue> {
    let toast = ElementBuilder::new("div")?
        .class(&format!("qr-toast indicator-{}", notice.severity.indicator()))
        .attr("role", "alert")?
        .build();

    if let Some(title) = &notice.title {
        let title_el = ElementBuilder::new("strong")?
            .class("qr-toast-title")
            .text(title)
            .build();
        toast.append_child(&title_el)?;
    }

    let message = ElementBuilder::new("div")?
        .class("qr-toast-message")
        .text(&notice.message)
        .build();
    toast.append_child(&message)?;

    Ok(toast)
}
