// ============================================================================
// DOM HOST - HostUi autónomo (modal + toasts propios) para páginas sin desk
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement};
use crate::dom::{body, document, set_text_content};
use crate::error::ScanError;
use crate::models::{Notice, TargetField};
use crate::models::target_field::{ATTR_CONTAINER, ATTR_FIELD, ATTR_RECORD};
use crate::services::host_ui::{HostUi, ModalContent, ModalSurface};
use crate::services::video::{HtmlVideoSurface, VideoSurface};
use crate::utils::html::escape_css_attr;
use crate::views::{render_scanner, render_toast, ScannerIds, ScannerView};

/// Selector del campo destino
pub fn field_selector(target: &TargetField) -> String {
    format!(
        r#"[{}="{}"][{}="{}"][{}="{}"]"#,
        ATTR_CONTAINER,
        escape_css_attr(&target.container_id),
        ATTR_RECORD,
        escape_css_attr(&target.record_id),
        ATTR_FIELD,
        escape_css_attr(&target.field_id),
    )
}

/// HostUi que pinta su propio modal
pub struct DomHost {
    seq: Cell<u32>,
    toast_millis: u32,
}

impl DomHost {
    pub fn new(toast_millis: u32) -> Self {
        Self {
            seq: Cell::new(0),
            toast_millis,
        }
    }

    fn mount_point() -> Result<Element, ScanError> {
        body()
            .map(Element::from)
            .ok_or_else(|| ScanError::Dom("No <body>".to_string()))
    }
}

struct DomSurface {
    view: ScannerView,
    video: Rc<HtmlVideoSurface>,
}

impl ModalSurface for DomSurface {
    fn video(&self) -> Rc<dyn VideoSurface> {
        self.video.clone()
    }

    fn set_status(&self, text: &str) {
        set_text_content(&self.view.status, text);
    }

    fn hide(&self) {
        self.view.modal.remove();
    }
}

impl HostUi for DomHost {
    fn show_modal(
        &self,
        content: &ModalContent,
        on_primary: Rc<dyn Fn()>,
    ) -> Result<Rc<dyn ModalSurface>, ScanError> {
        let seq = self.seq.get().wrapping_add(1);
        self.seq.set(seq);
        let ids = ScannerIds::for_session(seq);

        let view = render_scanner(content, &ids, on_primary)?;
        Self::mount_point()?.append_child(&view.modal)?;

        let video = Rc::new(HtmlVideoSurface::new(view.video.clone()));
        Ok(Rc::new(DomSurface { view, video }))
    }

    fn notify(&self, notice: &Notice) {
        let shown = render_toast(notice)
            .map_err(ScanError::from)
            .and_then(|toast| {
                Self::mount_point()?.append_child(&toast)?;
                Ok(toast)
            });

        match shown {
            Ok(toast) => {
                Timeout::new(self.toast_millis, move || toast.remove()).forget();
            }
            Err(e) => log::error!("❌ [SCANNER] No se pudo mostrar la notificación: {}", e),
        }
    }

    fn set_field_value(&self, target: &TargetField, value: &str) -> Result<(), ScanError> {
        let document = document().ok_or_else(|| ScanError::Dom("No document".to_string()))?;
        let field = document
            .query_selector(&field_selector(target))?
            .ok_or_else(|| ScanError::Dom(format!("field {} not found", target)))?;

        let input = match field.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.clone(),
            None => field
                .query_selector("input")?
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .ok_or_else(|| ScanError::Dom(format!("field {} has no <input>", target)))?,
        };

        input.set_value(value);
        input.dispatch_event(&Event::new("change")?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matches_all_three_attributes() {
        let selector = field_selector(&TargetField::new("Item", "X", "item_code"));
        assert_eq!(
            selector,
            r#"[data-doctype="Item"][data-docname="X"][data-fieldname="item_code"]"#
        );
    }

    #[test]
    fn selector_escapes_quotes() {
        let selector = field_selector(&TargetField::new("Item", r#"A"B"#, "f"));
        assert!(selector.contains(r#"[data-docname="A\"B"]"#));
    }
}
