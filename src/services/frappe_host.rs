// ============================================================================
// FRAPPE HOST - HostUi sobre el desk de Frappe (frappe.ui.Dialog & co.)
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlVideoElement};
use crate::dom::{get_element_by_id, set_text_content};
use crate::error::ScanError;
use crate::models::{Notice, TargetField};
use crate::services::host_ui::{HostUi, ModalContent, ModalSurface};
use crate::services::video::{HtmlVideoSurface, VideoSurface};
use crate::utils::frappe_ffi::{self, FrappeDialog};
use crate::views::{video_region_html, ScannerIds};

#[derive(Serialize)]
struct DialogField<'a> {
    fieldname: &'a str,
    fieldtype: &'a str,
    options: String,
}

#[derive(Serialize)]
struct DialogOptions<'a> {
    title: &'a str,
    fields: Vec<DialogField<'a>>,
    primary_action_label: &'a str,
}

#[derive(Serialize)]
struct MessageOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    message: &'a str,
    indicator: &'a str,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ScanError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| ScanError::Dom(e.to_string()))
}

/// ¿Estamos dentro del desk de Frappe?
pub fn frappe_available() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("frappe")).ok())
        .map(|f| f.is_object())
        .unwrap_or(false)
}

/// HostUi que delega en frappe.*
#[derive(Default)]
pub struct FrappeHost {
    seq: Cell<u32>,
}

impl FrappeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ids(&self) -> ScannerIds {
        let seq = self.seq.get().wrapping_add(1);
        self.seq.set(seq);
        ScannerIds::for_session(seq)
    }

    /// Icono del botón de escaneo (vacío si frappe.utils.icon no existe)
    pub fn scan_icon() -> String {
        frappe_ffi::icon("scan", "xs")
            .ok()
            .and_then(|html| html.as_string())
            .unwrap_or_default()
    }
}

/// Acción de cierre compartida con los callbacks del diálogo
///
/// Frappe conserva los diálogos ocultos (y sus callbacks); al desarmarla se
/// suelta la sesión aunque JS siga guardando el closure.
#[derive(Clone)]
struct DialogAction(Rc<RefCell<Option<Rc<dyn Fn()>>>>);

impl DialogAction {
    fn new(action: Rc<dyn Fn()>) -> Self {
        Self(Rc::new(RefCell::new(Some(action))))
    }

    fn fire(&self) {
        let action = self.0.borrow().clone();
        if let Some(action) = action {
            action();
        }
    }

    fn disarm(&self) {
        self.0.borrow_mut().take();
    }

    /// Closure para JS; el GC de JS es su dueño (onhide llega tras la animación)
    fn js_callback(&self) -> JsValue {
        let action = self.clone();
        Closure::wrap(Box::new(move || action.fire()) as Box<dyn FnMut()>).into_js_value()
    }
}

struct FrappeSurface {
    dialog: FrappeDialog,
    action: DialogAction,
    video: Rc<HtmlVideoSurface>,
    status: Option<Element>,
}

impl ModalSurface for FrappeSurface {
    fn video(&self) -> Rc<dyn VideoSurface> {
        self.video.clone()
    }

    fn set_status(&self, text: &str) {
        if let Some(status) = &self.status {
            set_text_content(status, text);
        }
    }

    fn hide(&self) {
        self.dialog.hide();
        self.action.disarm();
    }
}

impl HostUi for FrappeHost {
    fn show_modal(
        &self,
        content: &ModalContent,
        on_primary: Rc<dyn Fn()>,
    ) -> Result<Rc<dyn ModalSurface>, ScanError> {
        let ids = self.next_ids();

        let options = to_js(&DialogOptions {
            title: &content.title,
            fields: vec![DialogField {
                fieldname: "video_preview",
                fieldtype: "HTML",
                options: video_region_html(&ids, content),
            }],
            primary_action_label: &content.primary_label,
        })?;

        // Cerrar con el botón principal o con la X/Escape del diálogo hace lo mismo
        let action = DialogAction::new(on_primary);
        js_sys::Reflect::set(&options, &JsValue::from_str("primary_action"), &action.js_callback())?;
        js_sys::Reflect::set(&options, &JsValue::from_str("onhide"), &action.js_callback())?;

        let dialog = FrappeDialog::new(&options)?;
        dialog.show();

        let video = match get_element_by_id(&ids.video_id)
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
        {
            Some(video) => video,
            None => {
                action.disarm();
                dialog.hide();
                return Err(ScanError::Dom(format!("#{} not found in dialog", ids.video_id)));
            }
        };

        log::info!("🪟 [SCANNER] Diálogo Frappe abierto ({})", ids.video_id);

        Ok(Rc::new(FrappeSurface {
            dialog,
            action,
            video: Rc::new(HtmlVideoSurface::new(video)),
            status: get_element_by_id(&ids.status_id),
        }))
    }

    fn notify(&self, notice: &Notice) {
        let options = MessageOptions {
            title: notice.title.as_deref(),
            message: &notice.message,
            indicator: notice.severity.indicator(),
        };
        let result = to_js(&options).and_then(|js| {
            // Errores: diálogo bloqueante (msgprint); resto: alerta flotante
            let shown = if notice.title.is_some() {
                frappe_ffi::msgprint(&js)
            } else {
                frappe_ffi::show_alert(&js)
            };
            shown.map_err(ScanError::from)
        });
        if let Err(e) = result {
            log::error!("❌ [SCANNER] No se pudo mostrar la notificación: {}", e);
        }
    }

    fn set_field_value(&self, target: &TargetField, value: &str) -> Result<(), ScanError> {
        frappe_ffi::set_value(&target.container_id, &target.record_id, &target.field_id, value)?;
        log::info!("📝 [SCANNER] {} = {}", target, value);
        Ok(())
    }
}

/// Tabla de propiedades con clave de texto (p.ej. `frappe.form.link_formatters`)
pub trait PropertyTable {
    type Value;

    fn get(&self, key: &str) -> Option<Self::Value>;
    fn set(&self, key: &str, value: Self::Value);
    fn delete(&self, key: &str);
}

/// Propiedad sobrescrita que recupera su valor anterior en Drop
pub struct ScopedProperty<T: PropertyTable> {
    table: T,
    key: String,
    previous: Option<T::Value>,
}

impl<T: PropertyTable> ScopedProperty<T> {
    pub fn install(table: T, key: &str, value: T::Value) -> Self {
        let previous = table.get(key);
        table.set(key, value);
        Self {
            table,
            key: key.to_string(),
            previous,
        }
    }

    /// ¿Había un valor antes de instalar el nuestro?
    pub fn replaced_existing(&self) -> bool {
        self.previous.is_some()
    }
}

impl<T: PropertyTable> Drop for ScopedProperty<T> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(previous) => self.table.set(&self.key, previous),
            None => self.table.delete(&self.key),
        }
    }
}

/// Objeto JS usado como tabla
pub struct JsObjectTable(js_sys::Object);

impl PropertyTable for JsObjectTable {
    type Value = JsValue;

    fn get(&self, key: &str) -> Option<JsValue> {
        js_sys::Reflect::get(&self.0, &JsValue::from_str(key))
            .ok()
            .filter(|value| !value.is_undefined())
    }

    fn set(&self, key: &str, value: JsValue) {
        if let Err(e) = js_sys::Reflect::set(&self.0, &JsValue::from_str(key), &value) {
            log::error!("❌ [TRIGGER] No se pudo asignar {}: {}", key, ScanError::describe(&e));
        }
    }

    fn delete(&self, key: &str) {
        let _ = js_sys::Reflect::delete_property(&self.0, &JsValue::from_str(key));
    }
}

/// Formatter registrado en `frappe.form.link_formatters`
///
/// En Drop se restaura el formatter que hubiera antes para ese doctype.
pub struct FormatterRegistration {
    property: ScopedProperty<JsObjectTable>,
    container: String,
    _closure: Closure<dyn FnMut(JsValue, JsValue) -> JsValue>,
}

impl Drop for FormatterRegistration {
    fn drop(&mut self) {
        log::info!(
            "🧹 [TRIGGER] Formatter de {} eliminado{}",
            self.container,
            if self.property.replaced_existing() { " (restaurado el anterior)" } else { "" }
        );
    }
}

impl FrappeHost {
    /// Registrar la función que pinta los campos Link de `container`
    pub fn register_link_formatter(
        &self,
        container: &str,
        formatter: Rc<dyn Fn(&str) -> String>,
    ) -> Result<FormatterRegistration, ScanError> {
        let formatters = frappe_ffi::link_formatters()
            .ok_or_else(|| ScanError::Dom("frappe.form.link_formatters not available".to_string()))?;

        let closure = Closure::wrap(Box::new(move |value: JsValue, _doc: JsValue| {
            let value = value.as_string().unwrap_or_default();
            JsValue::from_str(&formatter(&value))
        }) as Box<dyn FnMut(JsValue, JsValue) -> JsValue>);

        let property = ScopedProperty::install(
            JsObjectTable(formatters),
            container,
            closure.as_ref().clone(),
        );
        log::info!("🔗 [TRIGGER] Formatter registrado para {}", container);

        Ok(FormatterRegistration {
            property,
            container: container.to_string(),
            _closure: closure,
        })
    }
}
