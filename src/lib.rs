// ============================================================================
// QR FIELD SCANNER - Escáner QR por cámara para formularios (RUST PURO)
// ============================================================================
// Arquitectura:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: ScannerSession (estado + ciclo de vida del escaneo)
// - Services: Colaboradores externos detrás de traits (host, cámara, decoder)
// - State: State Management con Rc<RefCell>
// - Models: Tipos compartidos
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod viewmodels;
pub mod state;
pub mod dom;
pub mod views;
pub mod utils;
pub mod app;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;
use std::cell::RefCell;
use crate::app::ScannerApp;
use crate::config::CONFIG;
use crate::models::TargetField;

pub use crate::error::ScanError;
pub use crate::models::ScanState;
pub use crate::viewmodels::{ScannerDeps, ScannerSession, SessionSettings};

/// Campos Link que reciben el botón de escaneo por defecto
const DEFAULT_LINK_DOCTYPES: &[&str] = &["Item"];

// Instancia global de la app (trigger + formatters)
thread_local! {
    static APP: RefCell<Option<ScannerApp>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    // Inicializar logging
    if CONFIG.is_logging_enabled() {
        wasm_logger::init(Config::default());
    }
    log::info!("🚀 QR Field Scanner - Rust Puro");

    let doctypes = DEFAULT_LINK_DOCTYPES.iter().map(|d| d.to_string()).collect();
    install_scan_trigger(None, doctypes, None)
}

/// Instalar (o reinstalar) el trigger de escaneo
///
/// `root_selector`: elemento donde se escuchan los clicks (por defecto `<body>`).
/// `link_doctypes`: tipos de documento cuyos campos Link muestran el botón.
/// `config_json`: JSON parcial que sobrescribe la configuración compilada.
#[wasm_bindgen]
pub fn install_scan_trigger(
    root_selector: Option<String>,
    link_doctypes: Vec<String>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => CONFIG.with_overrides(&json).map_err(|e| JsValue::from_str(&e))?,
        None => CONFIG.clone(),
    };

    let root: web_sys::EventTarget = match root_selector {
        Some(selector) => crate::dom::document()
            .ok_or_else(|| JsValue::from_str("No document"))?
            .query_selector(&selector)?
            .ok_or_else(|| JsValue::from_str(&format!("{} not found", selector)))?
            .into(),
        None => crate::dom::body()
            .ok_or_else(|| JsValue::from_str("No <body>"))?
            .into(),
    };

    // Soltar la instancia anterior antes de registrar la nueva
    uninstall_scan_trigger();

    let mut app = ScannerApp::new(config);
    app.install_trigger(&root)?;
    for doctype in &link_doctypes {
        if let Err(e) = app.register_link_formatter(doctype) {
            log::warn!("⚠️ [APP] Formatter de {} no registrado: {}", doctype, e);
        }
    }

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    log::info!("✅ [APP] Trigger de escaneo instalado");
    Ok(())
}

/// Quitar el trigger y los formatters registrados
#[wasm_bindgen]
pub fn uninstall_scan_trigger() {
    let previous = APP.with(|cell| cell.borrow_mut().take());
    if previous.is_some() {
        log::info!("🧹 [APP] Trigger de escaneo desinstalado");
    }
}

/// Abrir el escáner desde JavaScript
///
/// Sin doctype/docname/fieldname completos solo se llama al callback.
#[wasm_bindgen]
pub fn open_scanner(
    doctype: Option<String>,
    docname: Option<String>,
    fieldname: Option<String>,
    callback: Option<js_sys::Function>,
) -> Result<(), JsValue> {
    let target = match (doctype, docname, fieldname) {
        (Some(c), Some(r), Some(f)) => Some(TargetField::new(c, r, f)),
        _ => None,
    };

    let on_result = move |text: String| {
        if let Some(callback) = callback {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&text)) {
                log::error!("❌ [APP] Error en el callback: {:?}", e);
            }
        }
    };

    APP.with(|cell| {
        if let Some(app) = cell.borrow().as_ref() {
            app.open_scanner(target.clone(), on_result);
            return Ok(());
        }
        // Sin trigger instalado: app efímera solo para esta sesión
        ScannerApp::new(CONFIG.clone()).open_scanner(target.clone(), on_result);
        Ok(())
    })
}
