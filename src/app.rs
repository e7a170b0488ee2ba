// ============================================================================
// APP - Cableado del escáner: colaboradores web, trigger y formatters
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};
use crate::config::ScannerConfig;
use crate::dom::{closest_attribute, on_click, ScopedListener};
use crate::error::ScanError;
use crate::models::TargetField;
use crate::services::{
    frappe_available, AnimationFrameScheduler, DomHost, FormatterRegistration, FrappeHost,
    HostUi, JsQrDecoder, ScriptDecoderProvider, WebCamera,
};
use crate::viewmodels::{ScannerDeps, ScannerSession, SessionSettings};
use crate::views::render_scan_button;

/// Instancia del escáner en la página
///
/// El listener de click y los formatters viven lo mismo que la app: al hacer
/// drop (ver `uninstall_scan_trigger`) se quitan del DOM y de Frappe.
pub struct ScannerApp {
    config: ScannerConfig,
    deps: ScannerDeps,
    frappe: Option<Rc<FrappeHost>>,
    trigger: Option<ScopedListener>,
    formatters: Vec<FormatterRegistration>,
}

impl ScannerApp {
    /// Crear app con los colaboradores del navegador
    pub fn new(config: ScannerConfig) -> Self {
        let frappe = frappe_available().then(|| Rc::new(FrappeHost::new()));
        let host: Rc<dyn HostUi> = match &frappe {
            Some(frappe) => frappe.clone() as Rc<dyn HostUi>,
            None => Rc::new(DomHost::new(config.ui_config.toast_millis)),
        };
        log::info!(
            "🧩 [APP] Host UI: {}",
            if frappe.is_some() { "Frappe desk" } else { "DOM" }
        );

        let deps = ScannerDeps {
            host,
            decoder_provider: Rc::new(ScriptDecoderProvider::from_config(&config)),
            decoder: Rc::new(JsQrDecoder),
            camera: Rc::new(WebCamera::new()),
            scheduler: Rc::new(AnimationFrameScheduler),
        };

        Self {
            config,
            deps,
            frappe,
            trigger: None,
            formatters: Vec::new(),
        }
    }

    fn settings(&self) -> SessionSettings {
        SessionSettings::from_config(&self.config)
    }

    /// Abrir un escáner; el resultado llega a `on_result` y al campo destino
    pub fn open_scanner<F>(&self, target: Option<TargetField>, on_result: F) -> ScannerSession
    where
        F: FnOnce(String) + 'static,
    {
        let session = ScannerSession::new(self.deps.clone(), self.settings(), target, on_result);
        session.spawn_present();
        session
    }

    /// Escuchar clicks en los botones de escaneo dentro de `root`
    pub fn install_trigger(&mut self, root: &EventTarget) -> Result<(), ScanError> {
        let deps = self.deps.clone();
        let settings = self.settings();
        let selector = self.config.ui_config.trigger_selector.clone();

        let listener = on_click(root, move |event| {
            let button = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&selector).ok().flatten());
            let Some(button) = button else {
                return;
            };
            event.prevent_default();
            event.stop_propagation();

            let target = TargetField::from_attributes(|name| closest_attribute(&button, name));
            match &target {
                Some(target) => log::info!("📷 [TRIGGER] Escanear para {}", target),
                None => log::warn!("⚠️ [TRIGGER] Botón sin data-doctype/docname/fieldname, solo callback"),
            }

            let session = ScannerSession::new(deps.clone(), settings.clone(), target, |text| {
                log::info!("✅ [TRIGGER] Resultado: {}", text);
            });
            session.spawn_present();
        })?;

        // Reemplaza (y desregistra) el trigger anterior
        self.trigger = Some(listener);
        Ok(())
    }

    /// Añadir el botón "Scan" a los campos Link de `container` (solo desk Frappe)
    pub fn register_link_formatter(&mut self, container: &str) -> Result<(), ScanError> {
        let Some(frappe) = &self.frappe else {
            log::info!("ℹ️ [TRIGGER] Sin Frappe, no se registra formatter para {}", container);
            return Ok(());
        };

        let show_button = self.config.ui_config.show_scan_button;
        let lang = self.config.language.clone();
        let icon = FrappeHost::scan_icon();
        let formatter: Rc<dyn Fn(&str) -> String> =
            Rc::new(move |value| render_scan_button(value, show_button, &icon, &lang));

        let registration = frappe.register_link_formatter(container, formatter)?;
        self.formatters.push(registration);
        Ok(())
    }
}
