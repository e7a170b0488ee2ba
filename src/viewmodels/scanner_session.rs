// ============================================================================
// SCANNER SESSION - Cámara + polling de frames + entrega del resultado
// ============================================================================
// Una sesión por click. Ciclo de vida lineal:
//   Idle → LoadingDecoder → UiShown → Polling → Decoded | Closed
// con InitFailed (librería no cargada) y Error (cámara denegada) como salidas.
// Invariantes:
// - como mucho un stream activo, y solo mientras se hace polling
// - on_result se ejecuta como mucho una vez (FnOnce tomado del Option)
// - el stream se libera siempre antes de ocultar el modal
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::models::{Frame, Notice, ScanState, TargetField};
use crate::services::{
    CameraConstraints, CameraProvider, CameraStream, Decoder, DecoderProvider, FrameScheduler,
    HostUi, ModalContent, ModalSurface,
};
use crate::state::ReactiveState;
use crate::utils::i18n::t;

/// Colaboradores de una sesión
#[derive(Clone)]
pub struct ScannerDeps {
    pub host: Rc<dyn HostUi>,
    pub decoder_provider: Rc<dyn DecoderProvider>,
    pub decoder: Rc<dyn Decoder>,
    pub camera: Rc<dyn CameraProvider>,
    pub scheduler: Rc<dyn FrameScheduler>,
}

/// Ajustes de presentación y de cámara
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub lang: String,
    pub constraints: CameraConstraints,
    pub video_max_width_px: u32,
}

impl SessionSettings {
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            lang: config.language.clone(),
            constraints: CameraConstraints::from_config(config),
            video_max_width_px: config.ui_config.video_max_width_px,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&ScannerConfig::default())
    }
}

struct SessionInner {
    deps: ScannerDeps,
    settings: SessionSettings,
    target_field: Option<TargetField>,
    on_result: RefCell<Option<Box<dyn FnOnce(String)>>>,
    surface: RefCell<Option<Rc<dyn ModalSurface>>>,
    stream: RefCell<Option<Box<dyn CameraStream>>>,
    acquiring: Cell<bool>,
    state: ReactiveState<ScanState>,
}

/// Sesión de escaneo (handle barato de clonar)
#[derive(Clone)]
pub struct ScannerSession {
    inner: Rc<SessionInner>,
}

impl ScannerSession {
    pub fn new<F>(
        deps: ScannerDeps,
        settings: SessionSettings,
        target_field: Option<TargetField>,
        on_result: F,
    ) -> Self
    where
        F: FnOnce(String) + 'static,
    {
        Self {
            inner: Rc::new(SessionInner {
                deps,
                settings,
                target_field,
                on_result: RefCell::new(Some(Box::new(on_result))),
                surface: RefCell::new(None),
                stream: RefCell::new(None),
                acquiring: Cell::new(false),
                state: ReactiveState::new(ScanState::Idle),
            }),
        }
    }

    pub fn state(&self) -> ScanState {
        self.inner.state.value()
    }

    pub fn target_field(&self) -> Option<&TargetField> {
        self.inner.target_field.as_ref()
    }

    /// ¿Hay un stream de cámara activo?
    pub fn is_streaming(&self) -> bool {
        self.inner.stream.borrow().is_some()
    }

    /// Observar los cambios de estado
    pub fn on_state_change<F>(&self, callback: F)
    where
        F: Fn(&ScanState) + 'static,
    {
        self.inner.state.subscribe(callback);
    }

    /// Cargar el decodificador si aún no está disponible
    pub async fn ensure_decoder_available(&self) -> Result<(), ScanError> {
        self.inner.deps.decoder_provider.ensure_loaded().await
    }

    /// Cargar decoder, abrir el modal y empezar a escanear
    pub async fn present(&self) -> Result<(), ScanError> {
        if self.state() != ScanState::Idle {
            log::warn!("⚠️ [SCANNER] present() ignorado en estado {:?}", self.state());
            return Ok(());
        }

        self.transition(ScanState::LoadingDecoder);
        if let Err(err) = self.ensure_decoder_available().await {
            log::error!("❌ [SCANNER] {}", err);
            self.transition(ScanState::InitFailed);
            self.inner.deps.host.notify(&Notice::error(
                self.tr("decoder_error_title"),
                self.tr("decoder_error_message"),
            ));
            return Err(err);
        }

        let content = ModalContent {
            title: self.tr("scan_qr_code"),
            primary_label: self.tr("close"),
            initial_status: self.tr("waiting_camera"),
            video_max_width_px: self.inner.settings.video_max_width_px,
        };

        // El modal guarda este closure: el ciclo sesión ↔ modal se rompe al ocultarlo
        let session = self.clone();
        let on_primary: Rc<dyn Fn()> = Rc::new(move || session.close());

        let surface = match self.inner.deps.host.show_modal(&content, on_primary) {
            Ok(surface) => surface,
            Err(err) => {
                log::error!("❌ [SCANNER] No se pudo abrir el modal: {}", err);
                self.transition(ScanState::InitFailed);
                return Err(err);
            }
        };
        *self.inner.surface.borrow_mut() = Some(surface);
        self.transition(ScanState::UiShown);

        self.acquire_and_poll().await
    }

    /// Lanzar present() en el executor del navegador
    pub fn spawn_present(&self) {
        let session = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = session.present().await {
                log::warn!("⚠️ [SCANNER] Sesión terminada con error: {}", err);
            }
        });
    }

    /// Pedir la cámara trasera y, si se concede, arrancar el polling
    pub async fn acquire_and_poll(&self) -> Result<(), ScanError> {
        if self.state() != ScanState::UiShown || self.inner.acquiring.get() {
            return Ok(());
        }

        self.inner.acquiring.set(true);
        let requested = self
            .inner
            .deps
            .camera
            .request_camera(&self.inner.settings.constraints)
            .await;
        self.inner.acquiring.set(false);

        let stream = match requested {
            Ok(stream) => stream,
            Err(err) => {
                if self.state() == ScanState::UiShown {
                    self.report_acquisition_error(&err);
                }
                return Err(err);
            }
        };

        // Cerrado mientras el usuario respondía al permiso
        if self.state() != ScanState::UiShown {
            log::info!("📷 [SCANNER] Cámara concedida tras cerrar, liberando");
            release(stream.as_ref());
            return Ok(());
        }

        let surface = self.inner.surface.borrow().clone();
        let attached = match surface {
            Some(surface) => surface.video().attach(stream.as_ref()),
            None => Err(ScanError::Acquisition("no video surface".to_string())),
        };
        if let Err(err) = attached {
            release(stream.as_ref());
            self.report_acquisition_error(&err);
            return Err(err);
        }

        *self.inner.stream.borrow_mut() = Some(stream);
        self.transition(ScanState::Polling);
        log::info!("📷 [SCANNER] Escaneando...");
        self.schedule_poll();
        Ok(())
    }

    /// Un paso del polling: capturar, decodificar y replanificar si no hay código
    pub fn poll_frame(&self) {
        if !self.is_streaming() {
            return;
        }

        if let Some(text) = self.capture_and_decode() {
            self.finish(text);
            return;
        }

        if self.is_streaming() {
            self.schedule_poll();
        }
    }

    /// Liberar la cámara (idempotente)
    pub fn stop(&self) {
        let stream = self.inner.stream.borrow_mut().take();
        if let Some(stream) = stream {
            release(stream.as_ref());
            let surface = self.inner.surface.borrow().clone();
            if let Some(surface) = surface {
                surface.video().detach();
            }
            log::info!("🛑 [SCANNER] Cámara liberada");
        }
    }

    /// Acción principal del modal: liberar la cámara y después ocultar
    pub fn close(&self) {
        self.stop();
        if !self.state().is_terminal() {
            self.transition(ScanState::Closed);
        }
        self.hide_surface();
    }

    fn capture_and_decode(&self) -> Option<String> {
        let surface = self.inner.surface.borrow().clone()?;
        let frame: Frame = surface.video().capture_frame()?;
        if !frame.is_complete() {
            return None;
        }

        self.inner
            .deps
            .decoder
            .decode(&frame.data, frame.width, frame.height)
            .filter(|text| !text.is_empty())
    }

    fn finish(&self, text: String) {
        log::info!("📱 [SCANNER] Código detectado: {}", text);

        self.stop();
        self.transition(ScanState::Decoded);
        self.hide_surface();

        let callback = self.inner.on_result.borrow_mut().take();
        if let Some(callback) = callback {
            callback(text.clone());
        }

        if let Some(target) = &self.inner.target_field {
            if let Err(err) = self.inner.deps.host.set_field_value(target, &text) {
                log::error!("❌ [SCANNER] No se pudo escribir {}: {}", target, err);
            }
        }

        self.inner.deps.host.notify(&Notice::success(self.tr("scan_success")));
    }

    fn schedule_poll(&self) {
        let session = self.clone();
        self.inner
            .deps
            .scheduler
            .schedule_next_frame(Box::new(move || session.poll_frame()));
    }

    fn hide_surface(&self) {
        let surface = self.inner.surface.borrow_mut().take();
        if let Some(surface) = surface {
            self.inner.deps.host.hide_modal(surface.as_ref());
        }
    }

    fn report_acquisition_error(&self, err: &ScanError) {
        log::error!("❌ [SCANNER] Error de cámara: {}", err);
        self.transition(ScanState::Error);
        self.inner.deps.host.notify(&Notice::error(
            self.tr("camera_error_title"),
            self.tr("camera_error_message"),
        ));
    }

    fn transition(&self, next: ScanState) {
        let previous = self.state();
        if previous == next {
            return;
        }
        log::debug!("🔄 [SCANNER] {:?} → {:?}", previous, next);
        self.inner.state.set(next);

        if let Some(key) = next.status_key() {
            let surface = self.inner.surface.borrow().clone();
            if let Some(surface) = surface {
                surface.set_status(&self.tr(key));
            }
        }
    }

    fn tr(&self, key: &str) -> String {
        t(key, &self.inner.settings.lang)
    }
}

/// Parar todas las pistas de un stream
fn release(stream: &dyn CameraStream) {
    for track in stream.tracks() {
        track.stop();
    }
}
