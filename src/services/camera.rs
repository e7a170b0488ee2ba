// ============================================================================
// CAMERA SERVICE - Captura de cámara (navigator.mediaDevices.getUserMedia)
// ============================================================================

use futures::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};
use crate::config::ScannerConfig;
use crate::error::ScanError;

/// Restricciones de la petición de cámara
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConstraints {
    pub facing_mode: String,
}

impl CameraConstraints {
    /// Preferir la cámara trasera
    pub fn rear() -> Self {
        Self {
            facing_mode: "environment".to_string(),
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            facing_mode: config.camera_config.facing_mode.clone(),
        }
    }
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self::rear()
    }
}

/// Pista de un stream (vídeo, audio)
pub trait MediaTrack {
    fn stop(&self);
}

/// Stream de cámara activo
pub trait CameraStream {
    fn tracks(&self) -> Vec<Box<dyn MediaTrack>>;

    /// MediaStream del navegador, para enlazarlo a un <video>
    fn media_stream(&self) -> Option<MediaStream> {
        None
    }
}

/// Proveedor de streams de cámara
pub trait CameraProvider {
    fn request_camera(
        &self,
        constraints: &CameraConstraints,
    ) -> LocalBoxFuture<'static, Result<Box<dyn CameraStream>, ScanError>>;
}

/// Cámara del navegador
#[derive(Clone, Default)]
pub struct WebCamera;

impl WebCamera {
    pub fn new() -> Self {
        Self
    }
}

impl CameraProvider for WebCamera {
    fn request_camera(
        &self,
        constraints: &CameraConstraints,
    ) -> LocalBoxFuture<'static, Result<Box<dyn CameraStream>, ScanError>> {
        let facing_mode = constraints.facing_mode.clone();
        async move {
            let acquisition = |e: JsValue| ScanError::Acquisition(ScanError::describe(&e));

            let devices = web_sys::window()
                .ok_or_else(|| ScanError::Acquisition("No window".to_string()))?
                .navigator()
                .media_devices()
                .map_err(acquisition)?;

            let video = js_sys::Object::new();
            js_sys::Reflect::set(&video, &JsValue::from_str("facingMode"), &JsValue::from_str(&facing_mode))
                .map_err(acquisition)?;

            let request = MediaStreamConstraints::new();
            request.set_video(&video);

            log::info!("📷 [CAMERA] Solicitando cámara (facingMode={})", facing_mode);
            let promise = devices
                .get_user_media_with_constraints(&request)
                .map_err(acquisition)?;
            let stream = JsFuture::from(promise).await.map_err(acquisition)?;
            let stream: MediaStream = stream
                .dyn_into()
                .map_err(|_| ScanError::Acquisition("getUserMedia did not return a MediaStream".to_string()))?;

            log::info!("✅ [CAMERA] Cámara concedida");
            Ok(Box::new(WebCameraStream { stream }) as Box<dyn CameraStream>)
        }
        .boxed_local()
    }
}

/// Stream devuelto por getUserMedia
pub struct WebCameraStream {
    stream: MediaStream,
}

impl CameraStream for WebCameraStream {
    fn tracks(&self) -> Vec<Box<dyn MediaTrack>> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
            .map(|track| Box::new(WebTrack { track }) as Box<dyn MediaTrack>)
            .collect()
    }

    fn media_stream(&self) -> Option<MediaStream> {
        Some(self.stream.clone())
    }
}

struct WebTrack {
    track: MediaStreamTrack,
}

impl MediaTrack for WebTrack {
    fn stop(&self) {
        self.track.stop();
    }
}
