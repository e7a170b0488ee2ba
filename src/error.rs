// ============================================================================
// ERRORES DEL ESCÁNER
// ============================================================================

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errores de una sesión de escaneo
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// La librería de decodificación no se pudo cargar (fatal para la sesión)
    #[error("decoder library could not be loaded: {0}")]
    Initialization(String),

    /// Permiso de cámara denegado o cámara no disponible
    #[error("camera could not be acquired: {0}")]
    Acquisition(String),

    /// Fallo de una API del navegador al construir o manejar la UI
    #[error("DOM error: {0}")]
    Dom(String),
}

impl ScanError {
    /// Convertir un JsValue de error en texto legible
    pub fn describe(value: &JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value))
    }
}

impl From<JsValue> for ScanError {
    fn from(value: JsValue) -> Self {
        ScanError::Dom(Self::describe(&value))
    }
}

impl From<ScanError> for JsValue {
    fn from(err: ScanError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
