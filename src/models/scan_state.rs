use serde::{Deserialize, Serialize};

/// Estados de una sesión de escaneo
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub enum ScanState {
    #[default]
    Idle,
    LoadingDecoder,
    /// La librería no cargó; no se muestra UI (terminal)
    InitFailed,
    UiShown,
    Polling,
    /// Cámara denegada o no disponible; el modal sigue abierto
    Error,
    /// Código encontrado (terminal)
    Decoded,
    /// Cerrado por el usuario (terminal)
    Closed,
}

impl ScanState {
    /// Estado final: la sesión ya no hace nada más
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::InitFailed | ScanState::Decoded | ScanState::Closed)
    }

    /// Clave i18n del texto de estado mostrado en el modal
    pub fn status_key(self) -> Option<&'static str> {
        match self {
            ScanState::LoadingDecoder => Some("loading_decoder"),
            ScanState::UiShown => Some("waiting_camera"),
            ScanState::Polling => Some("scanning"),
            ScanState::Error => Some("camera_error_title"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(ScanState::Decoded.is_terminal());
        assert!(ScanState::Closed.is_terminal());
        assert!(ScanState::InitFailed.is_terminal());
        // ERROR espera el cierre manual
        assert!(!ScanState::Error.is_terminal());
        assert!(!ScanState::Polling.is_terminal());
    }
}
