// ============================================================================
// HOST UI - Contrato con la aplicación anfitriona (modal, alertas, campos)
// ============================================================================

use std::rc::Rc;
use crate::error::ScanError;
use crate::models::{Notice, TargetField};
use crate::services::video::VideoSurface;

/// Contenido del modal del escáner: región de vídeo + región de estado
#[derive(Clone, Debug, PartialEq)]
pub struct ModalContent {
    pub title: String,
    pub primary_label: String,
    pub initial_status: String,
    pub video_max_width_px: u32,
}

/// Modal visible, propiedad exclusiva de la sesión que lo abrió
pub trait ModalSurface {
    /// Elemento de vídeo del modal
    fn video(&self) -> Rc<dyn VideoSurface>;

    /// Actualizar la región de estado
    fn set_status(&self, text: &str);

    /// Ocultar y destruir el modal
    fn hide(&self);
}

/// Servicios de UI que ofrece la aplicación anfitriona
pub trait HostUi {
    /// Mostrar un modal; `on_primary` se ejecuta con la acción principal (Cerrar)
    fn show_modal(
        &self,
        content: &ModalContent,
        on_primary: Rc<dyn Fn()>,
    ) -> Result<Rc<dyn ModalSurface>, ScanError>;

    fn hide_modal(&self, surface: &dyn ModalSurface) {
        surface.hide();
    }

    /// Mostrar una notificación al usuario
    fn notify(&self, notice: &Notice);

    /// Escribir un valor en un campo de formulario
    fn set_field_value(&self, target: &TargetField, value: &str) -> Result<(), ScanError>;
}
