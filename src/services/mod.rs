// ============================================================================
// SERVICES - Colaboradores externos de la sesión (host, cámara, decoder)
// ============================================================================

pub mod host_ui;
pub mod camera;
pub mod video;
pub mod decoder;
pub mod scheduler;
pub mod frappe_host;
pub mod dom_host;

pub use host_ui::{HostUi, ModalContent, ModalSurface};
pub use camera::{CameraConstraints, CameraProvider, CameraStream, MediaTrack, WebCamera};
pub use video::{HtmlVideoSurface, VideoSurface};
pub use decoder::{Decoder, DecoderProvider, JsQrDecoder, ScriptDecoderProvider, SharedLoad};
pub use scheduler::{AnimationFrameScheduler, FrameScheduler};
pub use frappe_host::{frappe_available, FormatterRegistration, FrappeHost};
pub use dom_host::DomHost;
