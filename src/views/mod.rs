// ============================================================================
// VIEWS - Funciones que renderizan DOM (sin lógica)
// ============================================================================

pub mod scanner;
pub mod scan_button;
pub mod toast;

pub use scanner::*;
pub use scan_button::*;
pub use toast::*;
