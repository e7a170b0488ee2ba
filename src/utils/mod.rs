// Utils compartidos

pub mod i18n;
pub mod html;
pub mod jsqr_ffi;
pub mod frappe_ffi;

pub use i18n::*;
