pub mod target_field;
pub mod scan_state;
pub mod notice;
pub mod frame;

pub use target_field::TargetField;
pub use scan_state::ScanState;
pub use notice::{Notice, Severity};
pub use frame::Frame;
