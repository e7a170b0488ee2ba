pub mod scanner_session;

#[cfg(test)]
pub(crate) mod test_support;

pub use scanner_session::{ScannerDeps, ScannerSession, SessionSettings};
