//! HTTP handlers for riddle operations.

pub mod riddle;
pub use riddle::dispatch;
