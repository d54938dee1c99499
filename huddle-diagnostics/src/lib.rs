//! # Huddle Diagnostics
//!
//! Debugging helpers for Huddle.
//! Provides structured logging setup and serialisable snapshots of the
//! media a call holds.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod debug_logger;
pub mod error;
pub mod report;

// Re-export main types
pub use debug_logger::DebugLogger;
pub use error::DiagnosticsError;
pub use report::{CallReport, DeviceInventory, StreamReport, TrackReport};
