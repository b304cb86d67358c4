//! Shared utilities for partview CLI binaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_duration_ms, format_number};
pub use logging::init_logging;
