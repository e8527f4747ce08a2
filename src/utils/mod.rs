//! Utility functions module
//!
//! This module contains formatting helpers and the injectable time sources.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main functions
pub use clock::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use format::{format_duration, parse_duration};
pub use signals::{ignore_hangup, shutdown_signal};
