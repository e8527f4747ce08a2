//! Background tasks module
//!
//! This module contains the detached countdown that fires a timer and the
//! launcher that starts it.

pub mod countdown;
pub mod launcher;

// Re-export main types
pub use countdown::{run_countdown, CountdownOutcome};
pub use launcher::{LaunchRequest, Launcher, ProcessLauncher};
