//! Timer and preset models
//!
//! This module contains the data types shared by the stores and the controller.

pub mod preset;
pub mod timer;

// Re-export main types
pub use preset::{CustomTimer, PresetKey};
pub use timer::{RunningTimer, TimerId, TimerRecord, RECORD_SUFFIX};
