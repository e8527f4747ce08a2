//! Ding - named countdown timers that fire from detached processes
//!
//! This library keeps each running timer as a file whose name carries its
//! start time and duration, launches one detached process per timer to fire
//! it, and manages a separate collection of reusable timer presets.

pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, Settings};
pub use controller::{StartedTimer, TimerController};
pub use error::{Result, TimerError};
pub use state::{CustomTimer, PresetKey, RunningTimer, TimerId};
pub use store::{PresetStore, TimerStore};
pub use utils::format_duration;
