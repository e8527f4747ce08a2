//! Durable storage module
//!
//! Running timers and presets are stored side by side in one storage root.

pub mod preset_store;
pub mod timer_store;

pub use preset_store::{PresetMap, PresetStore, PRESET_FILE_NAME};
pub use timer_store::TimerStore;
