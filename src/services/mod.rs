//! External service module
//!
//! This module contains the system commands run when a timer fires.

pub mod completion;

// Re-export main types
pub use completion::{
    CompletionAction, SoundChoice, SystemCompletion, NOTIFICATION_MESSAGE, NOTIFICATION_TITLE,
    SPEAK_TIMER_NAME,
};
