//! Completion action run when a timer fires: a sound, then a notification

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, TimerError};

/// Preference value meaning "speak the timer's name" instead of playing a file
pub const SPEAK_TIMER_NAME: &str = "speak_timer_name";

pub const NOTIFICATION_TITLE: &str = "Ding!";
pub const NOTIFICATION_MESSAGE: &str = "Timer complete";

/// What to play when a timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundChoice {
    SpeakName,
    /// Audio file name, relative to the assets directory
    Asset(String),
}

impl SoundChoice {
    pub fn from_preference(value: &str) -> Self {
        if value == SPEAK_TIMER_NAME {
            Self::SpeakName
        } else {
            Self::Asset(value.to_string())
        }
    }
}

/// Something that can be performed once for a fired timer
pub trait CompletionAction {
    fn complete(&self, timer_name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Plays the configured sound and raises a desktop notification using the
/// platform's command-line tools
#[derive(Debug, Clone)]
pub struct SystemCompletion {
    pub sound: SoundChoice,
    pub assets_dir: PathBuf,
}

impl SystemCompletion {
    pub fn new(sound: SoundChoice, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            sound,
            assets_dir: assets_dir.into(),
        }
    }
}

impl CompletionAction for SystemCompletion {
    async fn complete(&self, timer_name: &str) -> Result<()> {
        match &self.sound {
            SoundChoice::SpeakName => speak(timer_name).await?,
            SoundChoice::Asset(file) => play_sound(&self.assets_dir.join(file)).await?,
        }
        show_notification(NOTIFICATION_TITLE, NOTIFICATION_MESSAGE).await
    }
}

/// Speak text aloud
pub async fn speak(text: &str) -> Result<()> {
    debug!("Speaking {:?}", text);
    let program = if cfg!(target_os = "macos") { "say" } else { "espeak" };
    run(program, &speak_args(text)).await?;
    info!("Spoke timer name");
    Ok(())
}

/// Arguments for the speech program; `--` keeps names like `-v` from being
/// read as options
fn speak_args(text: &str) -> [&str; 2] {
    ["--", text]
}

/// Play an audio file
pub async fn play_sound(path: &Path) -> Result<()> {
    debug!("Playing {}", path.display());
    let program = if cfg!(target_os = "macos") { "afplay" } else { "paplay" };
    let path = path.to_string_lossy();
    run(program, &[path.as_ref()]).await?;
    info!("Played {}", path);
    Ok(())
}

/// Raise a desktop notification
pub async fn show_notification(title: &str, message: &str) -> Result<()> {
    debug!("Showing notification {:?}: {:?}", title, message);
    if cfg!(target_os = "macos") {
        let script = format!(
            "display notification {} with title {}",
            applescript_string(message),
            applescript_string(title)
        );
        run("osascript", &["-e", &script]).await?;
    } else {
        run("notify-send", &[title, message]).await?;
    }
    info!("Notification shown");
    Ok(())
}

/// Quote a value as an AppleScript string literal
fn applescript_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

async fn run(program: &str, args: &[&str]) -> Result<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            TimerError::BackgroundActionFailure(format!("Failed to execute {}: {}", program, e))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TimerError::BackgroundActionFailure(format!(
            "{} failed: {}",
            program,
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_means_speak() {
        assert_eq!(SoundChoice::from_preference("speak_timer_name"), SoundChoice::SpeakName);
        assert_eq!(
            SoundChoice::from_preference("alarmClock.wav"),
            SoundChoice::Asset("alarmClock.wav".to_string())
        );
    }

    #[test]
    fn applescript_strings_are_escaped() {
        assert_eq!(applescript_string("Timer complete"), "\"Timer complete\"");
        assert_eq!(applescript_string(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn names_are_never_read_as_speech_options() {
        assert_eq!(speak_args("-v"), ["--", "-v"]);
        assert_eq!(speak_args("--rate=900"), ["--", "--rate=900"]);
        assert_eq!(speak_args("Eggs"), ["--", "Eggs"]);
    }

    #[tokio::test]
    async fn missing_program_is_a_background_failure() {
        let err = run("ding-no-such-program-on-path", &[]).await.unwrap_err();
        assert!(matches!(err, TimerError::BackgroundActionFailure(_)));
    }
}
