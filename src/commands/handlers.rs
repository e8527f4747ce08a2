//! Command handlers
//!
//! Each handler performs one request against the controller or the preset
//! store and returns the text to print.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    config::Settings,
    controller::TimerController,
    error::Result,
    services::{SoundChoice, SystemCompletion},
    state::{CustomTimer, PresetKey, TimerId},
    store::{PresetStore, TimerStore},
    tasks::{run_countdown, Launcher},
    utils::{format_duration, ignore_hangup, shutdown_signal, Clock, TokioSleeper},
};

use super::output::{preset_entries, render_presets, render_timers};

/// Handle `start` - create the record and launch its countdown
pub async fn start_handler<L: Launcher, C: Clock>(
    controller: &TimerController<L, C>,
    duration_seconds: u64,
    name: Option<&str>,
) -> Result<String> {
    let started = controller.start(duration_seconds, name).await?;
    Ok(started.to_string())
}

/// Handle `list` - running timers, soonest first
pub async fn list_handler<L: Launcher, C: Clock>(
    controller: &TimerController<L, C>,
    json: bool,
) -> Result<String> {
    let timers = controller.list().await?;
    if json {
        return Ok(serde_json::to_string_pretty(&timers)?);
    }
    Ok(render_timers(&timers))
}

/// Handle `stop` - succeeds even if the timer already fired
pub async fn stop_handler<L: Launcher, C: Clock>(
    controller: &TimerController<L, C>,
    identity: &str,
) -> Result<String> {
    let identity = TimerId::parse(identity)?;
    controller.stop(&identity).await?;
    Ok(format!("Timer {} stopped", identity))
}

/// Handle `rename` - a timer that is already gone is reported, not fatal
pub async fn rename_handler<L: Launcher, C: Clock>(
    controller: &TimerController<L, C>,
    identity: &str,
    name: &str,
) -> Result<String> {
    let identity = TimerId::parse(identity)?;
    match controller.rename(&identity, name).await {
        Ok(()) => Ok(format!("Timer renamed to \"{}\"", name)),
        Err(e) if e.is_not_found() => {
            warn!("Rename of {} skipped: {}", identity, e);
            Ok("Timer has already finished or been stopped".to_string())
        }
        Err(e) => Err(e),
    }
}

/// Handle `preset add`
pub async fn preset_add_handler(
    presets: &PresetStore,
    name: &str,
    duration_seconds: u64,
) -> Result<String> {
    let key = presets
        .create(CustomTimer::new(name, duration_seconds))
        .await?;
    Ok(format!(
        "Custom timer \"{}\" ({}) saved as {}",
        name,
        format_duration(duration_seconds),
        key
    ))
}

/// Handle `preset list`
pub async fn preset_list_handler(presets: &PresetStore, json: bool) -> Result<String> {
    let all = presets.read_all().await?;
    if json {
        return Ok(serde_json::to_string_pretty(&preset_entries(&all))?);
    }
    Ok(render_presets(&all))
}

/// Handle `preset rename`
pub async fn preset_rename_handler(
    presets: &PresetStore,
    key: &PresetKey,
    name: &str,
) -> Result<String> {
    presets.rename(key, name).await?;
    Ok(format!("Custom timer renamed to \"{}\"", name))
}

/// Handle `preset delete` - unknown keys are not an error
pub async fn preset_delete_handler(presets: &PresetStore, key: &PresetKey) -> Result<String> {
    presets.delete(key).await?;
    Ok(format!("Custom timer {} deleted", key))
}

/// Handle `preset start`
pub async fn preset_start_handler<L: Launcher, C: Clock>(
    controller: &TimerController<L, C>,
    presets: &PresetStore,
    key: &PresetKey,
) -> Result<String> {
    let started = controller.start_preset(presets, key).await?;
    Ok(started.to_string())
}

/// Handle the hidden `fire` command: the whole life of a detached countdown
/// process. Never fails once the identity is valid; outcomes are logged.
pub async fn fire_handler(settings: &Settings, identity: &str, seconds: u64) -> Result<()> {
    if let Err(e) = ignore_hangup() {
        warn!("Failed to ignore SIGHUP: {}", e);
    }

    let identity = TimerId::parse(identity)?;
    let store: TimerStore = settings.timer_store();
    let action = SystemCompletion::new(
        SoundChoice::from_preference(&settings.sound),
        &settings.assets_dir,
    );

    let duration = Duration::from_secs(seconds);
    tokio::select! {
        outcome = run_countdown(&store, &identity, duration, &TokioSleeper, &action) => {
            debug!("Countdown for {} ended: {:?}", identity, outcome);
        }
        signal = shutdown_signal() => {
            warn!(
                "Countdown for {} ended early by signal {}; record left in place",
                identity, signal
            );
        }
    }

    Ok(())
}
