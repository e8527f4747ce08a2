//! Command-line command module
//!
//! This module wires parsed commands to the controller and the preset store.

pub mod handlers;
pub mod output;

use crate::{
    config::{Command, PresetCommand, Settings},
    controller::TimerController,
    error::Result,
    tasks::ProcessLauncher,
};
use handlers::*;

/// Run one command and return what should be printed
pub async fn dispatch(settings: &Settings, command: Command) -> Result<Option<String>> {
    let presets = settings.preset_store();

    let output = match command {
        Command::Start { duration, name } => {
            start_handler(&controller(settings)?, duration, name.as_deref()).await?
        }
        Command::List { json } => list_handler(&controller(settings)?, json).await?,
        Command::Stop { identity } => stop_handler(&controller(settings)?, &identity).await?,
        Command::Rename { identity, name } => {
            rename_handler(&controller(settings)?, &identity, &name).await?
        }
        Command::Preset(preset) => match preset {
            PresetCommand::Add { name, duration } => {
                preset_add_handler(&presets, &name, duration).await?
            }
            PresetCommand::List { json } => preset_list_handler(&presets, json).await?,
            PresetCommand::Rename { key, name } => {
                preset_rename_handler(&presets, &key, &name).await?
            }
            PresetCommand::Delete { key } => preset_delete_handler(&presets, &key).await?,
            PresetCommand::Start { key } => {
                preset_start_handler(&controller(settings)?, &presets, &key).await?
            }
        },
        Command::Fire { identity, seconds } => {
            fire_handler(settings, &identity, seconds).await?;
            return Ok(None);
        }
    };

    Ok(Some(output))
}

fn controller(settings: &Settings) -> Result<TimerController<ProcessLauncher>> {
    let launcher = ProcessLauncher::from_current_exe(settings.clone())?;
    Ok(TimerController::new(settings.timer_store(), launcher))
}
