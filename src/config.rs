//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use crate::{
    error::{Result, TimerError},
    services::SPEAK_TIMER_NAME,
    state::PresetKey,
    store::{PresetStore, TimerStore},
    utils::parse_duration,
};

/// Log file the detached countdown processes append to
pub const COUNTDOWN_LOG: &str = "countdown.log";

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "ding")]
#[command(about = "Named countdown timers that keep running after the terminal closes")]
#[command(version)]
pub struct Config {
    /// Directory holding running timers and presets
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Sound played when a timer fires; "speak_timer_name" speaks the name
    #[arg(long, global = true, default_value = SPEAK_TIMER_NAME)]
    pub sound: String,

    /// Directory that sound files are looked up in
    #[arg(long, global = true)]
    pub assets_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a timer, e.g. `ding start 5m "Boil eggs"`
    Start {
        /// Seconds, or 1h2m3s / 25m / 0:25:00
        #[arg(value_parser = parse_duration)]
        duration: u64,
        name: Option<String>,
    },
    /// Show running timers, soonest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Cancel a running timer
    Stop { identity: String },
    /// Rename a running timer without changing when it fires
    Rename { identity: String, name: String },
    /// Manage custom timer presets
    #[command(subcommand)]
    Preset(PresetCommand),
    /// Wait and fire a timer; run by `start` in a detached process
    #[command(hide = true)]
    Fire { identity: String, seconds: u64 },
}

#[derive(Debug, Subcommand)]
pub enum PresetCommand {
    /// Save a new preset
    Add {
        name: String,
        #[arg(value_parser = parse_duration)]
        duration: u64,
    },
    /// Show all presets
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    Rename { key: PresetKey, name: String },
    Delete { key: PresetKey },
    /// Start a timer from a preset
    Start { key: PresetKey },
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag. Detached
    /// countdowns always log their outcome; interactive commands stay quiet.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.is_detached() {
            "info"
        } else {
            "warn"
        }
    }

    /// Whether this invocation is a detached countdown process
    pub fn is_detached(&self) -> bool {
        matches!(self.command, Command::Fire { .. })
    }

    /// Resolve defaults into the explicit settings handed to the library
    pub fn settings(&self) -> Result<Settings> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        let mut settings = Settings::new(data_dir);
        settings.sound = self.sound.clone();
        if let Some(assets_dir) = &self.assets_dir {
            settings.assets_dir = assets_dir.clone();
        }
        Ok(settings)
    }
}

/// Storage root and completion preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub sound: String,
    pub assets_dir: PathBuf,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            assets_dir: data_dir.join("assets"),
            sound: SPEAK_TIMER_NAME.to_string(),
            data_dir,
        }
    }

    pub fn timer_store(&self) -> TimerStore {
        TimerStore::new(&self.data_dir)
    }

    pub fn preset_store(&self) -> PresetStore {
        PresetStore::in_dir(&self.data_dir)
    }

    pub fn countdown_log(&self) -> PathBuf {
        self.data_dir.join(COUNTDOWN_LOG)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "ding")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| TimerError::Config("could not determine a home directory".to_string()))
}
