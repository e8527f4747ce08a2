//! Launching the detached countdown process

use std::{
    future::Future,
    path::PathBuf,
    process::{Command, Stdio},
};

use tokio::fs::{self, OpenOptions};
use tracing::{debug, info};

use crate::{
    config::Settings,
    error::{Result, TimerError},
    state::TimerId,
};

/// A timer that needs a countdown process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub identity: TimerId,
    pub duration_seconds: u64,
}

/// Starts a countdown for a timer and returns without waiting for it
pub trait Launcher {
    fn launch(&self, request: &LaunchRequest) -> impl Future<Output = Result<()>> + Send;
}

/// Re-runs the `ding` executable as `ding fire <identity> <seconds>` in its
/// own process group, detached from the caller's stdio
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: PathBuf,
    settings: Settings,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            program: program.into(),
            settings,
        }
    }

    /// Launcher that re-enters the running executable
    pub fn from_current_exe(settings: Settings) -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| TimerError::Launch(format!("cannot locate own executable: {}", e)))?;
        Ok(Self::new(program, settings))
    }

    /// Arguments passed to the countdown process
    pub fn fire_args(&self, request: &LaunchRequest) -> Vec<String> {
        vec![
            "--data-dir".to_string(),
            self.settings.data_dir.to_string_lossy().into_owned(),
            "--sound".to_string(),
            self.settings.sound.clone(),
            "--assets-dir".to_string(),
            self.settings.assets_dir.to_string_lossy().into_owned(),
            "fire".to_string(),
            request.identity.to_string(),
            request.duration_seconds.to_string(),
        ]
    }

    async fn spawn(&self, request: &LaunchRequest) -> Result<Option<u32>> {
        fs::create_dir_all(&self.settings.data_dir).await?;
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.settings.countdown_log())
            .await?
            .into_std()
            .await;
        let log_err = log.try_clone()?;

        let mut command = Command::new(&self.program);
        command
            .args(self.fire_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err));

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // keep terminal job-control signals aimed at the caller away from it
            command.process_group(0);
        }

        let child = tokio::process::Command::from(command)
            .spawn()
            .map_err(|e| TimerError::Launch(format!("{}: {}", self.program.display(), e)))?;

        // Dropping the handle neither waits for nor kills the child
        Ok(child.id())
    }
}

impl Launcher for ProcessLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<()> {
        debug!("Launching countdown for {}", request.identity);
        let pid = self.spawn(request).await?;
        info!(
            "Countdown process {:?} started for {} ({}s)",
            pid, request.identity, request.duration_seconds
        );
        Ok(())
    }
}
