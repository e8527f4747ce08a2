//! Durable running-timer records
//!
//! Each running timer is one file in the storage root. The filename is the
//! timer's identity and carries its start time and duration; the file's
//! content is the display name.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::{
    error::{Result, TimerError},
    state::{TimerId, TimerRecord, RECORD_SUFFIX},
};

/// Directory of `.timer` records
#[derive(Debug, Clone)]
pub struct TimerStore {
    root: PathBuf,
}

impl TimerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `identity`
    pub fn record_path(&self, identity: &TimerId) -> PathBuf {
        self.root.join(identity.as_str())
    }

    /// Create a record for a timer starting now
    pub async fn create(&self, name: &str, duration_seconds: u64) -> Result<TimerId> {
        self.create_at(name, duration_seconds, Utc::now()).await
    }

    /// Create a record for a timer that started at `started_at`
    pub async fn create_at(
        &self,
        name: &str,
        duration_seconds: u64,
        started_at: DateTime<Utc>,
    ) -> Result<TimerId> {
        fs::create_dir_all(&self.root).await?;

        let identity = TimerId::new(started_at, duration_seconds);
        fs::write(self.record_path(&identity), name).await?;

        debug!("Created timer record {}", identity);
        Ok(identity)
    }

    /// All records in the storage root, in no particular order
    pub async fn list(&self) -> Result<Vec<TimerId>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut identities = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if file_name.ends_with(RECORD_SUFFIX) {
                identities.push(TimerId::parse(&file_name)?);
            }
        }

        Ok(identities)
    }

    /// Decode a record's filename and read its name
    pub async fn read(&self, identity: &TimerId) -> Result<TimerRecord> {
        let (started_at, duration_seconds) = identity.decode()?;
        let name = self.read_name(identity).await?;

        Ok(TimerRecord {
            name,
            started_at,
            duration_seconds,
        })
    }

    /// Read only the display name; used at fire time, where the filename has
    /// already been trusted
    pub async fn read_name(&self, identity: &TimerId) -> Result<String> {
        fs::read_to_string(self.record_path(identity))
            .await
            .map_err(|e| not_found_or(e, identity))
    }

    #[cfg(test)]
    pub async fn exists(&self, identity: &TimerId) -> Result<bool> {
        Ok(fs::try_exists(self.record_path(identity)).await?)
    }

    /// Replace the display name. Never recreates a record that has already
    /// fired or been stopped.
    pub async fn rename(&self, identity: &TimerId, new_name: &str) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.record_path(identity))
            .await
            .map_err(|e| not_found_or(e, identity))?;

        file.write_all(new_name.as_bytes()).await?;
        file.flush().await?;

        debug!("Renamed timer {} to {:?}", identity, new_name);
        Ok(())
    }

    /// Remove the record; removing an absent record is a no-op
    pub async fn delete(&self, identity: &TimerId) -> Result<()> {
        match fs::remove_file(self.record_path(identity)).await {
            Ok(()) => {
                debug!("Deleted timer record {}", identity);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Timer record {} already gone", identity);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn not_found_or(e: std::io::Error, identity: &TimerId) -> TimerError {
    if e.kind() == ErrorKind::NotFound {
        TimerError::NotFound(format!("timer {identity}"))
    } else {
        e.into()
    }
}
