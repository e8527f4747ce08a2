//! Custom timer preset collection
//!
//! The whole collection lives in one JSON object keyed by generated preset
//! keys. Every mutation reads, modifies and rewrites the entire file. There
//! is no locking: two overlapping mutations are last-writer-wins.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::{Result, TimerError},
    state::{CustomTimer, PresetKey},
};

/// File name of the collection inside the storage root
pub const PRESET_FILE_NAME: &str = "customTimers.json";

pub type PresetMap = BTreeMap<PresetKey, CustomTimer>;

#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the default collection file in `root`
    pub fn in_dir(root: &Path) -> Self {
        Self::new(root.join(PRESET_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty collection if none exists yet
    pub async fn ensure_initialized(&self) -> Result<()> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        info!("Initializing preset collection at {}", self.path.display());
        self.write(&PresetMap::new()).await
    }

    pub async fn create(&self, preset: CustomTimer) -> Result<PresetKey> {
        let mut presets = self.read_all().await?;
        let key = PresetKey::generate();
        debug!("Creating preset {} ({:?})", key, preset.name);
        presets.insert(key.clone(), preset);
        self.write(&presets).await?;
        Ok(key)
    }

    pub async fn read_all(&self) -> Result<PresetMap> {
        self.ensure_initialized().await?;
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn get(&self, key: &PresetKey) -> Result<CustomTimer> {
        self.read_all()
            .await?
            .remove(key)
            .ok_or_else(|| TimerError::NotFound(format!("preset {key}")))
    }

    pub async fn rename(&self, key: &PresetKey, new_name: &str) -> Result<()> {
        let mut presets = self.read_all().await?;
        let preset = presets
            .get_mut(key)
            .ok_or_else(|| TimerError::NotFound(format!("preset {key}")))?;
        preset.name = new_name.to_string();
        self.write(&presets).await
    }

    /// Remove a preset; unknown keys are ignored
    pub async fn delete(&self, key: &PresetKey) -> Result<()> {
        let mut presets = self.read_all().await?;
        if presets.remove(key).is_none() {
            debug!("Preset {} not present, nothing to delete", key);
        }
        self.write(&presets).await
    }

    /// Replace the collection file through a temp file so readers never see
    /// a partial write. Each write gets its own temp file; overlapping writers
    /// only ever lose updates to each other, never fail.
    async fn write(&self, presets: &PresetMap) -> Result<()> {
        let json = serde_json::to_string(presets)?;
        let temp_path = self
            .path
            .with_extension(format!("json.tmp.{}", Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&temp_path, json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}
