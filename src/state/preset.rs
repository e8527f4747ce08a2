//! Custom timer presets

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generated key of a preset, stable across renames
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetKey(String);

impl PresetKey {
    /// Fresh random key
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PresetKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

/// A reusable name + duration template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTimer {
    pub name: String,
    #[serde(rename = "timeInSeconds")]
    pub time_in_seconds: u64,
}

impl CustomTimer {
    pub fn new(name: impl Into<String>, time_in_seconds: u64) -> Self {
        Self {
            name: name.into(),
            time_in_seconds,
        }
    }
}
