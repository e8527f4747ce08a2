//! Running timer identity and derived state

use std::{fmt, path::Path};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

/// File extension shared by every running-timer record
pub const RECORD_SUFFIX: &str = ".timer";

/// Separates the start timestamp from the duration in a record filename
const SEPARATOR: &str = "---";

/// Stands in for `:`, which is not allowed in filenames on every platform
const COLON_PLACEHOLDER: &str = "__";

/// Identity of a running timer: the filename of its record.
///
/// Encodes start time and duration, never the display name, so renaming a
/// timer leaves its identity and its scheduled completion untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    /// Build the identity for a timer started at `started_at`
    pub fn new(started_at: DateTime<Utc>, duration_seconds: u64) -> Self {
        let stamp = started_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', COLON_PLACEHOLDER);
        Self(format!("{stamp}{SEPARATOR}{duration_seconds}{RECORD_SUFFIX}"))
    }

    /// Accept a user-supplied identity, either a bare filename or a path to
    /// the record. Only the final path component is kept so the identity can
    /// never point outside the storage root.
    pub fn parse(raw: &str) -> Result<Self> {
        let file_name = Path::new(raw.trim())
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| TimerError::corrupt(raw, "not a record filename"))?;

        if !file_name.ends_with(RECORD_SUFFIX) {
            return Err(TimerError::corrupt(
                raw,
                format!("missing {RECORD_SUFFIX} suffix"),
            ));
        }

        Ok(Self(file_name.to_string()))
    }

    /// Decode the start time and duration carried by the filename
    pub fn decode(&self) -> Result<(DateTime<Utc>, u64)> {
        let stem = self
            .0
            .strip_suffix(RECORD_SUFFIX)
            .ok_or_else(|| self.corrupt(format!("missing {RECORD_SUFFIX} suffix")))?;

        let parts: Vec<&str> = stem.split(SEPARATOR).collect();
        let [stamp, duration] = parts.as_slice() else {
            return Err(self.corrupt("expected <timestamp>---<duration>"));
        };

        let duration_seconds = duration.parse::<u64>().map_err(|_| {
            self.corrupt(format!("duration {duration:?} is not a non-negative integer"))
        })?;

        let started_at = DateTime::parse_from_rfc3339(&stamp.replace(COLON_PLACEHOLDER, ":"))
            .map_err(|e| self.corrupt(format!("bad start timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok((started_at, duration_seconds))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn corrupt(&self, reason: impl Into<String>) -> TimerError {
        TimerError::corrupt(self.0.clone(), reason)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a record holds once decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRecord {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u64,
}

impl TimerRecord {
    /// Whole seconds left at `now`, rounded and never negative
    pub fn time_left(&self, now: DateTime<Utc>) -> u64 {
        let elapsed_ms = (now - self.started_at).num_milliseconds();
        let total_ms = i64::try_from(self.duration_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        let remaining_ms = total_ms.saturating_sub(elapsed_ms);

        if remaining_ms <= 0 {
            return 0;
        }
        (remaining_ms as f64 / 1000.0).round() as u64
    }
}

/// A running timer as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTimer {
    pub identity: TimerId,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub time_left: u64,
}

impl RunningTimer {
    pub fn from_record(identity: TimerId, record: TimerRecord, now: DateTime<Utc>) -> Self {
        let time_left = record.time_left(now);
        Self {
            identity,
            name: record.name,
            started_at: record.started_at,
            duration_seconds: record.duration_seconds,
            time_left,
        }
    }
}
