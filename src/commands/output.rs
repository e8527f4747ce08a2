//! Plain-text and JSON rendering of command results

use serde::Serialize;

use crate::{
    state::{CustomTimer, PresetKey, RunningTimer},
    store::PresetMap,
    utils::format_duration,
};

/// One preset as printed by `preset list --json`
#[derive(Debug, Clone, Serialize)]
pub struct PresetEntry<'a> {
    pub key: &'a PresetKey,
    #[serde(flatten)]
    pub preset: &'a CustomTimer,
}

/// Table of running timers, already sorted by the controller
pub fn render_timers(timers: &[RunningTimer]) -> String {
    if timers.is_empty() {
        return "No running timers".to_string();
    }

    let mut out = format!("{:<10} {:<10} {:<24} {}\n", "LEFT", "SET", "NAME", "ID");
    for timer in timers {
        out.push_str(&format!(
            "{:<10} {:<10} {:<24} {}\n",
            format_duration(timer.time_left),
            format_duration(timer.duration_seconds),
            timer.name,
            timer.identity
        ));
    }
    out.truncate(out.trim_end().len());
    out
}

/// Table of presets ordered by name
pub fn render_presets(presets: &PresetMap) -> String {
    if presets.is_empty() {
        return "No custom timers".to_string();
    }

    let mut entries: Vec<_> = presets.iter().collect();
    entries.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));

    let mut out = format!("{:<10} {:<24} {}\n", "DURATION", "NAME", "KEY");
    for (key, preset) in entries {
        out.push_str(&format!(
            "{:<10} {:<24} {}\n",
            format_duration(preset.time_in_seconds),
            preset.name,
            key
        ));
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn preset_entries(presets: &PresetMap) -> Vec<PresetEntry<'_>> {
    presets
        .iter()
        .map(|(key, preset)| PresetEntry { key, preset })
        .collect()
}
