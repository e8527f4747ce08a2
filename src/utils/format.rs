//! Duration formatting and parsing

use crate::error::{Result, TimerError};

/// Format whole seconds as `H:MM:SS` (hours unpadded)
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a user-supplied duration into seconds.
///
/// Accepts plain seconds (`90`), unit strings (`1h30m`, `25m`, `45s`) and
/// clock form (`1:30`, `0:01:30`).
pub fn parse_duration(input: &str) -> Result<u64> {
    let input = input.trim();
    let invalid = || TimerError::InvalidDuration(input.to_string());

    if input.is_empty() {
        return Err(invalid());
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(seconds);
    }

    if input.contains(':') {
        let fields = input
            .split(':')
            .map(|field| field.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<u64>>>()?;
        let (hours, minutes, seconds) = match fields.as_slice() {
            [m, s] => (0, *m, *s),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(invalid()),
        };
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }
        return hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes * 60 + seconds))
            .ok_or_else(invalid);
    }

    let mut total = 0u64;
    let mut digits = String::new();
    for c in input.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = match c.to_ascii_lowercase() {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid()),
        };
        let value: u64 = digits.parse().map_err(|_| invalid())?;
        total = value
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
        digits.clear();
    }

    // trailing digits without a unit, e.g. "1m30"
    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(total)
}
