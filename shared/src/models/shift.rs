//! Work shifts and the configurable shift schedule

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Settings keys holding the shift boundaries in `system_config`
pub const MORNING_SHIFT_START: &str = "morning_shift_start";
pub const MORNING_SHIFT_END: &str = "morning_shift_end";
pub const AFTERNOON_SHIFT_START: &str = "afternoon_shift_start";
pub const AFTERNOON_SHIFT_END: &str = "afternoon_shift_end";
pub const NIGHT_SHIFT_START: &str = "night_shift_start";
pub const NIGHT_SHIFT_END: &str = "night_shift_end";

/// All shift-boundary settings keys; values must be HH:MM
pub const SHIFT_SETTING_KEYS: [&str; 6] = [
    MORNING_SHIFT_START,
    MORNING_SHIFT_END,
    AFTERNOON_SHIFT_START,
    AFTERNOON_SHIFT_END,
    NIGHT_SHIFT_START,
    NIGHT_SHIFT_END,
];

/// A named work shift, serialized with its counter-facing label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "早班")]
    Morning,
    #[serde(rename = "午班")]
    Afternoon,
    #[serde(rename = "晚班")]
    Night,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "早班",
            Shift::Afternoon => "午班",
            Shift::Night => "晚班",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "早班" => Some(Shift::Morning),
            "午班" => Some(Shift::Afternoon),
            "晚班" => Some(Shift::Night),
            _ => None,
        }
    }
}

/// Convert an HH:MM string to minutes since midnight
pub fn hhmm_to_minutes(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Shift boundaries in minutes since midnight.
///
/// Night is everything outside the morning and afternoon windows, so its
/// configured boundaries do not participate in classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    pub morning_start: u32,
    pub morning_end: u32,
    pub afternoon_start: u32,
    pub afternoon_end: u32,
}

impl Default for ShiftSchedule {
    fn default() -> Self {
        Self {
            morning_start: 6 * 60,
            morning_end: 14 * 60,
            afternoon_start: 14 * 60,
            afternoon_end: 22 * 60,
        }
    }
}

impl ShiftSchedule {
    /// Build a schedule from the settings map, falling back to the default
    /// boundary for any missing or malformed value.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let lookup = |key: &str, fallback: u32| {
            settings
                .get(key)
                .and_then(|v| hhmm_to_minutes(v))
                .unwrap_or(fallback)
        };
        Self {
            morning_start: lookup(MORNING_SHIFT_START, defaults.morning_start),
            morning_end: lookup(MORNING_SHIFT_END, defaults.morning_end),
            afternoon_start: lookup(AFTERNOON_SHIFT_START, defaults.afternoon_start),
            afternoon_end: lookup(AFTERNOON_SHIFT_END, defaults.afternoon_end),
        }
    }

    /// Half-open containment: morning if start <= t < end, afternoon
    /// likewise, night otherwise.
    pub fn classify(&self, time: NaiveTime) -> Shift {
        let now = time.hour() * 60 + time.minute();
        if self.morning_start <= now && now < self.morning_end {
            Shift::Morning
        } else if self.afternoon_start <= now && now < self.afternoon_end {
            Shift::Afternoon
        } else {
            Shift::Night
        }
    }
}
