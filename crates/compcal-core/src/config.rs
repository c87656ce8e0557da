use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub meetings: MeetingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Controls the randomised meeting events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_meeting_probability")]
    pub probability: f64,
    /// Fixed seed for reproducible meetings. Unset means fresh entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_first_hour")]
    pub first_hour: u32,
    #[serde(default = "default_last_hour")]
    pub last_hour: u32,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            probability: default_meeting_probability(),
            seed: None,
            first_hour: default_first_hour(),
            last_hour: default_last_hour(),
            duration_minutes: default_duration_minutes(),
        }
    }
}

impl MeetingConfig {
    /// Copy with every field pulled into a usable range.
    ///
    /// Probability lands in `[0, 1]`, hours in `0..=23` with
    /// `first_hour < last_hour`, and the duration fits inside the window.
    /// Meetings never cross midnight.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let probability = if self.probability.is_nan() {
            0.0
        } else {
            self.probability.clamp(0.0, 1.0)
        };
        let first_hour = self.first_hour.min(22);
        let last_hour = self.last_hour.clamp(first_hour + 1, 23);
        let window_minutes = (last_hour - first_hour) * 60;
        let duration_minutes = self.duration_minutes.clamp(1, window_minutes);

        Self {
            enabled: self.enabled,
            probability,
            seed: self.seed,
            first_hour,
            last_hour,
            duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text`, or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

/// Default config location: `<user config dir>/compcal/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("compcal/config.toml"))
}

/// Load config from `path`. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<CalendarConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(CalendarConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CalendarConfig>(&content).with_context(|| {
        format!(
            "{}: Failed to parse {}",
            ErrorCode::ConfigParseError,
            path.display()
        )
    })
}

/// Resolve the effective config: explicit path, then the user config dir,
/// then defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<CalendarConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) => load_config(&path),
        None => Ok(CalendarConfig::default()),
    }
}

const fn default_true() -> bool {
    true
}

const fn default_meeting_probability() -> f64 {
    0.3
}

const fn default_first_hour() -> u32 {
    9
}

const fn default_last_hour() -> u32 {
    17
}

const fn default_duration_minutes() -> u32 {
    60
}
