//! Configuration loading and resolution.

use std::path::PathBuf;

use fever_watch::{DisplayConfig, FeverResult, DEFAULT_DEVICE_ID};

pub const LOG_FILE_ENV: &str = "FEVER_WATCH_FILE";
pub const ZONE_ENV: &str = "FEVER_WATCH_TZ";
pub const DEVICE_ENV: &str = "FEVER_WATCH_DEVICE";

/// Resolve the reading log path.
pub fn resolve_log_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit {
        return path.to_string();
    }

    if let Ok(env_path) = std::env::var(LOG_FILE_ENV) {
        return env_path;
    }

    let cwd_log = PathBuf::from(".fever-watch/readings.ftw");
    if cwd_log.exists() {
        return cwd_log.display().to_string();
    }

    resolve_default_log_path()
}

fn resolve_default_log_path() -> String {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    format!("{home}/.fever-watch/readings.ftw")
}

/// Resolve the display zone. Falls back to UTC when nothing is configured.
pub fn resolve_display_config(explicit: Option<&str>) -> FeverResult<DisplayConfig> {
    match explicit
        .map(str::to_string)
        .or_else(|| std::env::var(ZONE_ENV).ok())
    {
        Some(zone) => DisplayConfig::from_zone_str(&zone),
        None => Ok(DisplayConfig::default()),
    }
}

/// Resolve the device to monitor.
pub fn resolve_device_id(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(DEVICE_ENV).ok())
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string())
}
