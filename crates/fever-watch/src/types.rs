//! Core data types for temperature readings, thresholds and the reading store.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alerts::{evaluate_reading, AlertTransition, FeverAlert};
use crate::timestamp::{parse, CanonicalInstant, TimestampError};

/// Device used when a caller does not name one.
pub const DEFAULT_DEVICE_ID: &str = "piZero01";

/// Fever threshold applied to devices without an explicit setting, in Celsius.
pub const DEFAULT_THRESHOLD_C: f64 = 38.0;

/// Accepted threshold range, in Celsius.
pub const MIN_THRESHOLD_C: f64 = 35.0;
pub const MAX_THRESHOLD_C: f64 = 50.0;

/// Longest retention window accepted, in days.
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Default number of readings returned by a history query.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Temperature unit for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit.
    pub fn convert_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Convert a value in this unit back into Celsius.
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = FeverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(FeverError::InvalidInput(format!(
                "Unknown unit: {other}. Use 'celsius' or 'fahrenheit'."
            ))),
        }
    }
}

/// A raw timestamped temperature, as handed to the series deriver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    #[serde(rename = "timestamp")]
    pub raw_timestamp: String,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
}

impl TemperatureSample {
    pub fn new(raw_timestamp: impl Into<String>, temperature_c: f64) -> Self {
        Self {
            raw_timestamp: raw_timestamp.into(),
            temperature_c,
        }
    }
}

/// A reading persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub id: u64,
    pub device_id: String,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    pub timestamp: String,
}

impl TemperatureReading {
    pub fn sample(&self) -> TemperatureSample {
        TemperatureSample::new(self.timestamp.clone(), self.temperature_c)
    }

    /// Normalized instant of this reading. Stored readings are validated on
    /// insert, so this only fails for hand-edited log files.
    pub fn instant(&self) -> Result<CanonicalInstant, TimestampError> {
        parse(&self.timestamp)
    }
}

/// Per-device fever threshold, always stored in Celsius.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSetting {
    pub device_id: String,
    pub threshold: f64,
    pub unit: TemperatureUnit,
    pub updated_at: Option<String>,
}

impl ThresholdSetting {
    pub fn default_for(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            threshold: DEFAULT_THRESHOLD_C,
            unit: TemperatureUnit::Celsius,
            updated_at: None,
        }
    }
}

/// Outcome of recording a reading.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub reading_id: u64,
    pub alert: AlertTransition,
}

/// Counts removed by a retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSummary {
    pub readings_removed: usize,
    pub alerts_removed: usize,
}

/// A retention window of `days` whole days, from 1 to [`MAX_RETENTION_DAYS`].
pub fn retention_window(days: i64) -> FeverResult<chrono::Duration> {
    if !(1..=MAX_RETENTION_DAYS).contains(&days) {
        return Err(FeverError::InvalidInput(format!(
            "Retention window must be between 1 and {MAX_RETENTION_DAYS} days, got {days}"
        )));
    }
    chrono::Duration::try_days(days)
        .ok_or_else(|| FeverError::InvalidInput(format!("Retention window of {days} days")))
}

/// In-memory container for readings, thresholds and alerts.
#[derive(Debug, Clone)]
pub struct ReadingStore {
    pub readings: Vec<TemperatureReading>,
    pub thresholds: BTreeMap<String, ThresholdSetting>,
    pub alerts: Vec<FeverAlert>,
    pub next_id: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Default for ReadingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        let now = unix_now();
        Self {
            readings: Vec::new(),
            thresholds: BTreeMap::new(),
            alerts: Vec::new(),
            next_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a reading, opening or resolving a fever alert as needed.
    pub fn add_reading(
        &mut self,
        device_id: &str,
        temperature_c: f64,
        timestamp: &str,
    ) -> FeverResult<RecordOutcome> {
        if device_id.trim().is_empty() {
            return Err(FeverError::InvalidInput("Device ID must not be empty".to_string()));
        }
        if !temperature_c.is_finite() {
            return Err(FeverError::InvalidInput(format!(
                "Temperature must be a finite number, got {temperature_c}"
            )));
        }
        parse(timestamp)?;

        let id = self.next_id;
        self.next_id += 1;
        let reading = TemperatureReading {
            id,
            device_id: device_id.to_string(),
            temperature_c,
            timestamp: timestamp.to_string(),
        };

        let threshold = self.threshold(device_id);
        let alert = evaluate_reading(&mut self.alerts, &reading, threshold);
        self.readings.push(reading);
        self.touch();

        tracing::debug!("Recorded reading {id} for {device_id}: {temperature_c}°C at {timestamp}");
        Ok(RecordOutcome {
            reading_id: id,
            alert,
        })
    }

    /// Number of stored readings across all devices.
    pub fn count(&self) -> usize {
        self.readings.len()
    }

    /// Distinct device IDs that have readings or settings.
    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .readings
            .iter()
            .map(|r| r.device_id.clone())
            .chain(self.thresholds.keys().cloned())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// All readings for a device, in insertion order.
    pub fn by_device(&self, device_id: &str) -> Vec<&TemperatureReading> {
        self.readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .collect()
    }

    /// Samples for a device, ready for series derivation.
    pub fn samples(&self, device_id: &str) -> Vec<TemperatureSample> {
        self.readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .map(TemperatureReading::sample)
            .collect()
    }

    /// The most recent reading for a device by timestamp.
    pub fn latest(&self, device_id: &str) -> Option<&TemperatureReading> {
        self.readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .filter_map(|r| r.instant().ok().map(|instant| (instant, r)))
            .max_by_key(|(instant, _)| *instant)
            .map(|(_, r)| r)
    }

    /// Newest-first readings for a device, capped at `limit`.
    pub fn history(&self, device_id: &str, limit: usize) -> Vec<&TemperatureReading> {
        let mut timed: Vec<(CanonicalInstant, &TemperatureReading)> = self
            .readings
            .iter()
            .filter(|r| r.device_id == device_id)
            .filter_map(|r| r.instant().ok().map(|instant| (instant, r)))
            .collect();
        timed.sort_by(|a, b| b.0.cmp(&a.0));
        timed.truncate(limit);
        timed.into_iter().map(|(_, r)| r).collect()
    }

    /// Effective threshold for a device in Celsius.
    pub fn threshold(&self, device_id: &str) -> f64 {
        self.thresholds
            .get(device_id)
            .map(|t| t.threshold)
            .unwrap_or(DEFAULT_THRESHOLD_C)
    }

    /// Effective threshold setting for a device, falling back to the default.
    pub fn threshold_setting(&self, device_id: &str) -> ThresholdSetting {
        self.thresholds
            .get(device_id)
            .cloned()
            .unwrap_or_else(|| ThresholdSetting::default_for(device_id))
    }

    /// Set a device's threshold (Celsius).
    pub fn set_threshold(
        &mut self,
        device_id: &str,
        threshold_c: f64,
        updated_at: &str,
    ) -> FeverResult<ThresholdSetting> {
        if !(MIN_THRESHOLD_C..=MAX_THRESHOLD_C).contains(&threshold_c) {
            return Err(FeverError::InvalidInput(format!(
                "Threshold must be between {MIN_THRESHOLD_C}°C and {MAX_THRESHOLD_C}°C, got {threshold_c}"
            )));
        }

        let setting = ThresholdSetting {
            device_id: device_id.to_string(),
            threshold: threshold_c,
            unit: TemperatureUnit::Celsius,
            updated_at: Some(updated_at.to_string()),
        };
        self.thresholds
            .insert(device_id.to_string(), setting.clone());
        self.touch();

        tracing::info!("Threshold for {device_id} set to {threshold_c}°C");
        Ok(setting)
    }

    /// Alerts for a device, newest first.
    pub fn alerts(&self, device_id: &str) -> Vec<&FeverAlert> {
        let mut alerts: Vec<&FeverAlert> = self
            .alerts
            .iter()
            .filter(|a| a.device_id == device_id)
            .collect();
        alerts.sort_by_key(|a| std::cmp::Reverse(parse(&a.timestamp).ok()));
        alerts
    }

    /// Drop readings older than `reading_max_age` and resolved alerts whose
    /// resolution is older than `resolved_alert_max_age`.
    pub fn prune(
        &mut self,
        now: chrono::DateTime<chrono::Utc>,
        reading_max_age: chrono::Duration,
        resolved_alert_max_age: chrono::Duration,
    ) -> FeverResult<PruneSummary> {
        let cutoff = |max_age: chrono::Duration| {
            now.checked_sub_signed(max_age)
                .map(CanonicalInstant::from_utc)
                .ok_or_else(|| {
                    FeverError::InvalidInput(format!("Retention window {max_age} is out of range"))
                })
        };
        let reading_cutoff = cutoff(reading_max_age)?;
        let alert_cutoff = cutoff(resolved_alert_max_age)?;

        let before = self.readings.len();
        self.readings
            .retain(|r| r.instant().map_or(true, |i| i >= reading_cutoff));
        let readings_removed = before - self.readings.len();

        let before = self.alerts.len();
        self.alerts.retain(|a| {
            if !a.resolved {
                return true;
            }
            match a.resolved_at.as_deref().map(parse) {
                Some(Ok(resolved_at)) => resolved_at >= alert_cutoff,
                _ => true,
            }
        });
        let alerts_removed = before - self.alerts.len();

        let summary = PruneSummary {
            readings_removed,
            alerts_removed,
        };
        if readings_removed > 0 || alerts_removed > 0 {
            self.touch();
            tracing::info!(
                "Pruned {readings_removed} readings and {alerts_removed} resolved alerts"
            );
        }
        Ok(summary)
    }

    fn touch(&mut self) {
        self.updated_at = unix_now();
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Errors that can occur in the FeverWatch library.
#[derive(thiserror::Error, Debug)]
pub enum FeverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type FeverResult<T> = Result<T, FeverError>;
