//! Monitoring session lifecycle, file I/O, and the active device.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, SecondsFormat};

use fever_watch::{
    classify_status, derive_series, retention_window, AlertTransition, CanonicalInstant,
    DisplayConfig, DisplayFormatter, FeverAlert, PruneSummary, ReadingLogReader, ReadingLogWriter,
    ReadingStore, SeriesOptions, SeriesOutcome, StatusReport, TemperatureReading,
    TemperatureUnit, ThresholdSetting, DEFAULT_FRESHNESS_SECS,
};

use crate::types::{McpError, McpResult};

const DEFAULT_AUTO_SAVE_SECS: u64 = 30;
pub const DEFAULT_READING_RETENTION_DAYS: i64 = 30;
pub const DEFAULT_ALERT_RETENTION_DAYS: i64 = 7;

/// Manages the reading log, display settings, and the monitored device.
pub struct MonitorSession {
    store: ReadingStore,
    formatter: DisplayFormatter,
    device_id: String,
    file_path: PathBuf,
    dirty: bool,
    last_save: Instant,
    auto_save_interval: Duration,
}

/// Result of recording a reading through the session.
#[derive(Debug, Clone)]
pub struct RecordResult {
    pub reading_id: u64,
    pub device_id: String,
    pub temperature_c: f64,
    pub timestamp: String,
    pub alert: AlertTransition,
}

impl MonitorSession {
    /// Open or create a reading log at the given path.
    pub fn open(path: &str, device_id: &str, display: DisplayConfig) -> McpResult<Self> {
        let file_path = PathBuf::from(path);

        let store = if file_path.exists() {
            tracing::info!("Opening existing reading log: {}", file_path.display());
            ReadingLogReader::read_from_file(&file_path)
                .map_err(|e| McpError::Fever(format!("Failed to read reading log: {e}")))?
        } else {
            tracing::info!("Creating new reading log: {}", file_path.display());
            if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    McpError::Io(std::io::Error::other(format!(
                        "Failed to create directory {}: {e}",
                        parent.display()
                    )))
                })?;
            }
            ReadingStore::new()
        };

        let display_zone = &display.zone;
        tracing::info!(
            "Monitoring device {device_id}. Log has {} readings across {} devices, display zone {}",
            store.count(),
            store.device_ids().len(),
            display_zone
        );

        Ok(Self {
            store,
            formatter: DisplayFormatter::new(display),
            device_id: device_id.to_string(),
            file_path,
            dirty: false,
            last_save: Instant::now(),
            auto_save_interval: Duration::from_secs(DEFAULT_AUTO_SAVE_SECS),
        })
    }

    pub fn store(&self) -> &ReadingStore {
        &self.store
    }

    pub fn formatter(&self) -> &DisplayFormatter {
        &self.formatter
    }

    /// The device monitored when a request names none.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Pick the requested device, or the session's device.
    pub fn resolve_device(&self, explicit: Option<String>) -> String {
        explicit
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.device_id.clone())
    }

    /// Record a reading. `temperature` is in `unit`; a missing timestamp
    /// means "now".
    pub fn record(
        &mut self,
        device_id: &str,
        temperature: f64,
        unit: TemperatureUnit,
        timestamp: Option<&str>,
    ) -> McpResult<RecordResult> {
        let timestamp = match timestamp {
            Some(ts) => ts.to_string(),
            None => CanonicalInstant::from_utc(self.formatter.now()).to_compact(),
        };
        let temperature_c = unit.to_celsius(temperature);

        let outcome = self.store.add_reading(device_id, temperature_c, &timestamp)?;
        match &outcome.alert {
            AlertTransition::Opened(id) => {
                tracing::warn!("Fever alert {id} opened for {device_id} at {temperature_c:.1}°C")
            }
            AlertTransition::Resolved(id) => {
                tracing::info!("Fever alert {id} resolved for {device_id}")
            }
            AlertTransition::Unchanged => {}
        }

        self.dirty = true;
        self.maybe_auto_save()?;

        Ok(RecordResult {
            reading_id: outcome.reading_id,
            device_id: device_id.to_string(),
            temperature_c,
            timestamp,
            alert: outcome.alert,
        })
    }

    pub fn latest(&self, device_id: &str) -> Option<&TemperatureReading> {
        self.store.latest(device_id)
    }

    pub fn history(&self, device_id: &str, limit: usize) -> Vec<&TemperatureReading> {
        self.store.history(device_id, limit)
    }

    pub fn status(&self, device_id: &str) -> StatusReport {
        classify_status(
            device_id,
            self.store.latest(device_id),
            self.store.threshold(device_id),
            self.formatter.now(),
            chrono::Duration::seconds(DEFAULT_FRESHNESS_SECS),
        )
    }

    pub fn threshold(&self, device_id: &str) -> ThresholdSetting {
        self.store.threshold_setting(device_id)
    }

    /// Set a device's threshold given in `unit`; stored in Celsius.
    pub fn set_threshold(
        &mut self,
        device_id: &str,
        value: f64,
        unit: TemperatureUnit,
    ) -> McpResult<ThresholdSetting> {
        let updated_at = self
            .formatter
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let setting = self
            .store
            .set_threshold(device_id, unit.to_celsius(value), &updated_at)?;
        self.dirty = true;
        self.maybe_auto_save()?;
        Ok(setting)
    }

    pub fn alerts(&self, device_id: &str) -> Vec<&FeverAlert> {
        self.store.alerts(device_id)
    }

    /// Derive the series for a device against its own threshold, in the
    /// session's display zone.
    pub fn series(
        &self,
        device_id: &str,
        unit: TemperatureUnit,
        date: Option<NaiveDate>,
    ) -> SeriesOutcome {
        let mut options = SeriesOptions::new(unit, self.store.threshold(device_id))
            .with_zone(self.formatter.zone());
        if let Some(date) = date {
            options = options.with_date_filter(date);
        }
        derive_series(&self.store.samples(device_id), &options)
    }

    /// Apply the retention windows, measured from now.
    pub fn prune(&mut self, reading_days: i64, alert_days: i64) -> McpResult<PruneSummary> {
        let summary = self.store.prune(
            self.formatter.now(),
            retention_window(reading_days)?,
            retention_window(alert_days)?,
        )?;
        if summary.readings_removed > 0 || summary.alerts_removed > 0 {
            self.dirty = true;
            self.save()?;
        }
        Ok(summary)
    }

    /// Save to file.
    pub fn save(&mut self) -> McpResult<()> {
        if !self.dirty {
            return Ok(());
        }

        ReadingLogWriter::write_to_file(&self.store, &self.file_path)
            .map_err(|e| McpError::Fever(format!("Failed to write reading log: {e}")))?;

        self.dirty = false;
        self.last_save = Instant::now();
        tracing::debug!("Saved reading log: {}", self.file_path.display());
        Ok(())
    }

    fn maybe_auto_save(&mut self) -> McpResult<()> {
        if self.dirty && self.last_save.elapsed() >= self.auto_save_interval {
            self.save()?;
        }
        Ok(())
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save() {
                tracing::error!("Failed to save on drop: {e}");
            }
        }
    }
}
