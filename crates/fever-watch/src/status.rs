//! Current device status from the latest reading.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp::CanonicalInstant;
use crate::types::TemperatureReading;

/// A reading older than this no longer describes the child's state.
pub const DEFAULT_FRESHNESS_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Normal,
    Fever,
    Unknown,
}

impl DeviceStatus {
    pub fn label(self) -> &'static str {
        match self {
            DeviceStatus::Normal => "Normal",
            DeviceStatus::Fever => "Fever Alert",
            DeviceStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub device_id: String,
    pub status: DeviceStatus,
    pub current_temperature: Option<f64>,
    /// Threshold in Celsius.
    pub threshold: f64,
    pub last_updated: Option<String>,
}

/// Classify a device from its latest reading.
///
/// The status is `Unknown` without a reading, with an unparseable timestamp,
/// or when the reading is older than `freshness`. Readings stamped in the
/// future count as fresh.
pub fn classify_status(
    device_id: &str,
    latest: Option<&TemperatureReading>,
    threshold_c: f64,
    now: DateTime<Utc>,
    freshness: Duration,
) -> StatusReport {
    let Some(reading) = latest else {
        return StatusReport {
            device_id: device_id.to_string(),
            status: DeviceStatus::Unknown,
            current_temperature: None,
            threshold: threshold_c,
            last_updated: None,
        };
    };

    let fresh = match reading.instant() {
        Ok(instant) => instant >= CanonicalInstant::from_utc(now - freshness),
        Err(e) => {
            tracing::warn!("Latest reading {} has an invalid timestamp: {e}", reading.id);
            false
        }
    };

    let status = if !fresh {
        DeviceStatus::Unknown
    } else if reading.temperature_c >= threshold_c {
        DeviceStatus::Fever
    } else {
        DeviceStatus::Normal
    };

    StatusReport {
        device_id: device_id.to_string(),
        status,
        current_temperature: Some(reading.temperature_c),
        threshold: threshold_c,
        last_updated: Some(reading.timestamp.clone()),
    }
}
