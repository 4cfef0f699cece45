//! Fever alert lifecycle.
//!
//! A device has at most one active alert. A reading at or above the
//! threshold opens one if none is active; the next reading below the
//! threshold resolves it.

use serde::{Deserialize, Serialize};

use crate::types::TemperatureReading;

/// A fever episode for one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeverAlert {
    pub id: String,
    pub device_id: String,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    #[serde(rename = "threshold")]
    pub threshold_c: f64,
    pub timestamp: String,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

/// What a reading did to the device's alert state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", content = "alertId", rename_all = "lowercase")]
pub enum AlertTransition {
    Opened(String),
    Resolved(String),
    Unchanged,
}

/// The unresolved alert for a device, if any.
pub fn active_alert<'a>(alerts: &'a [FeverAlert], device_id: &str) -> Option<&'a FeverAlert> {
    alerts
        .iter()
        .find(|a| a.device_id == device_id && !a.resolved)
}

/// Apply one reading to the alert list. `threshold_c` is in Celsius, as is
/// the reading, so the comparison never mixes units.
pub fn evaluate_reading(
    alerts: &mut Vec<FeverAlert>,
    reading: &TemperatureReading,
    threshold_c: f64,
) -> AlertTransition {
    let active = alerts
        .iter()
        .position(|a| a.device_id == reading.device_id && !a.resolved);

    if reading.temperature_c >= threshold_c {
        if active.is_some() {
            return AlertTransition::Unchanged;
        }
        let alert = FeverAlert {
            id: uuid::Uuid::new_v4().to_string(),
            device_id: reading.device_id.clone(),
            temperature_c: reading.temperature_c,
            threshold_c,
            timestamp: reading.timestamp.clone(),
            resolved: false,
            resolved_at: None,
        };
        tracing::info!(
            "Fever alert opened for {}: {}°C >= {}°C",
            reading.device_id,
            reading.temperature_c,
            threshold_c
        );
        let id = alert.id.clone();
        alerts.push(alert);
        AlertTransition::Opened(id)
    } else if let Some(idx) = active {
        let alert = &mut alerts[idx];
        alert.resolved = true;
        alert.resolved_at = Some(reading.timestamp.clone());
        tracing::info!("Fever alert resolved for {}", reading.device_id);
        AlertTransition::Resolved(alert.id.clone())
    } else {
        AlertTransition::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(device: &str, temp: f64, ts: &str) -> TemperatureReading {
        TemperatureReading {
            id: 0,
            device_id: device.to_string(),
            temperature_c: temp,
            timestamp: ts.to_string(),
        }
    }

    #[test]
    fn test_open_once_then_resolve() {
        let mut alerts = Vec::new();

        let opened = evaluate_reading(&mut alerts, &reading("a", 38.0, "20250822T040000000"), 38.0);
        assert!(matches!(opened, AlertTransition::Opened(_)));

        let again = evaluate_reading(&mut alerts, &reading("a", 39.2, "20250822T041000000"), 38.0);
        assert_eq!(again, AlertTransition::Unchanged);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].temperature_c, 38.0);

        let resolved =
            evaluate_reading(&mut alerts, &reading("a", 37.1, "20250822T050000000"), 38.0);
        assert!(matches!(resolved, AlertTransition::Resolved(_)));
        assert!(alerts[0].resolved);
        assert_eq!(alerts[0].resolved_at.as_deref(), Some("20250822T050000000"));
        assert!(active_alert(&alerts, "a").is_none());
    }

    #[test]
    fn test_devices_are_independent() {
        let mut alerts = Vec::new();
        evaluate_reading(&mut alerts, &reading("a", 39.0, "20250822T040000000"), 38.0);
        evaluate_reading(&mut alerts, &reading("b", 39.0, "20250822T040000000"), 38.0);
        assert_eq!(alerts.len(), 2);

        let change = evaluate_reading(&mut alerts, &reading("b", 36.5, "20250822T043000000"), 38.0);
        assert!(matches!(change, AlertTransition::Resolved(_)));
        assert!(active_alert(&alerts, "a").is_some());
        assert!(active_alert(&alerts, "b").is_none());
    }

    #[test]
    fn test_normal_reading_without_alert() {
        let mut alerts = Vec::new();
        let change = evaluate_reading(&mut alerts, &reading("a", 36.6, "20250822T040000000"), 38.0);
        assert_eq!(change, AlertTransition::Unchanged);
        assert!(alerts.is_empty());
    }
}
