//! Temperature series derivation: filter, order, convert, aggregate, trend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timestamp::{parse, CanonicalInstant};
use crate::types::{
    FeverError, FeverResult, TemperatureSample, TemperatureUnit, DEFAULT_THRESHOLD_C,
};
use crate::zone::ReferenceZone;

/// Minimum first-to-last change, in the display unit, that counts as a trend.
pub const TREND_DEAD_BAND: f64 = 0.5;

/// Direction of a series from its first to its last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "Rising",
            Trend::Falling => "Falling",
            Trend::Stable => "Stable",
        }
    }
}

/// Parameters for [`derive_series`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesOptions {
    pub unit: TemperatureUnit,
    /// Keep only samples on this calendar date in `zone`.
    pub date_filter: Option<NaiveDate>,
    /// Fever threshold in Celsius.
    pub fever_threshold_c: f64,
    /// Reference zone for the date filter.
    pub zone: ReferenceZone,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::Celsius,
            date_filter: None,
            fever_threshold_c: DEFAULT_THRESHOLD_C,
            zone: ReferenceZone::default(),
        }
    }
}

impl SeriesOptions {
    pub fn new(unit: TemperatureUnit, fever_threshold_c: f64) -> Self {
        Self {
            unit,
            fever_threshold_c,
            ..Self::default()
        }
    }

    pub fn with_date_filter(mut self, date: NaiveDate) -> Self {
        self.date_filter = Some(date);
        self
    }

    pub fn with_zone(mut self, zone: impl Into<ReferenceZone>) -> Self {
        self.zone = zone.into();
        self
    }
}

/// Parse a `YYYY-MM-DD` date filter.
pub fn parse_date_filter(raw: &str) -> FeverResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| FeverError::InvalidInput(format!("Invalid date filter {raw:?}: {e}")))
}

/// A sample whose timestamp has been normalized and whose temperature has
/// been converted to the display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSample {
    pub raw_timestamp: String,
    pub instant: CanonicalInstant,
    /// Temperature in the display unit.
    pub temperature: f64,
    pub temperature_c: f64,
    pub fever: bool,
}

/// Statistics over a non-empty series, all in `unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub unit: TemperatureUnit,
    pub ordered_samples: Vec<ResolvedSample>,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub average_temperature: f64,
    pub trend: Trend,
    /// The fever threshold converted to `unit`.
    pub fever_threshold: f64,
}

impl SeriesStats {
    pub fn fever_count(&self) -> usize {
        self.ordered_samples.iter().filter(|s| s.fever).count()
    }
}

/// Result of a derivation: either statistics or an explicit "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesOutcome {
    Empty,
    Series(SeriesStats),
}

impl SeriesOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesOutcome::Empty)
    }

    pub fn stats(&self) -> Option<&SeriesStats> {
        match self {
            SeriesOutcome::Series(stats) => Some(stats),
            SeriesOutcome::Empty => None,
        }
    }
}

/// Whether a Celsius reading is a fever against a Celsius threshold, compared
/// after converting both sides into `unit`.
pub fn is_fever(temperature_c: f64, threshold_c: f64, unit: TemperatureUnit) -> bool {
    unit.convert_celsius(temperature_c) >= unit.convert_celsius(threshold_c)
}

/// Classify first-to-last movement with a [`TREND_DEAD_BAND`] dead-band.
pub fn classify_trend(values: &[f64]) -> Trend {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => {
            let delta = last - first;
            if delta > TREND_DEAD_BAND {
                Trend::Rising
            } else if delta < -TREND_DEAD_BAND {
                Trend::Falling
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

/// Derive an ordered, converted series with statistics and trend.
///
/// Samples with unparseable timestamps are dropped before ordering, so the
/// sort only ever compares valid instants. Ties keep input order.
pub fn derive_series(samples: &[TemperatureSample], options: &SeriesOptions) -> SeriesOutcome {
    let mut timed: Vec<(CanonicalInstant, &TemperatureSample)> = samples
        .iter()
        .filter_map(|sample| match parse(&sample.raw_timestamp) {
            Ok(instant) => Some((instant, sample)),
            Err(e) => {
                tracing::warn!("Dropping sample with timestamp {:?}: {e}", sample.raw_timestamp);
                None
            }
        })
        .filter(|(instant, _)| match options.date_filter {
            Some(date) => instant.date_in(&options.zone) == date,
            None => true,
        })
        .collect();

    timed.sort_by_key(|(instant, _)| *instant);

    if timed.is_empty() {
        return SeriesOutcome::Empty;
    }

    let unit = options.unit;
    let fever_threshold = unit.convert_celsius(options.fever_threshold_c);

    let ordered_samples: Vec<ResolvedSample> = timed
        .into_iter()
        .map(|(instant, sample)| {
            let temperature = unit.convert_celsius(sample.temperature_c);
            ResolvedSample {
                raw_timestamp: sample.raw_timestamp.clone(),
                instant,
                temperature,
                temperature_c: sample.temperature_c,
                fever: temperature >= fever_threshold,
            }
        })
        .collect();

    let values: Vec<f64> = ordered_samples.iter().map(|s| s.temperature).collect();
    let min_temperature = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_temperature = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average_temperature = values.iter().sum::<f64>() / values.len() as f64;
    let trend = classify_trend(&values);

    SeriesOutcome::Series(SeriesStats {
        unit,
        ordered_samples,
        min_temperature,
        max_temperature,
        average_temperature,
        trend,
        fever_threshold,
    })
}
