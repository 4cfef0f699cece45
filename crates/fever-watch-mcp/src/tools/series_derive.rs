//! Tool `series_derive`: Ordered series, min/max/average and trend.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use fever_watch::{
    derive_series, parse_date_filter, SeriesOptions, SeriesOutcome, TemperatureSample,
};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::parse_unit;

#[derive(Debug, Deserialize)]
struct SeriesParams {
    #[serde(default)]
    device_id: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    date: Option<String>,
    /// Inline samples (Celsius) instead of the stored log.
    #[serde(default)]
    samples: Option<Vec<TemperatureSample>>,
    /// Celsius; defaults to the device threshold.
    #[serde(default)]
    fever_threshold: Option<f64>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "series_derive".to_string(),
        description: Some(
            "Derive a chronologically ordered series with min, max, average and trend".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "device_id": { "type": "string" },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit", "c", "f"],
                    "default": "celsius"
                },
                "date": {
                    "type": "string",
                    "description": "Only samples on this calendar day (YYYY-MM-DD) in the display zone"
                },
                "samples": {
                    "type": "array",
                    "description": "Derive over these samples instead of the stored readings",
                    "items": {
                        "type": "object",
                        "properties": {
                            "timestamp": { "type": "string" },
                            "temperature": { "type": "number", "description": "Celsius" }
                        },
                        "required": ["timestamp", "temperature"]
                    }
                },
                "fever_threshold": { "type": "number", "description": "Celsius" }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: SeriesParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let unit = parse_unit(params.unit.as_deref())?;
    let date = params.date.as_deref().map(parse_date_filter).transpose()?;

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);

    let outcome = match (params.samples, params.fever_threshold) {
        (None, None) => session.series(&device_id, unit, date),
        (samples, threshold) => {
            let threshold = threshold.unwrap_or_else(|| session.store().threshold(&device_id));
            let mut options =
                SeriesOptions::new(unit, threshold).with_zone(session.formatter().zone());
            if let Some(date) = date {
                options = options.with_date_filter(date);
            }
            let samples = samples.unwrap_or_else(|| session.store().samples(&device_id));
            derive_series(&samples, &options)
        }
    };

    let labels: Vec<String> = match &outcome {
        SeriesOutcome::Series(stats) => stats
            .ordered_samples
            .iter()
            .map(|s| session.formatter().format_time_only(Some(&s.raw_timestamp)))
            .collect(),
        SeriesOutcome::Empty => Vec::new(),
    };
    let trend = outcome.stats().map(|s| s.trend.label());
    let fever_count = outcome.stats().map_or(0, |s| s.fever_count());

    Ok(ToolCallResult::json(&json!({
        "device_id": device_id,
        "unit": unit,
        "symbol": unit.symbol(),
        "series": outcome,
        "labels": labels,
        "trend": trend,
        "fever_count": fever_count,
    })))
}
