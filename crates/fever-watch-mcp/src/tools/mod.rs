//! MCP tool implementations.

pub mod alerts_list;
pub mod log_prune;
pub mod registry;
pub mod series_derive;
pub mod temperature_history;
pub mod temperature_latest;
pub mod temperature_record;
pub mod temperature_status;
pub mod threshold_get;
pub mod threshold_set;
pub mod timestamp_format;
pub mod timestamp_parse;

pub use registry::ToolRegistry;

use serde_json::{json, Value};

use fever_watch::{DisplayFormatter, TemperatureReading, TemperatureUnit};

use crate::types::McpResult;

/// Parse an optional unit argument; Celsius when absent.
pub(crate) fn parse_unit(raw: Option<&str>) -> McpResult<TemperatureUnit> {
    let unit = raw.map(str::parse::<TemperatureUnit>).transpose()?;
    Ok(unit.unwrap_or_default())
}

/// A stored reading with its display renderings.
pub(crate) fn reading_json(reading: &TemperatureReading, formatter: &DisplayFormatter) -> Value {
    json!({
        "id": reading.id,
        "deviceId": reading.device_id,
        "temperature": reading.temperature_c,
        "timestamp": reading.timestamp,
        "displayTime": formatter.format_absolute(Some(&reading.timestamp)),
        "age": formatter.format_relative(&reading.timestamp),
    })
}
