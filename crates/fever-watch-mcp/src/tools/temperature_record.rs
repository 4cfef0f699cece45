//! Tool `temperature_record`: Store a temperature reading.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::parse_unit;

#[derive(Debug, Deserialize)]
struct RecordParams {
    temperature: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    device_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "temperature_record".to_string(),
        description: Some(
            "Record a body temperature reading; opens or resolves a fever alert".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "temperature": { "type": "number", "description": "Measured temperature" },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit", "c", "f"],
                    "default": "celsius"
                },
                "timestamp": {
                    "type": "string",
                    "description": "Compact (20250822T040135293) or ISO-8601; defaults to now"
                },
                "device_id": { "type": "string" }
            },
            "required": ["temperature"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: RecordParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let unit = parse_unit(params.unit.as_deref())?;

    let mut session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let result = session.record(
        &device_id,
        params.temperature,
        unit,
        params.timestamp.as_deref(),
    )?;
    let threshold = session.store().threshold(&device_id);

    Ok(ToolCallResult::json(&json!({
        "reading_id": result.reading_id,
        "device_id": result.device_id,
        "temperature_c": result.temperature_c,
        "timestamp": result.timestamp,
        "display_time": session.formatter().format_absolute(Some(&result.timestamp)),
        "fever": result.temperature_c >= threshold,
        "alert": result.alert,
    })))
}
