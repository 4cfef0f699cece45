//! Tool `threshold_set`: Change the fever threshold.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use fever_watch::{MAX_THRESHOLD_C, MIN_THRESHOLD_C};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::parse_unit;

#[derive(Debug, Deserialize)]
struct ThresholdSetParams {
    threshold: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    device_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "threshold_set".to_string(),
        description: Some(format!(
            "Set the fever threshold (between {MIN_THRESHOLD_C} and {MAX_THRESHOLD_C} °C)"
        )),
        input_schema: json!({
            "type": "object",
            "properties": {
                "threshold": { "type": "number" },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit", "c", "f"],
                    "default": "celsius"
                },
                "device_id": { "type": "string" }
            },
            "required": ["threshold"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: ThresholdSetParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let unit = parse_unit(params.unit.as_deref())?;

    let mut session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let setting = session.set_threshold(&device_id, params.threshold, unit)?;

    Ok(ToolCallResult::json(&json!({
        "device_id": setting.device_id,
        "threshold_c": setting.threshold,
        "updated_at": setting.updated_at,
    })))
}
