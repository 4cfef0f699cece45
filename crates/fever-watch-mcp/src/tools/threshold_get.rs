//! Tool `threshold_get`: Current fever threshold.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use fever_watch::TemperatureUnit;

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct ThresholdGetParams {
    #[serde(default)]
    device_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "threshold_get".to_string(),
        description: Some("Get the fever threshold for a device".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "device_id": { "type": "string" }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: ThresholdGetParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let setting = session.threshold(&device_id);

    Ok(ToolCallResult::json(&json!({
        "device_id": setting.device_id,
        "threshold_c": setting.threshold,
        "threshold_f": TemperatureUnit::Fahrenheit.convert_celsius(setting.threshold),
        "is_default": setting.updated_at.is_none(),
        "updated_at": setting.updated_at,
    })))
}
