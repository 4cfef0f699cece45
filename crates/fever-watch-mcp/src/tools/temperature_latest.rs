//! Tool `temperature_latest`: Most recent reading for a device.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::reading_json;

#[derive(Debug, Deserialize)]
struct LatestParams {
    #[serde(default)]
    device_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "temperature_latest".to_string(),
        description: Some("Get the most recent temperature reading".to_string()),
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
    let params: LatestParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let reading = session
        .latest(&device_id)
        .ok_or_else(|| McpError::DeviceNotFound(device_id.clone()))?;

    Ok(ToolCallResult::json(&reading_json(reading, session.formatter())))
}
