//! Tool `temperature_status`: Normal, fever, or unknown.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct StatusParams {
    #[serde(default)]
    device_id: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "temperature_status".to_string(),
        description: Some(
            "Classify the device as normal, fever, or unknown (no reading in the last 5 minutes)"
                .to_string(),
        ),
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
    let params: StatusParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let report = session.status(&device_id);
    let label = report.status.label();
    let last_seen = report
        .last_updated
        .as_deref()
        .map(|ts| session.formatter().format_relative(ts));

    Ok(ToolCallResult::json(&json!({
        "status": report,
        "label": label,
        "last_seen": last_seen,
    })))
}
