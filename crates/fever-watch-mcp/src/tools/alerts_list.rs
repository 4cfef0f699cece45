//! Tool `alerts_list`: Fever alerts, newest first.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct AlertsParams {
    #[serde(default)]
    device_id: Option<String>,
    #[serde(default)]
    active_only: bool,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "alerts_list".to_string(),
        description: Some("List fever alerts for a device".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "device_id": { "type": "string" },
                "active_only": { "type": "boolean", "default": false }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: AlertsParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);
    let formatter = session.formatter();

    let alerts: Vec<Value> = session
        .alerts(&device_id)
        .into_iter()
        .filter(|a| !params.active_only || !a.resolved)
        .map(|a| {
            json!({
                "alert": a,
                "display_time": formatter.format_absolute(Some(&a.timestamp)),
                "resolved_display_time": a
                    .resolved_at
                    .as_deref()
                    .map(|ts| formatter.format_absolute(Some(ts))),
            })
        })
        .collect();

    Ok(ToolCallResult::json(&json!({
        "device_id": device_id,
        "total": alerts.len(),
        "alerts": alerts,
    })))
}
