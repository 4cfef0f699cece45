//! Tool `temperature_history`: Newest-first readings, flat or grouped by hour.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use fever_watch::{group_by_hour, DEFAULT_HISTORY_LIMIT};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::reading_json;

#[derive(Debug, Deserialize)]
struct HistoryParams {
    #[serde(default)]
    device_id: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    group_by_hour: bool,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "temperature_history".to_string(),
        description: Some("List recent readings, newest first".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "device_id": { "type": "string" },
                "limit": { "type": "integer", "default": DEFAULT_HISTORY_LIMIT, "minimum": 1 },
                "group_by_hour": {
                    "type": "boolean",
                    "default": false,
                    "description": "Group readings by clock hour in the display zone"
                }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: HistoryParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    if params.limit == 0 {
        return Err(McpError::InvalidParams("limit must be at least 1".to_string()));
    }

    let session = session.lock().await;
    let device_id = session.resolve_device(params.device_id);

    if params.group_by_hour {
        let groups = group_by_hour(
            &session.store().samples(&device_id),
            session.formatter().zone(),
            Some(params.limit),
        );
        return Ok(ToolCallResult::json(&json!({
            "device_id": device_id,
            "groups": groups,
        })));
    }

    let readings: Vec<Value> = session
        .history(&device_id, params.limit)
        .into_iter()
        .map(|r| reading_json(r, session.formatter()))
        .collect();

    Ok(ToolCallResult::json(&json!({
        "device_id": device_id,
        "total": readings.len(),
        "readings": readings,
    })))
}
