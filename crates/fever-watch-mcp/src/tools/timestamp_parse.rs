//! Tool `timestamp_parse`: Normalize a raw timestamp.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct ParseParams {
    timestamp: Value,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "timestamp_parse".to_string(),
        description: Some(
            "Normalize a compact (20250822T040135293) or ISO-8601 timestamp to a UTC instant"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "timestamp": { "type": "string" }
            },
            "required": ["timestamp"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: ParseParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let result = match fever_watch::parse_value(&params.timestamp) {
        Ok(instant) => json!({
            "valid": true,
            "utc": instant.to_string(),
            "epoch_ms": instant.timestamp_millis(),
            "compact": instant.to_compact(),
            "display": session.formatter().format_instant(&instant),
        }),
        Err(e) => json!({
            "valid": false,
            "error": e.to_string(),
        }),
    };

    Ok(ToolCallResult::json(&result))
}
