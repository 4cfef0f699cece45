//! Tool `log_prune`: Apply retention to the reading log.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use fever_watch::MAX_RETENTION_DAYS;

use crate::session::{
    MonitorSession, DEFAULT_ALERT_RETENTION_DAYS, DEFAULT_READING_RETENTION_DAYS,
};
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct PruneParams {
    #[serde(default = "default_reading_days")]
    reading_days: i64,
    #[serde(default = "default_alert_days")]
    alert_days: i64,
}

fn default_reading_days() -> i64 {
    DEFAULT_READING_RETENTION_DAYS
}

fn default_alert_days() -> i64 {
    DEFAULT_ALERT_RETENTION_DAYS
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "log_prune".to_string(),
        description: Some(
            "Delete old readings and long-resolved alerts from the reading log".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "reading_days": {
                    "type": "integer",
                    "default": DEFAULT_READING_RETENTION_DAYS,
                    "minimum": 1,
                    "maximum": MAX_RETENTION_DAYS
                },
                "alert_days": {
                    "type": "integer",
                    "default": DEFAULT_ALERT_RETENTION_DAYS,
                    "minimum": 1,
                    "maximum": MAX_RETENTION_DAYS
                }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: PruneParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let mut session = session.lock().await;
    let summary = session.prune(params.reading_days, params.alert_days)?;

    Ok(ToolCallResult::json(&json!({
        "readings_removed": summary.readings_removed,
        "alerts_removed": summary.alerts_removed,
        "readings_remaining": session.store().count(),
    })))
}
