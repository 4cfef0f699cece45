//! Tool `timestamp_format`: Render a timestamp for display.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Style {
    Absolute,
    Time,
    Relative,
}

#[derive(Debug, Deserialize)]
struct FormatParams {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default = "default_style")]
    style: Style,
}

fn default_style() -> Style {
    Style::Absolute
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "timestamp_format".to_string(),
        description: Some(
            "Format a timestamp as date and time, time only, or age (e.g. '5m ago')".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "timestamp": {
                    "type": "string",
                    "description": "Omit to format the current time (absolute and time styles)"
                },
                "style": {
                    "type": "string",
                    "enum": ["absolute", "time", "relative"],
                    "default": "absolute"
                }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ToolCallResult> {
    let params: FormatParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let formatter = session.formatter();
    let raw = params.timestamp.as_deref();

    let text = match params.style {
        Style::Absolute => formatter.format_absolute(raw),
        Style::Time => formatter.format_time_only(raw),
        Style::Relative => {
            let raw = raw.ok_or_else(|| {
                McpError::InvalidParams("'timestamp' required for relative style".to_string())
            })?;
            formatter.format_relative(raw)
        }
    };

    Ok(ToolCallResult::json(&json!({
        "text": text,
        "zone": formatter.zone().to_string(),
    })))
}
