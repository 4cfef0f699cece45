//! Prompt `fever_check`: Walk through the current fever status.

use serde_json::Value;

use crate::types::{McpResult, PromptGetResult, PromptMessage, ToolContent};

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let device = args
        .get("device_id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    let device_arg = match device {
        Some(id) => format!(" with device_id \"{id}\""),
        None => String::new(),
    };

    let text = format!(
        "I want to know whether my child has a fever right now.\n\n\
         Please:\n\
         1. Call temperature_status{device_arg} to get the current status\n\
         2. If the status is unknown, tell me when the last reading was taken\n\
         3. Compare the latest temperature with the fever threshold (threshold_get)\n\
         4. Call alerts_list{device_arg} with active_only set and mention any active fever alert\n\
         5. Summarize in one or two sentences, quoting temperatures in °C"
    );

    Ok(PromptGetResult {
        description: Some("Check the current fever status".to_string()),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ToolContent::Text { text },
        }],
    })
}
