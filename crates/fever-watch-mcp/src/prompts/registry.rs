//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult};

use super::{fever_check, trend_report};

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition {
                name: "fever_check".to_string(),
                description: Some(
                    "Check whether the child currently has a fever and what to do next"
                        .to_string(),
                ),
                arguments: Some(vec![PromptArgument {
                    name: "device_id".to_string(),
                    description: Some("Device to check; defaults to the monitored one".to_string()),
                    required: false,
                }]),
            },
            PromptDefinition {
                name: "trend_report".to_string(),
                description: Some("Summarize temperature trend for a day".to_string()),
                arguments: Some(vec![
                    PromptArgument {
                        name: "date".to_string(),
                        description: Some("Day to report on (YYYY-MM-DD)".to_string()),
                        required: false,
                    },
                    PromptArgument {
                        name: "unit".to_string(),
                        description: Some("celsius or fahrenheit".to_string()),
                        required: false,
                    },
                ]),
            },
        ]
    }

    pub async fn get(name: &str, args: Value) -> McpResult<PromptGetResult> {
        match name {
            "fever_check" => fever_check::expand(args),
            "trend_report" => trend_report::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}
