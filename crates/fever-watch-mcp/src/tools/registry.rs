//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    alerts_list, log_prune, series_derive, temperature_history, temperature_latest,
    temperature_record, temperature_status, threshold_get, threshold_set, timestamp_format,
    timestamp_parse,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            temperature_record::definition(),
            temperature_latest::definition(),
            temperature_history::definition(),
            temperature_status::definition(),
            threshold_get::definition(),
            threshold_set::definition(),
            alerts_list::definition(),
            series_derive::definition(),
            timestamp_parse::definition(),
            timestamp_format::definition(),
            log_prune::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        args: Value,
        session: &Arc<Mutex<MonitorSession>>,
    ) -> McpResult<ToolCallResult> {
        match name {
            "temperature_record" => temperature_record::execute(args, session).await,
            "temperature_latest" => temperature_latest::execute(args, session).await,
            "temperature_history" => temperature_history::execute(args, session).await,
            "temperature_status" => temperature_status::execute(args, session).await,
            "threshold_get" => threshold_get::execute(args, session).await,
            "threshold_set" => threshold_set::execute(args, session).await,
            "alerts_list" => alerts_list::execute(args, session).await,
            "series_derive" => series_derive::execute(args, session).await,
            "timestamp_parse" => timestamp_parse::execute(args, session).await,
            "timestamp_format" => timestamp_format::execute(args, session).await,
            "log_prune" => log_prune::execute(args, session).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
