//! Resource: fever://status

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use crate::session::MonitorSession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_status(session: &Arc<Mutex<MonitorSession>>) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let report = session.status(session.device_id());
    let last_updated = report.last_updated.as_deref();

    let content = json!({
        "status": report.status,
        "label": report.status.label(),
        "device_id": report.device_id,
        "current_temperature": report.current_temperature,
        "threshold": report.threshold,
        "last_updated": last_updated,
        "last_updated_display":
            last_updated.map(|ts| session.formatter().format_absolute(Some(ts))),
        "age": last_updated.map(|ts| session.formatter().format_relative(ts)),
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("fever://status", &content)],
    })
}
