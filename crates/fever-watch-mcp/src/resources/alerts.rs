//! Resource: fever://alerts

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use crate::session::MonitorSession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_alerts(session: &Arc<Mutex<MonitorSession>>) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let alerts = session.alerts(session.device_id());
    let (active, resolved): (Vec<_>, Vec<_>) = alerts.into_iter().partition(|a| !a.resolved);

    let content = json!({
        "device_id": session.device_id(),
        "active": active,
        "resolved": resolved,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("fever://alerts", &content)],
    })
}
