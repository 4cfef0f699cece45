//! Resource: fever://device/{id}

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use crate::session::MonitorSession;
use crate::types::{McpError, McpResult, ReadResourceResult, ResourceContent};

pub async fn read_device(
    id: &str,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    if !session.store().device_ids().iter().any(|d| d == id) {
        return Err(McpError::DeviceNotFound(id.to_string()));
    }

    let content = json!({
        "device_id": id,
        "status": session.status(id),
        "threshold": session.threshold(id),
        "latest": session.latest(id),
        "reading_count": session.store().by_device(id).len(),
        "active_alert": fever_watch::active_alert(&session.store().alerts, id),
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(format!("fever://device/{id}"), &content)],
    })
}
