//! Resource: fever://history

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use fever_watch::{group_by_hour, COLLAPSED_HISTORY_LEN};

use crate::session::MonitorSession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_history(session: &Arc<Mutex<MonitorSession>>) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let device_id = session.device_id();
    let samples = session.store().samples(device_id);

    let groups = group_by_hour(
        &samples,
        session.formatter().zone(),
        Some(COLLAPSED_HISTORY_LEN),
    );

    let content = json!({
        "device_id": device_id,
        "total_readings": samples.len(),
        "shown": groups.iter().map(|g| g.samples.len()).sum::<usize>(),
        "groups": groups,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("fever://history", &content)],
    })
}
