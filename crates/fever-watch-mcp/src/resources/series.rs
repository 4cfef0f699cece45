//! Resource: fever://series/{date}

use std::sync::Arc;
use tokio::sync::Mutex;

use chrono::NaiveDate;
use serde_json::json;

use fever_watch::TemperatureUnit;

use crate::session::MonitorSession;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_series(
    date: NaiveDate,
    session: &Arc<Mutex<MonitorSession>>,
) -> McpResult<ReadResourceResult> {
    let session = session.lock().await;
    let outcome = session.series(session.device_id(), TemperatureUnit::Celsius, Some(date));

    let content = json!({
        "device_id": session.device_id(),
        "date": date.format("%Y-%m-%d").to_string(),
        "series": outcome,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(
            format!("fever://series/{}", date.format("%Y-%m-%d")),
            &content,
        )],
    })
}
