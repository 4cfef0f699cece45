//! Resource registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::MonitorSession;
use crate::types::{
    FeverUri, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::{alerts, device, history, series, status, templates};

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    pub async fn read(
        uri: &str,
        session: &Arc<Mutex<MonitorSession>>,
    ) -> McpResult<ReadResourceResult> {
        match uri.parse::<FeverUri>()? {
            FeverUri::Status => status::read_status(session).await,
            FeverUri::History => history::read_history(session).await,
            FeverUri::Alerts => alerts::read_alerts(session).await,
            FeverUri::Series(date) => series::read_series(date, session).await,
            FeverUri::Device(id) => device::read_device(&id, session).await,
        }
    }
}
