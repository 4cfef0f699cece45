//! Resource URI templates and static resource definitions.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

const JSON: &str = "application/json";

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![
        ResourceTemplateDefinition {
            uri_template: "fever://series/{date}".to_string(),
            name: "Daily Series".to_string(),
            description: Some(
                "Ordered series, statistics and trend for one day (YYYY-MM-DD)".to_string(),
            ),
            mime_type: Some(JSON.to_string()),
        },
        ResourceTemplateDefinition {
            uri_template: "fever://device/{id}".to_string(),
            name: "Device Overview".to_string(),
            description: Some("Status, threshold and latest reading of a device".to_string()),
            mime_type: Some(JSON.to_string()),
        },
    ]
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition {
            uri: "fever://status".to_string(),
            name: "Current Status".to_string(),
            description: Some("Fever status of the monitored device".to_string()),
            mime_type: Some(JSON.to_string()),
        },
        ResourceDefinition {
            uri: "fever://history".to_string(),
            name: "Recent History".to_string(),
            description: Some("Recent readings grouped by hour, newest first".to_string()),
            mime_type: Some(JSON.to_string()),
        },
        ResourceDefinition {
            uri: "fever://alerts".to_string(),
            name: "Fever Alerts".to_string(),
            description: Some("Active and resolved fever alerts".to_string()),
            mime_type: Some(JSON.to_string()),
        },
    ]
}
