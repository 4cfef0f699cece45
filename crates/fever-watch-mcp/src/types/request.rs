//! MCP request parameter types.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::error::McpError;

fn empty_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

/// `tools/call` params. Missing arguments decode as `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

/// `resources/read` params.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

/// `prompts/get` params. Missing arguments decode as `{}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

/// A `fever://` resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeverUri {
    Status,
    History,
    Alerts,
    Series(NaiveDate),
    Device(String),
}

impl FromStr for FeverUri {
    type Err = McpError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let path = uri
            .strip_prefix("fever://")
            .ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;

        match path.split_once('/') {
            None => match path {
                "status" => Ok(FeverUri::Status),
                "history" => Ok(FeverUri::History),
                "alerts" => Ok(FeverUri::Alerts),
                _ => Err(McpError::ResourceNotFound(uri.to_string())),
            },
            Some(("series", date)) => Ok(FeverUri::Series(fever_watch::parse_date_filter(date)?)),
            Some(("device", "")) => Err(McpError::InvalidParams(
                "Device URI must be fever://device/{id}".to_string(),
            )),
            Some(("device", id)) => Ok(FeverUri::Device(id.to_string())),
            Some(_) => Err(McpError::ResourceNotFound(uri.to_string())),
        }
    }
}
