//! Request dispatcher: routes JSON-RPC messages to tools, resources and prompts.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::session::MonitorSession;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// Dispatches incoming JSON-RPC messages against one monitoring session.
pub struct ProtocolHandler {
    session: Arc<Mutex<MonitorSession>>,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

/// Decode required request params into `T`.
fn params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> McpResult<T> {
    let value = params.ok_or_else(|| McpError::InvalidParams(format!("{method} params required")))?;
    serde_json::from_value(value).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_value(result: impl Serialize) -> McpResult<Value> {
    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ProtocolHandler {
    pub fn new(session: Arc<Mutex<MonitorSession>>) -> Self {
        Self {
            session,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    /// Handle one message. Notifications and stray responses produce no reply.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
                tracing::warn!("Ignoring response-shaped message from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        let id = request.id.clone();
        let outcome = match validate_request(&request) {
            Ok(()) => {
                tracing::debug!("Request {id}: {}", request.method);
                self.dispatch(request).await
            }
            Err(e) => Err(e),
        };

        let reply = match outcome {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)),
            Err(e) => {
                tracing::debug!("Request {id} failed: {e}");
                serde_json::to_value(e.to_json_rpc_error(id))
            }
        };
        reply.unwrap_or_default()
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> McpResult<Value> {
        let JsonRpcRequest { method, params: raw, .. } = request;

        match method.as_str() {
            "initialize" => {
                let init: InitializeParams = params(raw, &method)?;
                let result = self.capabilities.lock().await.negotiate(init)?;
                to_value(result)
            }
            "shutdown" => {
                tracing::info!("Shutdown requested");
                self.session.lock().await.save()?;
                Ok(empty())
            }
            "ping" => Ok(empty()),

            "tools/list" => to_value(ToolListResult {
                tools: ToolRegistry::list_tools(),
                next_cursor: None,
            }),
            "tools/call" => {
                let call: ToolCallParams = params(raw, &method)?;
                to_value(ToolRegistry::call(&call.name, call.arguments, &self.session).await?)
            }

            "resources/list" => to_value(ResourceListResult {
                resources: ResourceRegistry::list_resources(),
                next_cursor: None,
            }),
            "resources/templates/list" => to_value(ResourceTemplateListResult {
                resource_templates: ResourceRegistry::list_templates(),
                next_cursor: None,
            }),
            "resources/read" => {
                let read: ResourceReadParams = params(raw, &method)?;
                to_value(ResourceRegistry::read(&read.uri, &self.session).await?)
            }

            "prompts/list" => to_value(PromptListResult {
                prompts: PromptRegistry::list_prompts(),
                next_cursor: None,
            }),
            "prompts/get" => {
                let get: PromptGetParams = params(raw, &method)?;
                to_value(PromptRegistry::get(&get.name, get.arguments).await?)
            }

            _ => Err(McpError::MethodNotFound(method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                if let Err(e) = self.capabilities.lock().await.mark_initialized() {
                    tracing::error!("Failed to mark initialized: {e}");
                }
            }
            "notifications/cancelled" => {
                tracing::debug!("Client cancelled a request; requests run to completion");
            }
            other => tracing::debug!("Unknown notification: {other}"),
        }
    }
}
