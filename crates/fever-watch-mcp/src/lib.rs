//! FeverWatch MCP server: temperature readings, fever status and trends
//! for LLM clients over stdio.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_device_id, resolve_display_config, resolve_log_path};
pub use protocol::ProtocolHandler;
pub use session::MonitorSession;
pub use transport::StdioTransport;
