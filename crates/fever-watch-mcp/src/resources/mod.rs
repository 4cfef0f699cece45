//! MCP resource implementations.

pub mod alerts;
pub mod device;
pub mod history;
pub mod registry;
pub mod series;
pub mod status;
pub mod templates;

pub use registry::ResourceRegistry;
