//! MCP prompt implementations.

pub mod fever_check;
pub mod registry;
pub mod trend_report;

pub use registry::PromptRegistry;
