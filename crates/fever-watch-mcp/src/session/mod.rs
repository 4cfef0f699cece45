//! Session management for the reading log.

pub mod manager;

pub use manager::{
    MonitorSession, RecordResult, DEFAULT_ALERT_RETENTION_DAYS, DEFAULT_READING_RETENTION_DAYS,
};
