//! FeverWatch core library for monitoring a child's body temperature:
//! timestamp normalization, display formatting, series statistics and trend,
//! device status, fever alerts, and the persisted reading log.

pub mod alerts;
pub mod format;
pub mod grouping;
pub mod series;
pub mod status;
pub mod storage;
pub mod timestamp;
pub mod types;
pub mod zone;

pub use alerts::{active_alert, evaluate_reading, AlertTransition, FeverAlert};
pub use format::{
    relative_from_seconds, Clock, DisplayConfig, DisplayFormatter, FixedClock, SystemClock,
    INVALID_DATE, UNKNOWN_AGE,
};
pub use grouping::{group_by_hour, HourlyGroup, COLLAPSED_HISTORY_LEN};
pub use series::{
    classify_trend, derive_series, is_fever, parse_date_filter, ResolvedSample, SeriesOptions,
    SeriesOutcome, SeriesStats, Trend, TREND_DEAD_BAND,
};
pub use status::{classify_status, DeviceStatus, StatusReport, DEFAULT_FRESHNESS_SECS};
pub use storage::{ReadingLogReader, ReadingLogWriter};
pub use timestamp::{parse, parse_opt, parse_value, CanonicalInstant, TimestampError};
pub use types::*;
pub use zone::ReferenceZone;
