//! Human-readable rendering of reading timestamps.
//!
//! Formatting is configured explicitly through [`DisplayConfig`] (the
//! reference zone) and a [`Clock`] so that "now" can be pinned in tests.

use chrono::{DateTime, Utc};

use crate::timestamp::{parse, CanonicalInstant};
use crate::types::FeverResult;
use crate::zone::ReferenceZone;

/// Placeholder for absolute renderings of an unparseable timestamp.
pub const INVALID_DATE: &str = "Invalid Date";

/// Placeholder for relative renderings of an unparseable timestamp.
pub const UNKNOWN_AGE: &str = "Unknown";

const ABSOLUTE_LAYOUT: &str = "%d %b %Y, %H:%M:%S";
const TIME_ONLY_LAYOUT: &str = "%H:%M:%S";

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Display settings shared by every rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayConfig {
    /// Reference zone for absolute and time-only renderings.
    pub zone: ReferenceZone,
}

impl DisplayConfig {
    pub fn with_zone(zone: impl Into<ReferenceZone>) -> Self {
        Self { zone: zone.into() }
    }

    /// Build a config from an IANA name (`Asia/Kolkata`) or an offset (`+05:30`).
    pub fn from_zone_str(zone: &str) -> FeverResult<Self> {
        zone.parse::<ReferenceZone>().map(Self::with_zone)
    }
}

/// Render elapsed whole seconds as `"{n}s ago"`, `"{n}m ago"`, `"{n}h ago"` or `"{n}d ago"`.
pub fn relative_from_seconds(elapsed_secs: i64) -> String {
    let secs = elapsed_secs.max(0);
    if secs < SECS_PER_MINUTE {
        format!("{secs}s ago")
    } else if secs < SECS_PER_HOUR {
        format!("{}m ago", secs / SECS_PER_MINUTE)
    } else if secs < SECS_PER_DAY {
        format!("{}h ago", secs / SECS_PER_HOUR)
    } else {
        format!("{}d ago", secs / SECS_PER_DAY)
    }
}

/// Formats raw reading timestamps for display.
#[derive(Debug, Clone)]
pub struct DisplayFormatter<C: Clock = SystemClock> {
    config: DisplayConfig,
    clock: C,
}

impl DisplayFormatter<SystemClock> {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> DisplayFormatter<C> {
    pub fn with_clock(config: DisplayConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn zone(&self) -> ReferenceZone {
        self.config.zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Date and 24-hour time in the reference zone, e.g. `22 Aug 2025, 09:31:35`.
    ///
    /// `None` renders the current instant; an unparseable timestamp renders
    /// [`INVALID_DATE`].
    pub fn format_absolute(&self, raw: Option<&str>) -> String {
        self.render(raw, ABSOLUTE_LAYOUT)
    }

    /// 24-hour time of day in the reference zone, e.g. `09:31:35`.
    pub fn format_time_only(&self, raw: Option<&str>) -> String {
        self.render(raw, TIME_ONLY_LAYOUT)
    }

    /// Age of a reading relative to the clock, e.g. `1h ago`.
    pub fn format_relative(&self, raw: &str) -> String {
        match parse(raw) {
            Ok(instant) => self.format_relative_instant(&instant),
            Err(e) => {
                tracing::debug!("Cannot compute age of {raw:?}: {e}");
                UNKNOWN_AGE.to_string()
            }
        }
    }

    pub fn format_relative_instant(&self, instant: &CanonicalInstant) -> String {
        let elapsed = self.clock.now().signed_duration_since(instant.as_utc());
        relative_from_seconds(elapsed.num_seconds())
    }

    pub fn format_instant(&self, instant: &CanonicalInstant) -> String {
        instant
            .in_zone(&self.config.zone)
            .format(ABSOLUTE_LAYOUT)
            .to_string()
    }

    fn render(&self, raw: Option<&str>, layout: &str) -> String {
        let instant = match raw {
            None => CanonicalInstant::from_utc(self.clock.now()),
            Some(raw) => match parse(raw) {
                Ok(instant) => instant,
                Err(e) => {
                    tracing::debug!("Cannot format {raw:?}: {e}");
                    return INVALID_DATE.to_string();
                }
            },
        };

        instant
            .in_zone(&self.config.zone)
            .format(layout)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist() -> DisplayConfig {
        DisplayConfig::from_zone_str("+05:30").unwrap()
    }

    fn pinned(config: DisplayConfig) -> DisplayFormatter<FixedClock> {
        let now = Utc.with_ymd_and_hms(2025, 8, 22, 5, 2, 36).unwrap();
        DisplayFormatter::with_clock(config, FixedClock(now))
    }

    #[test]
    fn test_absolute_in_utc() {
        let fmt = pinned(DisplayConfig::default());
        assert_eq!(
            fmt.format_absolute(Some("20250822T040135293")),
            "22 Aug 2025, 04:01:35"
        );
    }

    #[test]
    fn test_absolute_in_fixed_zone() {
        let fmt = pinned(ist());
        assert_eq!(
            fmt.format_absolute(Some("20250822T040135293")),
            "22 Aug 2025, 09:31:35"
        );
        assert_eq!(fmt.format_time_only(Some("20250822T040135293")), "09:31:35");
    }

    #[test]
    fn test_zone_can_cross_midnight() {
        let fmt = pinned(DisplayConfig::from_zone_str("-08:00").unwrap());
        assert_eq!(
            fmt.format_absolute(Some("2025-08-22T03:00:00Z")),
            "21 Aug 2025, 19:00:00"
        );
    }

    #[test]
    fn test_absent_means_now() {
        let fmt = pinned(DisplayConfig::default());
        assert_eq!(fmt.format_absolute(None), "22 Aug 2025, 05:02:36");
        assert_eq!(fmt.format_time_only(None), "05:02:36");
    }

    #[test]
    fn test_invalid_placeholders() {
        let fmt = pinned(DisplayConfig::default());
        assert_eq!(fmt.format_absolute(Some("garbage")), INVALID_DATE);
        assert_eq!(fmt.format_absolute(Some("")), INVALID_DATE);
        assert_eq!(fmt.format_time_only(Some("20251399T000000000")), INVALID_DATE);
        assert_eq!(fmt.format_relative("garbage"), UNKNOWN_AGE);
    }

    #[test]
    fn test_relative_thresholds() {
        let fmt = pinned(DisplayConfig::default());
        // 3661 seconds before now
        assert_eq!(fmt.format_relative("2025-08-22T04:01:35Z"), "1h ago");
        assert_eq!(fmt.format_relative("2025-08-22T05:02:36Z"), "0s ago");
        assert_eq!(fmt.format_relative("2025-08-22T05:01:37Z"), "59s ago");
        assert_eq!(fmt.format_relative("2025-08-22T05:01:36Z"), "1m ago");
        assert_eq!(fmt.format_relative("2025-08-21T05:02:36Z"), "1d ago");
    }

    #[test]
    fn test_relative_floors() {
        assert_eq!(relative_from_seconds(119), "1m ago");
        assert_eq!(relative_from_seconds(3_599), "59m ago");
        assert_eq!(relative_from_seconds(86_399), "23h ago");
        assert_eq!(relative_from_seconds(3 * 86_400 + 86_399), "3d ago");
    }

    #[test]
    fn test_future_clamps_to_zero() {
        let fmt = pinned(DisplayConfig::default());
        assert_eq!(fmt.format_relative("2025-08-22T06:00:00Z"), "0s ago");
    }

    #[test]
    fn test_absolute_in_named_zone() {
        let fmt = pinned(DisplayConfig::from_zone_str("Asia/Kolkata").unwrap());
        assert_eq!(
            fmt.format_absolute(Some("20250822T040135293")),
            "22 Aug 2025, 09:31:35"
        );
    }

    #[test]
    fn test_named_zone_tracks_daylight_saving() {
        let fmt = pinned(DisplayConfig::from_zone_str("Europe/London").unwrap());
        assert_eq!(fmt.format_time_only(Some("2025-01-10T12:00:00Z")), "12:00:00");
        assert_eq!(fmt.format_time_only(Some("2025-07-10T12:00:00Z")), "13:00:00");
    }
}
