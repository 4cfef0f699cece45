//! Hour-by-hour grouping of readings for history views.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::timestamp::{parse, CanonicalInstant};
use crate::types::TemperatureSample;
use crate::zone::ReferenceZone;

/// Number of readings a collapsed history view shows.
pub const COLLAPSED_HISTORY_LEN: usize = 10;

/// Readings that fall in the same clock hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyGroup {
    /// e.g. `22 August 2025 • 9:00`
    pub label: String,
    /// Time of the newest reading in the group, `HH:MM:SS`.
    pub latest_update: String,
    /// Newest first.
    pub samples: Vec<TemperatureSample>,
}

/// Group samples by (date, hour) in `zone`, newest group first.
///
/// Samples with invalid timestamps are skipped. `limit` caps how many of the
/// newest samples are considered before grouping.
pub fn group_by_hour(
    samples: &[TemperatureSample],
    zone: ReferenceZone,
    limit: Option<usize>,
) -> Vec<HourlyGroup> {
    let mut timed: Vec<(CanonicalInstant, &TemperatureSample)> = samples
        .iter()
        .filter_map(|s| parse(&s.raw_timestamp).ok().map(|i| (i, s)))
        .collect();
    timed.sort_by(|a, b| b.0.cmp(&a.0));
    if let Some(limit) = limit {
        timed.truncate(limit);
    }

    let mut groups: Vec<HourlyGroup> = Vec::new();
    let mut current_hour: Option<DateTime<FixedOffset>> = None;

    for (instant, sample) in timed {
        let local = instant.in_zone(&zone);
        let hour = hour_start(local);

        match groups.last_mut() {
            Some(group) if current_hour == Some(hour) => group.samples.push(sample.clone()),
            _ => {
                groups.push(HourlyGroup {
                    label: local.format("%-d %B %Y • %-H:00").to_string(),
                    latest_update: local.format("%H:%M:%S").to_string(),
                    samples: vec![sample.clone()],
                });
                current_hour = Some(hour);
            }
        }
    }

    groups
}

fn hour_start(local: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    local
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> ReferenceZone {
        ReferenceZone::default()
    }

    fn samples() -> Vec<TemperatureSample> {
        vec![
            TemperatureSample::new("20250822T040135293", 37.0),
            TemperatureSample::new("20250822T045900000", 37.3),
            TemperatureSample::new("20250822T050000000", 37.8),
            TemperatureSample::new("not a timestamp", 41.0),
            TemperatureSample::new("2025-08-21T23:10:00Z", 36.9),
        ]
    }

    #[test]
    fn test_groups_newest_first() {
        let groups = group_by_hour(&samples(), utc(), None);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["22 August 2025 • 5:00", "22 August 2025 • 4:00", "21 August 2025 • 23:00"]
        );
        assert_eq!(groups[1].samples.len(), 2);
        assert_eq!(groups[1].latest_update, "04:59:00");
        assert_eq!(groups[1].samples[0].temperature_c, 37.3);
    }

    #[test]
    fn test_zone_shifts_buckets() {
        let ist = ReferenceZone::Fixed(FixedOffset::east_opt(19_800).unwrap());
        let groups = group_by_hour(&samples(), ist, None);
        // 04:01Z and 04:59Z straddle 10:00 at +05:30.
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["22 August 2025 • 10:00", "22 August 2025 • 9:00", "22 August 2025 • 4:00"]
        );
        assert_eq!(groups[0].samples.len(), 2);
    }

    #[test]
    fn test_repeated_hour_at_fall_back_stays_split() {
        // 05:30Z and 06:30Z both read 01:30 in New York on 2 Nov 2025.
        let samples = vec![
            TemperatureSample::new("2025-11-02T05:30:00Z", 37.1),
            TemperatureSample::new("2025-11-02T06:30:00Z", 37.6),
        ];
        let new_york: ReferenceZone = "America/New_York".parse().unwrap();
        let groups = group_by_hour(&samples, new_york, None);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "2 November 2025 • 1:00");
        assert_eq!(groups[1].label, "2 November 2025 • 1:00");
        assert_eq!(groups[0].samples[0].temperature_c, 37.6);
        assert_eq!(groups[0].latest_update, "01:30:00");
    }

    #[test]
    fn test_limit_applies_before_grouping() {
        let groups = group_by_hour(&samples(), utc(), Some(2));
        let total: usize = groups.iter().map(|g| g.samples.len()).sum();
        assert_eq!(total, 2);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(group_by_hour(&[], utc(), Some(COLLAPSED_HISTORY_LEN)).is_empty());
    }
}
