//! Reference zone used to place instants on a local calendar and clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::types::FeverError;

/// Either a named IANA zone (`Asia/Kolkata`, `America/New_York`) or a plain
/// UTC offset (`+05:30`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self::Named(Tz::UTC)
    }
}

impl ReferenceZone {
    /// Local wall clock for `utc`, carrying the offset in force at that instant.
    pub fn localize(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Named(tz) => utc.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => utc.with_timezone(offset),
        }
    }
}

impl FromStr for ReferenceZone {
    type Err = FeverError;

    /// IANA names first, then chrono's offset syntax.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(tz) = trimmed.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }
        trimmed
            .parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| FeverError::InvalidInput(format!("Unknown time zone: {raw:?}")))
    }
}

impl fmt::Display for ReferenceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl From<Tz> for ReferenceZone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl From<FixedOffset> for ReferenceZone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}
