//! # Calendar Module
//!
//! Maps stored UTC instants onto the shop's calendar days.
//!
//! Timestamps are stored in UTC. "Today", expense dates and the report
//! buckets are days on the shop's wall clock, so a shop at UTC+06:00 rolls
//! over at local midnight, not at 06:00.
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use opsdesk_core::calendar::Calendar;
//!
//! let dhaka = Calendar::from_offset_minutes(360).unwrap();
//! let late_evening = Utc.with_ymd_and_hms(2024, 5, 20, 19, 30, 0).unwrap();
//! assert_eq!(dhaka.date_of(late_evening), NaiveDate::from_ymd_opt(2024, 5, 21).unwrap());
//! ```

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

use crate::error::ValidationError;

/// Largest accepted offset from UTC, in minutes.
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// A fixed UTC offset for the shop's business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    pub fn utc() -> Self {
        Calendar { offset: Utc.fix() }
    }

    /// `minutes` east of UTC; negative for the west.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        let out_of_range = || ValidationError::OutOfRange {
            field: "utc_offset_minutes".to_string(),
            max: MAX_OFFSET_MINUTES.into(),
        };
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(out_of_range());
        }
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(out_of_range)?;
        Ok(Calendar { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Local calendar day of an instant.
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// The instant local midnight begins `day`.
    pub fn start_of(&self, day: NaiveDate) -> DateTime<Utc> {
        day.and_time(NaiveTime::MIN).and_utc()
            - Duration::seconds(self.offset.local_minus_utc().into())
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Calendar::utc()
    }
}
