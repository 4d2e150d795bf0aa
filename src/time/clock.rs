//! Wall-clock time-of-day values.

use std::fmt;

use chrono::{NaiveTime, Timelike};

use super::change::PropertyChange;
use crate::error::ValidationError;

/// A wall-clock time of day with minute precision.
///
/// Ordered by `(hour, minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeValue {
    hour: u32,
    minute: u32,
}

impl TimeValue {
    /// 00:00.
    pub const MIDNIGHT: TimeValue = TimeValue { hour: 0, minute: 0 };

    /// Create a time of day, rejecting out-of-range fields.
    pub fn new(hour: i32, minute: i32) -> Result<Self, ValidationError> {
        Ok(Self {
            hour: check_hour(hour)?,
            minute: check_minute(minute)?,
        })
    }

    /// Truncate a `NaiveTime` to minute precision.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_midnight(&self) -> bool {
        *self == Self::MIDNIGHT
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Replace the hour. Fails without modifying `self` when out of range.
    pub fn set_hour(&mut self, hour: i32) -> Result<Option<PropertyChange<u32>>, ValidationError> {
        let hour = check_hour(hour)?;
        let change = PropertyChange::between("hour", self.hour, hour);
        self.hour = hour;
        Ok(change)
    }

    /// Replace the minute. Fails without modifying `self` when out of range.
    pub fn set_minute(
        &mut self,
        minute: i32,
    ) -> Result<Option<PropertyChange<u32>>, ValidationError> {
        let minute = check_minute(minute)?;
        let change = PropertyChange::between("minute", self.minute, minute);
        self.minute = minute;
        Ok(change)
    }
}

fn check_hour(hour: i32) -> Result<u32, ValidationError> {
    if (0..24).contains(&hour) {
        Ok(hour as u32)
    } else {
        Err(ValidationError::HourOutOfRange(hour as i64))
    }
}

fn check_minute(minute: i32) -> Result<u32, ValidationError> {
    if (0..60).contains(&minute) {
        Ok(minute as u32)
    } else {
        Err(ValidationError::MinuteOutOfRange(minute as i64))
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(time: NaiveTime) -> Self {
        Self::from_naive_time(time)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
