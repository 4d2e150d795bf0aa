//! Non-negative durations in whole minutes.

use std::fmt;
use std::ops::Add;

use chrono::TimeDelta;

use super::change::PropertyChange;
use crate::error::ValidationError;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// A non-negative duration with minute precision.
///
/// Viewed either as `{days, hours 0-23, minutes 0-59}` or as total minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    total_minutes: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { total_minutes: 0 };

    /// Create a duration from normalized components.
    pub fn new(days: i64, hours: i32, minutes: i32) -> Result<Self, ValidationError> {
        if days < 0 {
            return Err(ValidationError::NegativeDuration(
                days.saturating_mul(MINUTES_PER_DAY),
            ));
        }
        if !(0..24).contains(&hours) {
            return Err(ValidationError::HourOutOfRange(hours as i64));
        }
        if !(0..60).contains(&minutes) {
            return Err(ValidationError::MinuteOutOfRange(minutes as i64));
        }
        let total_minutes = days
            .checked_mul(MINUTES_PER_DAY)
            .and_then(|m| m.checked_add(hours as i64 * MINUTES_PER_HOUR + minutes as i64))
            .ok_or(ValidationError::DateOutOfRange)?;
        Ok(Self { total_minutes })
    }

    /// Create a duration from an unbounded hour count and a minute field.
    pub fn from_hours_minutes(hours: i64, minutes: i32) -> Result<Self, ValidationError> {
        if hours < 0 {
            return Err(ValidationError::NegativeDuration(
                hours.saturating_mul(MINUTES_PER_HOUR),
            ));
        }
        if !(0..60).contains(&minutes) {
            return Err(ValidationError::MinuteOutOfRange(minutes as i64));
        }
        let total_minutes = hours
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|m| m.checked_add(minutes as i64))
            .ok_or(ValidationError::DateOutOfRange)?;
        Ok(Self { total_minutes })
    }

    pub fn from_minutes(total_minutes: i64) -> Result<Self, ValidationError> {
        if total_minutes < 0 {
            return Err(ValidationError::NegativeDuration(total_minutes));
        }
        Ok(Self { total_minutes })
    }

    /// Convert a chrono delta, truncating below one minute.
    pub fn from_time_delta(delta: TimeDelta) -> Result<Self, ValidationError> {
        Self::from_minutes(delta.num_minutes())
    }

    pub fn days(&self) -> i64 {
        self.total_minutes / MINUTES_PER_DAY
    }

    pub fn hours(&self) -> u32 {
        ((self.total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR) as u32
    }

    pub fn minutes(&self) -> u32 {
        (self.total_minutes % MINUTES_PER_HOUR) as u32
    }

    pub fn total_minutes(&self) -> i64 {
        self.total_minutes
    }

    pub fn is_zero(&self) -> bool {
        self.total_minutes == 0
    }

    /// The same length as a chrono delta, or `None` past chrono's range.
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        TimeDelta::try_minutes(self.total_minutes)
    }

    /// Replace the total length. Negative input fails and leaves `self` as is.
    pub fn set_total_minutes(
        &mut self,
        total_minutes: i64,
    ) -> Result<Option<PropertyChange<Duration>>, ValidationError> {
        let updated = Self::from_minutes(total_minutes)?;
        let change = PropertyChange::between("duration", *self, updated);
        *self = updated;
        Ok(change)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration {
            total_minutes: self.total_minutes.saturating_add(rhs.total_minutes),
        }
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = ValidationError;

    fn try_from(delta: TimeDelta) -> Result<Self, Self::Error> {
        Self::from_time_delta(delta)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days() > 0 {
            write!(f, "{}d {:02}:{:02}", self.days(), self.hours(), self.minutes())
        } else {
            write!(f, "{:02}:{:02}", self.hours(), self.minutes())
        }
    }
}
