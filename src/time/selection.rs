//! Date-and-time selections, optionally bound to a time zone.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::clock::TimeValue;
use super::duration::Duration;
use super::zone::{self, convert_same_instant, resolve_local};
use crate::error::ValidationError;

// ============================================================================
// Naive Selection
// ============================================================================

/// A calendar date plus a wall-clock time of day, with no zone attached.
///
/// Ordered lexicographically by date, then time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeSelection {
    date: NaiveDate,
    time: TimeValue,
}

impl DateTimeSelection {
    pub fn new(date: NaiveDate, time: TimeValue) -> Self {
        Self { date, time }
    }

    /// Build from raw fields, validating the time of day.
    pub fn of(date: NaiveDate, hour: i32, minute: i32) -> Result<Self, ValidationError> {
        Ok(Self::new(date, TimeValue::new(hour, minute)?))
    }

    /// Midnight at the start of `date`.
    pub fn start_of_day(date: NaiveDate) -> Self {
        Self::new(date, TimeValue::MIDNIGHT)
    }

    /// Convert a `NaiveDateTime`, truncating seconds.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self::new(value.date(), TimeValue::from_naive_time(value.time()))
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> TimeValue {
        self.time
    }

    pub fn to_naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time.to_naive_time())
    }

    /// Advance by `duration` (days, then hours, then minutes), rolling the
    /// date over as needed.
    pub fn plus(&self, duration: Duration) -> Result<Self, ValidationError> {
        duration
            .to_time_delta()
            .and_then(|delta| self.to_naive().checked_add_signed(delta))
            .map(Self::from_naive)
            .ok_or(ValidationError::DateOutOfRange)
    }

    /// The duration from `self` to `end`. Fails if `end` comes first.
    pub fn until(&self, end: &DateTimeSelection) -> Result<Duration, ValidationError> {
        if end < self {
            return Err(ValidationError::EndBeforeStart {
                start: self.to_string(),
                end: end.to_string(),
            });
        }
        Duration::from_time_delta(end.to_naive() - self.to_naive())
    }

    /// Label this wall-clock reading with `zone`.
    pub fn at_zone(&self, zone: Tz) -> ZonedDateTimeSelection {
        ZonedDateTimeSelection::new(*self, zone)
    }
}

impl From<NaiveDateTime> for DateTimeSelection {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_naive(value)
    }
}

impl fmt::Display for DateTimeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format("%Y-%m-%d"), self.time)
    }
}

// ============================================================================
// Zoned Selection
// ============================================================================

/// A [`DateTimeSelection`] read in a specific IANA time zone.
///
/// Equality is field-wise (same reading, same zone). Use
/// [`ZonedDateTimeSelection::compare`] to order by actual instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZonedDateTimeSelection {
    selection: DateTimeSelection,
    zone: Tz,
}

impl ZonedDateTimeSelection {
    pub fn new(selection: DateTimeSelection, zone: Tz) -> Self {
        Self { selection, zone }
    }

    /// Capture the wall-clock reading of an instant in its own zone.
    pub fn from_instant(instant: DateTime<Tz>) -> Self {
        Self::new(
            DateTimeSelection::from_naive(instant.naive_local()),
            instant.timezone(),
        )
    }

    pub fn selection(&self) -> DateTimeSelection {
        self.selection
    }

    pub fn date(&self) -> NaiveDate {
        self.selection.date
    }

    pub fn time(&self) -> TimeValue {
        self.selection.time
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The absolute instant this reading denotes.
    pub fn to_instant(&self) -> DateTime<Tz> {
        resolve_local(self.zone, self.selection.to_naive())
    }

    /// Keep the wall-clock reading and relabel the zone (a different instant).
    pub fn with_zone_same_local(&self, zone: Tz) -> Self {
        Self::new(self.selection, zone)
    }

    /// Re-read the same instant in `zone`.
    pub fn with_zone_same_instant(&self, zone: Tz) -> Self {
        if zone == self.zone {
            return *self;
        }
        Self::new(
            DateTimeSelection::from_naive(convert_same_instant(
                self.selection.to_naive(),
                self.zone,
                zone,
            )),
            zone,
        )
    }

    /// Advance the wall-clock reading; the zone is unchanged.
    pub fn plus(&self, duration: Duration) -> Result<Self, ValidationError> {
        Ok(Self::new(self.selection.plus(duration)?, self.zone))
    }

    /// Zone-aware comparison using the process default zone.
    pub fn compare(&self, other: &Selection) -> Ordering {
        self.compare_in(other, zone::default_zone())
    }

    /// Zone-aware comparison with an explicit default zone.
    pub fn compare_in(&self, other: &Selection, default_zone: Tz) -> Ordering {
        Selection::Zoned(*self).compare_in(other, default_zone)
    }
}

impl fmt::Display for ZonedDateTimeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.selection, self.zone.name())
    }
}

// ============================================================================
// Tagged Selection
// ============================================================================

/// Either a naive or a zone-qualified selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Naive(DateTimeSelection),
    Zoned(ZonedDateTimeSelection),
}

impl Selection {
    /// The wall-clock reading, whatever the tag.
    pub fn local(&self) -> DateTimeSelection {
        match self {
            Selection::Naive(s) => *s,
            Selection::Zoned(z) => z.selection,
        }
    }

    pub fn zone(&self) -> Option<Tz> {
        match self {
            Selection::Naive(_) => None,
            Selection::Zoned(z) => Some(z.zone),
        }
    }

    /// The wall-clock reading of this selection's instant in `target`.
    ///
    /// Naive selections are taken to be in `default_zone`.
    pub fn local_in(&self, target: Tz, default_zone: Tz) -> DateTimeSelection {
        let from = self.zone().unwrap_or(default_zone);
        let local = self.local();
        if from == target {
            local
        } else {
            DateTimeSelection::from_naive(convert_same_instant(local.to_naive(), from, target))
        }
    }

    /// Zone-aware comparison using the process default zone.
    pub fn compare(&self, other: &Selection) -> Ordering {
        self.compare_in(other, zone::default_zone())
    }

    /// Zone-aware comparison with an explicit default zone.
    pub fn compare_in(&self, other: &Selection, default_zone: Tz) -> Ordering {
        let (x, y) = align(self, other, default_zone);
        x.cmp(&y)
    }
}

impl From<DateTimeSelection> for Selection {
    fn from(value: DateTimeSelection) -> Self {
        Selection::Naive(value)
    }
}

impl From<ZonedDateTimeSelection> for Selection {
    fn from(value: ZonedDateTimeSelection) -> Self {
        Selection::Zoned(value)
    }
}

/// Bring two selections into a common zone, returning their readings there.
///
/// The target is the left operand's zone, else the right operand's zone.
/// Two naive selections are returned untouched.
pub(crate) fn align(
    x: &Selection,
    y: &Selection,
    default_zone: Tz,
) -> (DateTimeSelection, DateTimeSelection) {
    match x.zone().or(y.zone()) {
        None => (x.local(), y.local()),
        Some(target) => (
            x.local_in(target, default_zone),
            y.local_in(target, default_zone),
        ),
    }
}
