//! Appointment records consumed by the placement and bucketing layers.
//!
//! Appointments are owned by an external data source. This crate reads their
//! key, bounds and associations but never persists them.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{AlmanacError, ValidationError};
use crate::time::{DateTimeSelection, TimeSpan};

/// Shared handle to an immutable appointment.
pub type AppointmentRef = Arc<Appointment>;

// ============================================================================
// Appointment
// ============================================================================

/// A customer or user associated with an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Party {
    /// Primary key of the customer or user record.
    pub id: i64,
    /// Display name.
    pub name: String,
}

impl Party {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A scheduled appointment with an exclusive end.
///
/// `start` and `end` are local wall-clock readings. An appointment whose end
/// does not come after its start is degenerate: it is accepted but occupies
/// no day cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Appointment {
    pub primary_key: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Party>,
}

impl Appointment {
    /// Create an appointment with no associations.
    pub fn new(primary_key: i64, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            primary_key,
            start,
            end,
            title: String::new(),
            customer: None,
            user: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the customer.
    pub fn with_customer(mut self, customer: Party) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Set the user.
    pub fn with_user(mut self, user: Party) -> Self {
        self.user = Some(user);
        self
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> AppointmentRef {
        Arc::new(self)
    }

    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// The appointment as a naive [`TimeSpan`].
    pub fn time_span(&self) -> Result<TimeSpan, ValidationError> {
        TimeSpan::from_bounds(
            DateTimeSelection::from_naive(self.start),
            DateTimeSelection::from_naive(self.end),
        )
    }

    /// Whether this appointment intersects `[range_start, range_end)`.
    pub fn intersects(&self, range_start: NaiveDateTime, range_end: NaiveDateTime) -> bool {
        self.start < range_end && self.end > range_start
    }

    /// Whether the two appointments share any time.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.intersects(other.start, other.end)
    }

    /// Whether the appointment occupies any part of `date`.
    pub fn touches(&self, date: NaiveDate) -> bool {
        let day_start = date.and_time(NaiveTime::MIN);
        let next_day = day_start
            .checked_add_signed(TimeDelta::days(1))
            .unwrap_or(NaiveDateTime::MAX);
        self.intersects(day_start, next_day)
    }

    /// Calendar days this appointment touches, in order.
    ///
    /// An end at exactly midnight does not touch the day it lands on.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date();
        let end_excl = if self.end.time() == NaiveTime::MIN {
            self.end.date()
        } else {
            self.end.date().succ_opt().unwrap_or(NaiveDate::MAX)
        };
        first.iter_days().take_while(move |d| *d < end_excl)
    }
}

/// Chronological order: start, then end, then primary key.
pub fn compare_by_dates(a: &Appointment, b: &Appointment) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.primary_key.cmp(&b.primary_key))
}

// ============================================================================
// Boundary Record
// ============================================================================

/// An appointment as delivered by a data source, with every field optional.
///
/// Convert with `Appointment::try_from`, which fails on the first missing
/// required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub primary_key: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub customer: Option<Party>,
    #[serde(default)]
    pub user: Option<Party>,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = AlmanacError;

    fn try_from(record: AppointmentRecord) -> Result<Self, Self::Error> {
        let missing = |field: &str| AlmanacError::MissingValue(field.to_string());
        Ok(Self {
            primary_key: record.primary_key.ok_or_else(|| missing("primary_key"))?,
            start: record.start.ok_or_else(|| missing("start"))?,
            end: record.end.ok_or_else(|| missing("end"))?,
            title: record.title.unwrap_or_default(),
            customer: record.customer,
            user: record.user,
        })
    }
}

impl From<&Appointment> for AppointmentRecord {
    fn from(appointment: &Appointment) -> Self {
        Self {
            primary_key: Some(appointment.primary_key),
            start: Some(appointment.start),
            end: Some(appointment.end),
            title: Some(appointment.title.clone()),
            customer: appointment.customer.clone(),
            user: appointment.user.clone(),
        }
    }
}

/// Convert a batch of records, failing on the first invalid one.
pub fn appointments_from_records(
    records: impl IntoIterator<Item = AppointmentRecord>,
) -> crate::error::Result<Vec<AppointmentRef>> {
    records
        .into_iter()
        .map(|r| Appointment::try_from(r).map(Arc::new))
        .collect()
}
