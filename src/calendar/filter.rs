//! Appointment filters and a shared, lock-guarded filter holder.

use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::appointment::Appointment;
use super::week::week_start;

/// Criteria an appointment must satisfy to be loaded into a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    /// Inclusive start of the date-time range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_start: Option<NaiveDateTime>,
    /// Exclusive end of the date-time range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl AppointmentFilter {
    /// A filter that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Appointments intersecting `[start, end)`.
    pub fn for_range(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            range_start: Some(start),
            range_end: Some(end),
            ..Self::default()
        }
    }

    /// Appointments intersecting the month containing `date`.
    pub fn for_month(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let next = first.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
        Self::for_range(first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN))
    }

    /// Appointments intersecting the Sunday-first week containing `date`.
    pub fn for_week(date: NaiveDate) -> Self {
        let start = week_start(date).and_time(NaiveTime::MIN);
        let end = start
            .checked_add_signed(TimeDelta::days(7))
            .unwrap_or(NaiveDateTime::MAX);
        Self::for_range(start, end)
    }

    /// Restrict to one customer.
    pub fn with_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Restrict to one user.
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Whether `appointment` satisfies every criterion.
    pub fn accepts(&self, appointment: &Appointment) -> bool {
        if let Some(end) = self.range_end {
            if appointment.start >= end {
                return false;
            }
        }
        if let Some(start) = self.range_start {
            if appointment.end <= start {
                return false;
            }
        }
        if let Some(id) = self.customer_id {
            if appointment.customer.as_ref().map(|c| c.id) != Some(id) {
                return false;
            }
        }
        if let Some(id) = self.user_id {
            if appointment.user.as_ref().map(|u| u.id) != Some(id) {
                return false;
            }
        }
        true
    }
}

/// A filter shared between a view and a background loader.
///
/// The whole filter sits behind one mutex, so a reader always sees a
/// consistent set of criteria.
#[derive(Debug, Clone, Default)]
pub struct SharedFilter {
    inner: Arc<Mutex<AppointmentFilter>>,
}

impl SharedFilter {
    pub fn new(filter: AppointmentFilter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(filter)),
        }
    }

    /// A copy of the current filter.
    pub fn get(&self) -> AppointmentFilter {
        self.inner.lock().clone()
    }

    /// Replace the filter, returning the previous one.
    pub fn set(&self, filter: AppointmentFilter) -> AppointmentFilter {
        std::mem::replace(&mut *self.inner.lock(), filter)
    }

    /// Modify several fields under a single lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut AppointmentFilter) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    pub fn accepts(&self, appointment: &Appointment) -> bool {
        self.inner.lock().accepts(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::appointment::Party;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_filter_is_half_open() {
        let filter = AppointmentFilter::for_month(date(2024, 3, 17));
        assert_eq!(filter.range_start, Some(at(2024, 3, 1, 0)));
        assert_eq!(filter.range_end, Some(at(2024, 4, 1, 0)));

        let ends_at_start = Appointment::new(1, at(2024, 2, 29, 22), at(2024, 3, 1, 0));
        let spills_in = Appointment::new(2, at(2024, 2, 29, 22), at(2024, 3, 1, 1));
        let starts_at_end = Appointment::new(3, at(2024, 4, 1, 0), at(2024, 4, 1, 1));
        assert!(!filter.accepts(&ends_at_start));
        assert!(filter.accepts(&spills_in));
        assert!(!filter.accepts(&starts_at_end));
    }

    #[test]
    fn test_week_filter() {
        // 2024-03-06 is a Wednesday; the week starts Sunday 2024-03-03.
        let filter = AppointmentFilter::for_week(date(2024, 3, 6));
        assert_eq!(filter.range_start, Some(at(2024, 3, 3, 0)));
        assert_eq!(filter.range_end, Some(at(2024, 3, 10, 0)));
    }

    #[test]
    fn test_party_constraints() {
        let a = Appointment::new(1, at(2024, 3, 5, 9), at(2024, 3, 5, 10))
            .with_customer(Party::new(10, "Acme"))
            .with_user(Party::new(20, "dana"));

        assert!(AppointmentFilter::all().accepts(&a));
        assert!(AppointmentFilter::all().with_customer(10).accepts(&a));
        assert!(!AppointmentFilter::all().with_customer(11).accepts(&a));
        assert!(!AppointmentFilter::all().with_user(21).accepts(&a));

        let bare = Appointment::new(2, at(2024, 3, 5, 9), at(2024, 3, 5, 10));
        assert!(!AppointmentFilter::all().with_user(20).accepts(&bare));
    }

    #[test]
    fn test_shared_filter_updates_atomically() {
        let shared = SharedFilter::default();
        let handle = shared.clone();

        handle.update(|f| {
            f.range_start = Some(at(2024, 3, 1, 0));
            f.range_end = Some(at(2024, 3, 2, 0));
        });
        assert_eq!(shared.get(), AppointmentFilter::for_range(at(2024, 3, 1, 0), at(2024, 3, 2, 0)));

        let previous = shared.set(AppointmentFilter::all());
        assert!(previous.range_start.is_some());
        assert_eq!(handle.get(), AppointmentFilter::all());
    }

    #[test]
    fn test_shared_filter_across_threads() {
        let shared = SharedFilter::new(AppointmentFilter::all());
        let handle = shared.clone();
        std::thread::spawn(move || {
            handle.set(AppointmentFilter::for_month(date(2024, 5, 1)));
        })
        .join()
        .unwrap();
        assert_eq!(shared.get().range_end, Some(at(2024, 6, 1, 0)));
    }
}
