//! Sunday-first week view.

use chrono::{Datelike, NaiveDate, TimeDelta};

use super::appointment::{compare_by_dates, AppointmentRef};

pub const DAYS_PER_WEEK: usize = 7;

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(TimeDelta::days(date.weekday().num_days_from_sunday() as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// Appointments for one Sunday-first week, grouped by the days they touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    start: NaiveDate,
    days: [Vec<AppointmentRef>; DAYS_PER_WEEK],
}

impl WeekView {
    /// An empty view of the week containing `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            start: week_start(date),
            days: Default::default(),
        }
    }

    /// Build the view for the week containing `date`.
    pub fn build<'a>(
        date: NaiveDate,
        appointments: impl IntoIterator<Item = &'a AppointmentRef>,
    ) -> Self {
        let mut view = Self::new(date);
        view.set_appointments(appointments);
        view
    }

    /// Replace the view's contents. Degenerate appointments are skipped.
    pub fn set_appointments<'a>(&mut self, appointments: impl IntoIterator<Item = &'a AppointmentRef>) {
        for day in &mut self.days {
            day.clear();
        }
        let start = self.start;
        for appointment in appointments {
            if appointment.is_degenerate() {
                continue;
            }
            for (index, date) in start.iter_days().take(DAYS_PER_WEEK).enumerate() {
                if appointment.touches(date) {
                    self.days[index].push(AppointmentRef::clone(appointment));
                }
            }
        }
        for day in &mut self.days {
            day.sort_by(|a, b| compare_by_dates(a, b));
        }
    }

    /// The Sunday this week starts on.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The seven dates of the week, Sunday first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(DAYS_PER_WEEK)
    }

    /// Appointments touching the day at `index` (0 = Sunday).
    pub fn day(&self, index: usize) -> Option<&[AppointmentRef]> {
        self.days.get(index).map(Vec::as_slice)
    }

    /// Appointments touching `date`, or `None` if it is outside the week.
    pub fn on(&self, date: NaiveDate) -> Option<&[AppointmentRef]> {
        let offset = (date - self.start).num_days();
        usize::try_from(offset).ok().and_then(|i| self.day(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::appointment::Appointment;
    use chrono::NaiveDateTime;

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
    fn test_week_start() {
        assert_eq!(week_start(date(2024, 3, 6)), date(2024, 3, 3));
        assert_eq!(week_start(date(2024, 3, 3)), date(2024, 3, 3));
        assert_eq!(week_start(date(2024, 3, 2)), date(2024, 2, 25));
    }

    #[test]
    fn test_week_start_clamps_at_calendar_minimum() {
        assert_eq!(week_start(NaiveDate::MIN), NaiveDate::MIN);

        let view = WeekView::new(NaiveDate::MIN);
        assert_eq!(view.dates().next(), Some(NaiveDate::MIN));
    }

    #[test]
    fn test_groups_by_days_touched() {
        let overnight = Appointment::new(1, at(2024, 3, 5, 22), at(2024, 3, 6, 2)).shared();
        let morning = Appointment::new(2, at(2024, 3, 6, 8), at(2024, 3, 6, 9)).shared();
        let outside = Appointment::new(3, at(2024, 3, 11, 8), at(2024, 3, 11, 9)).shared();
        let empty = Appointment::new(4, at(2024, 3, 7, 8), at(2024, 3, 7, 8)).shared();

        let view = WeekView::build(date(2024, 3, 6), [&morning, &overnight, &outside, &empty]);
        assert_eq!(view.start(), date(2024, 3, 3));

        let tuesday: Vec<_> = view.day(2).unwrap().iter().map(|a| a.primary_key).collect();
        let wednesday: Vec<_> = view
            .on(date(2024, 3, 6))
            .unwrap()
            .iter()
            .map(|a| a.primary_key)
            .collect();
        assert_eq!(tuesday, vec![1]);
        assert_eq!(wednesday, vec![1, 2]);
        assert!(view.on(date(2024, 3, 7)).unwrap().is_empty());
        assert!(view.on(date(2024, 3, 11)).is_none());
        assert!(view.on(date(2024, 3, 2)).is_none());
    }
}
