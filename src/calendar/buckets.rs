//! Day buckets: appointments grouped by calendar date.

use chrono::NaiveDate;

use super::appointment::{compare_by_dates, AppointmentRef};

/// One appointment in a [`DayBucket`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    pub appointment: AppointmentRef,
    /// True only for the first entry of its bucket.
    pub is_first_of_day: bool,
}

/// The appointments associated with one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    date: NaiveDate,
    entries: Vec<BucketEntry>,
}

impl DayBucket {
    /// An empty bucket for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entries(&self) -> &[BucketEntry] {
        &self.entries
    }

    pub fn appointments(&self) -> impl Iterator<Item = &AppointmentRef> {
        self.entries.iter().map(|e| &e.appointment)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert in chronological position.
    pub fn insert(&mut self, appointment: AppointmentRef) {
        let index = self
            .entries
            .partition_point(|e| compare_by_dates(&e.appointment, &appointment).is_le());
        self.entries.insert(
            index,
            BucketEntry {
                appointment,
                is_first_of_day: false,
            },
        );
        self.refresh_flags();
    }

    /// Remove every entry with `primary_key`. Returns whether any was removed.
    pub fn remove(&mut self, primary_key: i64) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.appointment.primary_key != primary_key);
        let removed = self.entries.len() != before;
        if removed {
            self.refresh_flags();
        }
        removed
    }

    fn push(&mut self, appointment: AppointmentRef) {
        self.entries.push(BucketEntry {
            appointment,
            is_first_of_day: false,
        });
    }

    fn refresh_flags(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.is_first_of_day = i == 0;
        }
    }
}

/// Group already-ordered `(date, appointment)` pairs into buckets.
///
/// Consecutive pairs with the same date share a bucket; callers pass pairs
/// sorted by date.
pub(crate) fn group_by_date(
    pairs: impl IntoIterator<Item = (NaiveDate, AppointmentRef)>,
) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = Vec::new();
    for (date, appointment) in pairs {
        match buckets.last_mut() {
            Some(bucket) if bucket.date == date => bucket.push(appointment),
            _ => {
                let mut bucket = DayBucket::new(date);
                bucket.push(appointment);
                buckets.push(bucket);
            }
        }
    }
    for bucket in &mut buckets {
        bucket.refresh_flags();
    }
    buckets
}

// ============================================================================
// Day Bucket Index
// ============================================================================

/// Appointments grouped by start date, in ascending date order.
///
/// Each appointment belongs to exactly one bucket, keyed by the date of its
/// start, even when it runs past midnight. For one entry per day touched use
/// [`DayEntryList`](super::sync::DayEntryList).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayBucketIndex {
    buckets: Vec<DayBucket>,
}

impl DayBucketIndex {
    /// Group a snapshot of appointments into ordered buckets.
    pub fn create_buckets<'a>(
        appointments: impl IntoIterator<Item = &'a AppointmentRef>,
    ) -> Vec<DayBucket> {
        let mut sorted: Vec<&AppointmentRef> = appointments.into_iter().collect();
        sorted.sort_by(|a, b| compare_by_dates(a, b));
        group_by_date(
            sorted
                .into_iter()
                .map(|a| (a.start.date(), AppointmentRef::clone(a))),
        )
    }

    pub fn new<'a>(appointments: impl IntoIterator<Item = &'a AppointmentRef>) -> Self {
        Self {
            buckets: Self::create_buckets(appointments),
        }
    }

    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    pub fn bucket(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.buckets
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.buckets[i])
    }

    /// Add an appointment to the bucket for its start date.
    pub fn insert(&mut self, appointment: AppointmentRef) {
        let date = appointment.start.date();
        match self.buckets.binary_search_by_key(&date, |b| b.date) {
            Ok(i) => self.buckets[i].insert(appointment),
            Err(i) => {
                let mut bucket = DayBucket::new(date);
                bucket.insert(appointment);
                self.buckets.insert(i, bucket);
            }
        }
    }

    /// Remove an appointment by key, dropping its bucket if it empties.
    pub fn remove(&mut self, primary_key: i64) -> bool {
        let mut removed = false;
        for bucket in &mut self.buckets {
            removed |= bucket.remove(primary_key);
        }
        self.buckets.retain(|b| !b.is_empty());
        removed
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
