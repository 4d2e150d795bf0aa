//! Incremental synchronisation of a day-expanded appointment list.
//!
//! An upstream collection reports its mutations as a [`ChangeBatch`]. Each
//! structural record is applied to the target list in place: entries for
//! removed or replaced appointments are dropped and the per-day expansion of
//! each added appointment is appended. Entries for unaffected appointments
//! are never touched.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::appointment::{compare_by_dates, AppointmentRef};
use super::buckets::{group_by_date, DayBucket};

// ============================================================================
// Change Records
// ============================================================================

/// One mutation reported by an upstream appointment collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRecord {
    /// Items were reordered; membership is unchanged.
    Permutation,
    /// Items were modified in place; membership is unchanged.
    Update(Vec<AppointmentRef>),
    /// Items were removed and/or added.
    Structural {
        removed: Vec<AppointmentRef>,
        added: Vec<AppointmentRef>,
    },
}

impl ChangeRecord {
    pub fn added(items: Vec<AppointmentRef>) -> Self {
        ChangeRecord::Structural {
            removed: Vec::new(),
            added: items,
        }
    }

    pub fn removed(items: Vec<AppointmentRef>) -> Self {
        ChangeRecord::Structural {
            removed: items,
            added: Vec::new(),
        }
    }

    pub fn replaced(old: AppointmentRef, new: AppointmentRef) -> Self {
        ChangeRecord::Structural {
            removed: vec![old],
            added: vec![new],
        }
    }

    /// Whether this record changes collection membership.
    pub fn is_structural(&self) -> bool {
        matches!(self, ChangeRecord::Structural { removed, added } if !(removed.is_empty() && added.is_empty()))
    }

    pub fn removed_items(&self) -> &[AppointmentRef] {
        match self {
            ChangeRecord::Structural { removed, .. } => removed,
            _ => &[],
        }
    }

    pub fn added_items(&self) -> &[AppointmentRef] {
        match self {
            ChangeRecord::Structural { added, .. } => added,
            _ => &[],
        }
    }
}

/// An ordered batch of change records. Batches must be applied in the order
/// they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    records: Vec<ChangeRecord>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl From<ChangeRecord> for ChangeBatch {
    fn from(record: ChangeRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

impl FromIterator<ChangeRecord> for ChangeBatch {
    fn from_iter<I: IntoIterator<Item = ChangeRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<ChangeRecord> for ChangeBatch {
    fn extend<I: IntoIterator<Item = ChangeRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

// ============================================================================
// Day Entries
// ============================================================================

/// An appointment projected onto one of the calendar days it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub appointment: AppointmentRef,
}

impl DayEntry {
    pub fn new(date: NaiveDate, appointment: AppointmentRef) -> Self {
        Self { date, appointment }
    }

    /// One entry per calendar day the appointment touches.
    pub fn expand(appointment: &AppointmentRef) -> impl Iterator<Item = DayEntry> + '_ {
        appointment
            .days()
            .map(move |date| DayEntry::new(date, AppointmentRef::clone(appointment)))
    }

    pub fn primary_key(&self) -> i64 {
        self.appointment.primary_key
    }

    /// Order by date, then by the appointment's chronological order.
    pub fn compare(&self, other: &DayEntry) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| compare_by_dates(&self.appointment, &other.appointment))
    }
}

/// Apply `batch` to `target`, returning whether `target` was modified.
///
/// Permutation and update records are ignored. For each structural record,
/// entries sharing a key with a removed or added appointment are dropped and
/// the expansion of every added appointment is appended. New entries are
/// appended at the end; callers that need date order re-sort afterwards (see
/// [`DayEntryList`]).
pub fn import_changes(batch: &ChangeBatch, target: &mut Vec<DayEntry>) -> bool {
    let mut changed = false;
    for record in batch.records() {
        let ChangeRecord::Structural { removed, added } = record else {
            trace!("Ignoring non-structural change record");
            continue;
        };

        let mut remove_keys: HashSet<i64> = HashSet::new();
        for item in removed {
            if target.iter().any(|e| e.primary_key() == item.primary_key) {
                remove_keys.insert(item.primary_key);
            }
        }

        let mut to_add: Vec<DayEntry> = Vec::new();
        for item in added {
            if target.iter().any(|e| e.primary_key() == item.primary_key) {
                remove_keys.insert(item.primary_key);
            }
            to_add.extend(DayEntry::expand(item));
        }

        if remove_keys.is_empty() && to_add.is_empty() {
            continue;
        }

        let before = target.len();
        target.retain(|e| !remove_keys.contains(&e.primary_key()));
        debug!(
            "Applied change record: removed {} entries for {} keys, added {} entries",
            before - target.len(),
            remove_keys.len(),
            to_add.len()
        );
        target.extend(to_add);
        changed = true;
    }
    changed
}

// ============================================================================
// Day Entry List
// ============================================================================

/// A date-ordered list of [`DayEntry`] values kept in step with an upstream
/// collection.
#[derive(Debug, Clone, Default)]
pub struct DayEntryList {
    entries: Vec<DayEntry>,
}

impl DayEntryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand and sort a snapshot of appointments.
    pub fn from_appointments<'a>(appointments: impl IntoIterator<Item = &'a AppointmentRef>) -> Self {
        let mut entries: Vec<DayEntry> = appointments
            .into_iter()
            .flat_map(DayEntry::expand)
            .collect();
        entries.sort_by(DayEntry::compare);
        Self { entries }
    }

    pub fn entries(&self) -> &[DayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries falling on `date`.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &DayEntry> {
        self.entries.iter().filter(move |e| e.date == date)
    }

    /// Apply a batch; re-sorts only when something changed.
    pub fn import(&mut self, batch: &ChangeBatch) -> bool {
        let changed = import_changes(batch, &mut self.entries);
        if changed {
            self.entries.sort_by(DayEntry::compare);
        }
        changed
    }

    /// Group the entries into per-day buckets with first-of-day flags.
    pub fn buckets(&self) -> Vec<DayBucket> {
        group_by_date(
            self.entries
                .iter()
                .map(|e| (e.date, AppointmentRef::clone(&e.appointment))),
        )
    }
}
