//! The upstream appointment collection that views synchronise against.

use std::collections::HashMap;

use tracing::debug;

use super::appointment::AppointmentRef;
use super::filter::AppointmentFilter;
use super::sync::ChangeRecord;

/// An in-memory, filtered collection of appointments keyed by primary key.
///
/// Every mutation returns the [`ChangeRecord`] it produced, or `None` when
/// membership did not change. Records are meant to be forwarded, in order,
/// to [`import_changes`](super::sync::import_changes) and
/// [`MonthPlacementEngine::apply_change`](super::month::MonthPlacementEngine::apply_change).
#[derive(Debug, Clone, Default)]
pub struct AppointmentCollection {
    items: Vec<AppointmentRef>,
    filter: AppointmentFilter,
}

impl AppointmentCollection {
    /// An empty collection that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty collection restricted by `filter`.
    pub fn with_filter(filter: AppointmentFilter) -> Self {
        Self {
            items: Vec::new(),
            filter,
        }
    }

    pub fn items(&self) -> &[AppointmentRef] {
        &self.items
    }

    pub fn filter(&self) -> &AppointmentFilter {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, primary_key: i64) -> Option<&AppointmentRef> {
        self.items.iter().find(|a| a.primary_key == primary_key)
    }

    fn position(&self, primary_key: i64) -> Option<usize> {
        self.items.iter().position(|a| a.primary_key == primary_key)
    }

    /// Add a newly created appointment if the filter accepts it.
    ///
    /// An appointment whose key is already present is treated as an update.
    pub fn insert(&mut self, appointment: AppointmentRef) -> Option<ChangeRecord> {
        if self.position(appointment.primary_key).is_some() {
            return self.update(appointment);
        }
        if !self.filter.accepts(&appointment) {
            debug!(
                "Appointment {} rejected by filter on insert",
                appointment.primary_key
            );
            return None;
        }
        debug!("Inserted appointment {}", appointment.primary_key);
        self.items.push(AppointmentRef::clone(&appointment));
        Some(ChangeRecord::added(vec![appointment]))
    }

    /// Apply an edited appointment.
    ///
    /// The stored entry is replaced when the filter still accepts the new
    /// value and dropped when it no longer does. Unknown keys fall through
    /// to [`insert`](Self::insert).
    pub fn update(&mut self, appointment: AppointmentRef) -> Option<ChangeRecord> {
        let Some(index) = self.position(appointment.primary_key) else {
            return self.insert(appointment);
        };
        if self.items[index] == appointment {
            return None;
        }
        if self.filter.accepts(&appointment) {
            debug!("Updated appointment {}", appointment.primary_key);
            let old = std::mem::replace(&mut self.items[index], AppointmentRef::clone(&appointment));
            Some(ChangeRecord::replaced(old, appointment))
        } else {
            debug!(
                "Appointment {} no longer matches filter; removing",
                appointment.primary_key
            );
            let old = self.items.remove(index);
            Some(ChangeRecord::removed(vec![old]))
        }
    }

    /// Remove an appointment by key.
    pub fn delete(&mut self, primary_key: i64) -> Option<ChangeRecord> {
        let index = self.position(primary_key)?;
        debug!("Deleted appointment {}", primary_key);
        let old = self.items.remove(index);
        Some(ChangeRecord::removed(vec![old]))
    }

    /// Synchronise with a freshly loaded list.
    ///
    /// Items the filter rejects are skipped. Appointments whose key
    /// disappeared or whose value changed are reported as removed; new or
    /// changed ones as added. Unchanged items keep their position.
    pub fn replace_all(
        &mut self,
        appointments: impl IntoIterator<Item = AppointmentRef>,
    ) -> Option<ChangeRecord> {
        let incoming: Vec<AppointmentRef> = appointments
            .into_iter()
            .filter(|a| self.filter.accepts(a))
            .collect();
        let by_key: HashMap<i64, &AppointmentRef> =
            incoming.iter().map(|a| (a.primary_key, a)).collect();

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(incoming.len());
        for item in self.items.drain(..) {
            match by_key.get(&item.primary_key) {
                Some(new) if **new == item => kept.push(item),
                _ => removed.push(item),
            }
        }

        let mut added = Vec::new();
        for item in &incoming {
            if !kept.iter().any(|k: &AppointmentRef| k.primary_key == item.primary_key) {
                added.push(AppointmentRef::clone(item));
            }
        }
        kept.extend(added.iter().cloned());
        self.items = kept;

        debug!(
            "Replaced collection: {} removed, {} added, {} total",
            removed.len(),
            added.len(),
            self.items.len()
        );
        if removed.is_empty() && added.is_empty() {
            None
        } else {
            Some(ChangeRecord::Structural { removed, added })
        }
    }

    /// Install a new filter and drop items it rejects.
    ///
    /// Items the old filter excluded are not recovered; reload with
    /// [`replace_all`](Self::replace_all) to pick them up.
    pub fn set_filter(&mut self, filter: AppointmentFilter) -> Option<ChangeRecord> {
        self.filter = filter;
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .items
            .drain(..)
            .partition(|a| self.filter.accepts(a));
        self.items = kept;
        if removed.is_empty() {
            None
        } else {
            debug!("Filter change removed {} appointments", removed.len());
            Some(ChangeRecord::removed(removed))
        }
    }
}
