//! Month-grid placement of appointments.
//!
//! The grid always holds [`MAX_CELLS`] day cells. Cells past the end of a
//! short month are cleared and carry no date or grid position. Days are laid
//! out in Sunday-first week rows:
//!
//! ```text
//!  Su Mo Tu We Th Fr Sa
//!                 1  2     row 0   (March 2024)
//!   3  4  5  6  7  8  9    row 1
//!  ...
//! ```
//!
//! An appointment occupies every cell of the displayed month whose day it
//! touches. Each placement records whether the appointment continues from
//! the previous day and onto the next one.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;
use tracing::{debug, trace};

use super::appointment::{compare_by_dates, AppointmentRef};
use super::sync::ChangeRecord;
use super::week::DAYS_PER_WEEK;

/// Number of day cells in the grid.
pub const MAX_CELLS: usize = 31;

/// Row and column of a day cell. Column 0 is Sunday; row 0 is the week
/// containing the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridPosition {
    pub row: u32,
    pub column: u32,
}

/// One appointment placed in a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    pub appointment: AppointmentRef,
    /// The appointment started before this cell's day.
    pub continued_from_previous: bool,
    /// The appointment runs past the end of this cell's day.
    pub continued_on_next: bool,
}

/// A single day cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthCell {
    date: Option<NaiveDate>,
    position: Option<GridPosition>,
    entries: Vec<CellEntry>,
}

impl MonthCell {
    /// The day shown in this cell, or `None` for hidden trailing cells.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn position(&self) -> Option<GridPosition> {
        self.position
    }

    pub fn is_visible(&self) -> bool {
        self.date.is_some()
    }

    pub fn entries(&self) -> &[CellEntry] {
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

    /// Whether any entry continues from the previous day.
    pub fn continued_from_previous(&self) -> bool {
        self.entries.iter().any(|e| e.continued_from_previous)
    }

    /// Whether any entry continues onto the next day.
    pub fn continued_on_next(&self) -> bool {
        self.entries.iter().any(|e| e.continued_on_next)
    }

    fn clear(&mut self) {
        self.date = None;
        self.position = None;
        self.entries.clear();
    }
}

// ============================================================================
// Placement Engine
// ============================================================================

/// Places a collection of appointments onto the day cells of one month.
///
/// Cells are recomputed when the target month changes, when the collection
/// is replaced, or when a structural change is applied. Mutating an
/// appointment in place requires an explicit [`refresh`](Self::refresh).
#[derive(Debug, Clone)]
pub struct MonthPlacementEngine {
    month_start: NaiveDate,
    appointments: Vec<AppointmentRef>,
    cells: Vec<MonthCell>,
    days_in_month: usize,
}

impl MonthPlacementEngine {
    /// An empty engine showing the month containing `target_date`.
    pub fn new(target_date: NaiveDate) -> Self {
        let mut engine = Self {
            month_start: first_of_month(target_date),
            appointments: Vec::new(),
            cells: vec![MonthCell::default(); MAX_CELLS],
            days_in_month: 0,
        };
        engine.populate();
        engine
    }

    /// Show the month containing `date`.
    ///
    /// Returns `true` if the year or month changed; the cells are only
    /// recomputed in that case.
    pub fn set_target_month(&mut self, date: NaiveDate) -> bool {
        let month_start = first_of_month(date);
        if month_start == self.month_start {
            return false;
        }
        self.month_start = month_start;
        self.populate();
        true
    }

    /// Replace the appointment collection and recompute.
    pub fn set_appointments<'a>(&mut self, appointments: impl IntoIterator<Item = &'a AppointmentRef>) {
        self.appointments = appointments.into_iter().cloned().collect();
        self.populate();
    }

    /// Recompute after appointments were mutated in place.
    pub fn refresh(&mut self) {
        self.populate();
    }

    /// Apply an upstream change record. Only structural records trigger a
    /// recompute; returns whether one happened.
    pub fn apply_change(&mut self, record: &ChangeRecord) -> bool {
        if !record.is_structural() {
            trace!("Month placement ignoring non-structural change");
            return false;
        }
        for removed in record.removed_items() {
            self.appointments
                .retain(|a| a.primary_key != removed.primary_key);
        }
        for added in record.added_items() {
            self.appointments
                .retain(|a| a.primary_key != added.primary_key);
            self.appointments.push(AppointmentRef::clone(added));
        }
        self.populate();
        true
    }

    pub fn appointments(&self) -> &[AppointmentRef] {
        &self.appointments
    }

    /// The cell at zero-based `day_index`.
    pub fn cell(&self, day_index: usize) -> Option<&MonthCell> {
        self.cells.get(day_index)
    }

    /// All cells, including hidden trailing ones.
    pub fn cells(&self) -> &[MonthCell] {
        &self.cells
    }

    /// Visible cells only.
    pub fn visible_cells(&self) -> &[MonthCell] {
        &self.cells[..self.days_in_month]
    }

    pub fn grid_position(&self, day_index: usize) -> Option<GridPosition> {
        self.cells.get(day_index).and_then(MonthCell::position)
    }

    /// Number of week rows the month spans.
    pub fn row_count(&self) -> u32 {
        let offset = self.first_column() as usize;
        (offset + self.days_in_month).div_ceil(DAYS_PER_WEEK) as u32
    }

    pub fn days_in_month(&self) -> usize {
        self.days_in_month
    }

    /// The first day of the displayed month.
    pub fn target_month(&self) -> NaiveDate {
        self.month_start
    }

    fn first_column(&self) -> u32 {
        self.month_start.weekday().num_days_from_sunday()
    }

    fn month_end_excl(&self) -> NaiveDate {
        self.month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX)
    }

    // ========================================================================
    // Placement
    // ========================================================================

    fn populate(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }

        let month_end = self.month_end_excl();
        self.days_in_month = (month_end - self.month_start).num_days() as usize;
        let offset = self.first_column();
        debug!(
            "Populating {}: {} days, first column {}",
            self.month_start.format("%Y-%m"),
            self.days_in_month,
            offset
        );

        for (i, (cell, date)) in self
            .cells
            .iter_mut()
            .zip(self.month_start.iter_days())
            .take(self.days_in_month)
            .enumerate()
        {
            let slot = offset + i as u32;
            cell.date = Some(date);
            cell.position = Some(GridPosition {
                row: slot / DAYS_PER_WEEK as u32,
                column: slot % DAYS_PER_WEEK as u32,
            });
        }

        let range_start = self.month_start.and_time(NaiveTime::MIN);
        let range_end = month_end.and_time(NaiveTime::MIN);

        let mut relevant: Vec<&AppointmentRef> = self
            .appointments
            .iter()
            .filter(|a| !a.is_degenerate() && a.intersects(range_start, range_end))
            .collect();
        relevant.sort_by(|a, b| compare_by_dates(a, b));

        for appointment in relevant {
            let (first, last) = self.occupied_range(appointment, range_start, range_end);
            trace!(
                "Placing appointment {} in cells {}..{}",
                appointment.primary_key,
                first,
                last
            );
            for index in first..last {
                let Some(date) = self.cells[index].date else {
                    continue;
                };
                let day_start = date.and_time(NaiveTime::MIN);
                let next_day = day_start
                    .checked_add_signed(TimeDelta::days(1))
                    .unwrap_or(NaiveDateTime::MAX);
                self.cells[index].entries.push(CellEntry {
                    appointment: AppointmentRef::clone(appointment),
                    continued_from_previous: appointment.start < day_start,
                    continued_on_next: appointment.end > next_day,
                });
            }
        }
    }

    /// Zero-based `[first, last)` cell indexes an appointment occupies.
    fn occupied_range(
        &self,
        appointment: &AppointmentRef,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> (usize, usize) {
        let first = range_start.max(appointment.start).day0() as usize;
        let last = if appointment.end < range_end {
            let day = appointment.end.day() as usize;
            if appointment.end.time() == NaiveTime::MIN {
                day - 1
            } else {
                day
            }
        } else {
            self.days_in_month
        };
        (first, last.min(self.days_in_month))
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
