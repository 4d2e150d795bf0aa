//! Serializable views of calendar structures for `--json` output.

use almanac::calendar::{
    Appointment, CellEntry, DayBucket, GridPosition, MonthPlacementEngine, WeekView,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Brief appointment description.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentSummary {
    pub primary_key: i64,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl From<&Appointment> for AppointmentSummary {
    fn from(a: &Appointment) -> Self {
        Self {
            primary_key: a.primary_key,
            title: a.title.clone(),
            start: a.start,
            end: a.end,
            customer: a.customer.as_ref().map(|c| c.name.clone()),
            user: a.user.as_ref().map(|u| u.name.clone()),
        }
    }
}

/// A placed appointment with its continuation markers.
#[derive(Debug, Clone, Serialize)]
pub struct CellEntryView {
    #[serde(flatten)]
    pub appointment: AppointmentSummary,
    pub continued_from_previous: bool,
    pub continued_on_next: bool,
}

impl From<&CellEntry> for CellEntryView {
    fn from(e: &CellEntry) -> Self {
        Self {
            appointment: e.appointment.as_ref().into(),
            continued_from_previous: e.continued_from_previous,
            continued_on_next: e.continued_on_next,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCellView {
    pub date: NaiveDate,
    pub position: Option<GridPosition>,
    pub entries: Vec<CellEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: String,
    pub days_in_month: usize,
    pub rows: u32,
    pub cells: Vec<MonthCellView>,
}

impl From<&MonthPlacementEngine> for MonthView {
    fn from(engine: &MonthPlacementEngine) -> Self {
        Self {
            month: engine.target_month().format("%Y-%m").to_string(),
            days_in_month: engine.days_in_month(),
            rows: engine.row_count(),
            cells: engine
                .visible_cells()
                .iter()
                .filter_map(|cell| {
                    Some(MonthCellView {
                        date: cell.date()?,
                        position: cell.position(),
                        entries: cell.entries().iter().map(CellEntryView::from).collect(),
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketEntryView {
    #[serde(flatten)]
    pub appointment: AppointmentSummary,
    pub is_first_of_day: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBucketView {
    pub date: NaiveDate,
    pub entries: Vec<BucketEntryView>,
}

impl From<&DayBucket> for DayBucketView {
    fn from(bucket: &DayBucket) -> Self {
        Self {
            date: bucket.date(),
            entries: bucket
                .entries()
                .iter()
                .map(|e| BucketEntryView {
                    appointment: e.appointment.as_ref().into(),
                    is_first_of_day: e.is_first_of_day,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekDayView {
    pub date: NaiveDate,
    pub appointments: Vec<AppointmentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekViewOutput {
    pub week_start: NaiveDate,
    pub days: Vec<WeekDayView>,
}

impl From<&WeekView> for WeekViewOutput {
    fn from(view: &WeekView) -> Self {
        Self {
            week_start: view.start(),
            days: view
                .dates()
                .enumerate()
                .map(|(i, date)| WeekDayView {
                    date,
                    appointments: view
                        .day(i)
                        .unwrap_or_default()
                        .iter()
                        .map(|a| a.as_ref().into())
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Result of a zone conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionView {
    pub input: String,
    pub from_zone: String,
    pub to_zone: String,
    pub same_instant: String,
    pub same_local: String,
}
