//! Appointment placement, day bucketing and incremental synchronisation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 AppointmentCollection                        │
//! │  insert / update / delete / replace_all / set_filter         │
//! └──────────────────────────────────────────────────────────────┘
//!                 │ ChangeRecord (added / removed)
//!        ┌────────┴─────────────┬──────────────────────┐
//!        ▼                      ▼                      ▼
//! ┌────────────────┐  ┌───────────────────┐  ┌─────────────────┐
//! │ DayEntryList   │  │ MonthPlacement-   │  │ DayBucketIndex  │
//! │ import_changes │  │ Engine            │  │ (start date)    │
//! │ (days touched) │  │ 31 cells, flags   │  │                 │
//! └────────────────┘  └───────────────────┘  └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use almanac::calendar::{Appointment, AppointmentCollection, DayEntryList, MonthPlacementEngine};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let start = day.and_hms_opt(8, 0, 0).unwrap();
//! let end = day.and_hms_opt(9, 0, 0).unwrap();
//!
//! let mut collection = AppointmentCollection::new();
//! let mut days = DayEntryList::new();
//! let mut month = MonthPlacementEngine::new(day);
//!
//! if let Some(change) = collection.insert(Appointment::new(1, start, end).shared()) {
//!     days.import(&change.clone().into());
//!     month.apply_change(&change);
//! }
//!
//! assert_eq!(days.len(), 1);
//! assert_eq!(month.cell(4).unwrap().len(), 1);
//! ```

pub mod appointment;
pub mod buckets;
pub mod collection;
pub mod filter;
pub mod month;
pub mod sync;
pub mod week;

pub use appointment::{
    appointments_from_records, compare_by_dates, Appointment, AppointmentRecord, AppointmentRef,
    Party,
};
pub use buckets::{BucketEntry, DayBucket, DayBucketIndex};
pub use collection::AppointmentCollection;
pub use filter::{AppointmentFilter, SharedFilter};
pub use month::{CellEntry, GridPosition, MonthCell, MonthPlacementEngine, MAX_CELLS};
pub use sync::{import_changes, ChangeBatch, ChangeRecord, DayEntry, DayEntryList};
pub use week::{week_start, WeekView};
