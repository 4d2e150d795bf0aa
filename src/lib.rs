//! Almanac: time-zone-aware appointment calendar core
//!
//! Three layers:
//!
//! - [`time`]: validated time-of-day, duration, date-time selection and span
//!   values with zone-aware comparison
//! - [`calendar`]: month-grid placement, day bucketing and incremental
//!   synchronisation of appointment lists
//! - [`config`]: TOML configuration for the default zone and logging

pub mod calendar;
pub mod config;
pub mod error;
pub mod time;

pub use calendar::{
    import_changes, Appointment, AppointmentCollection, AppointmentFilter, AppointmentRecord,
    AppointmentRef, ChangeBatch, ChangeRecord, DayBucket, DayBucketIndex, DayEntry, DayEntryList,
    MonthCell, MonthPlacementEngine, SharedFilter, WeekView,
};
pub use config::Config;
pub use error::{AlmanacError, ConfigError, Result, ValidationError};
pub use time::{
    DateTimeSelection, Duration, Selection, TimeSpan, TimeValue, ZonedDateTimeSelection,
};
