//! CLI command handlers.

use std::path::Path;

use almanac::calendar::{
    appointments_from_records, AppointmentCollection, AppointmentFilter, AppointmentRecord,
    AppointmentRef, DayBucketIndex, DayEntryList, MonthPlacementEngine, WeekView,
};
use almanac::time::{parse_zone, DateTimeSelection};
use almanac::Config;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use super::output;
use super::types::{ConversionView, DayBucketView, MonthView, WeekViewOutput};

/// Read appointment records from a JSON array.
pub fn load_appointments(path: &Path) -> Result<Vec<AppointmentRef>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<AppointmentRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let appointments = appointments_from_records(records)?;
    info!("Loaded {} appointments from {}", appointments.len(), path.display());
    Ok(appointments)
}

/// Load appointments into a collection restricted by `filter`.
fn load_filtered(path: &Path, filter: AppointmentFilter) -> Result<AppointmentCollection> {
    let mut collection = AppointmentCollection::with_filter(filter);
    collection.replace_all(load_appointments(path)?);
    debug!("{} appointments match the view filter", collection.len());
    Ok(collection)
}

/// Parse `YYYY-MM` or `YYYY-MM-DD`.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d"))
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", value))
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Run the month command.
pub fn run_month(file: &Path, month: &str, json: bool) -> Result<()> {
    let target = parse_month(month)?;
    let collection = load_filtered(file, AppointmentFilter::for_month(target))?;
    let mut engine = MonthPlacementEngine::new(target);
    engine.set_appointments(collection.items());
    output::print_month(&MonthView::from(&engine), json)
}

/// Run the days command.
///
/// By default each appointment is listed under every day it touches; with
/// `by_start` it is listed once under its start date.
pub fn run_days(file: &Path, by_start: bool, json: bool) -> Result<()> {
    let appointments = load_appointments(file)?;
    let buckets = if by_start {
        DayBucketIndex::create_buckets(&appointments)
    } else {
        DayEntryList::from_appointments(&appointments).buckets()
    };
    let views: Vec<DayBucketView> = buckets.iter().map(DayBucketView::from).collect();
    output::print_buckets(&views, json)
}

/// Run the week command.
pub fn run_week(file: &Path, date: &str, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let collection = load_filtered(file, AppointmentFilter::for_week(date))?;
    let view = WeekView::build(date, collection.items());
    output::print_week(&WeekViewOutput::from(&view), json)
}

/// Run the zone conversion command.
pub fn run_convert(
    config: &Config,
    datetime: &str,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let local = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M"))
        .with_context(|| format!("Invalid date-time '{}', expected YYYY-MM-DDTHH:MM", datetime))?;

    let from_zone = match from {
        Some(name) => parse_zone(name)?,
        None => almanac::time::default_zone(),
    };
    let to_zone = match to {
        Some(name) => parse_zone(name)?,
        None => config
            .calendar
            .display_zone()?
            .context("No target zone given and calendar.display_zone is not set")?,
    };

    let zoned = DateTimeSelection::from_naive(local).at_zone(from_zone);
    let view = ConversionView {
        input: zoned.selection().to_string(),
        from_zone: from_zone.name().to_string(),
        to_zone: to_zone.name().to_string(),
        same_instant: zoned.with_zone_same_instant(to_zone).to_string(),
        same_local: zoned.with_zone_same_local(to_zone).to_string(),
    };
    output::print_conversion(&view, json)
}
