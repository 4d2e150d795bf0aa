//! Time-zone lookup and instant-preserving conversion helpers.

use std::sync::OnceLock;

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::ValidationError;

static DEFAULT_ZONE_OVERRIDE: RwLock<Option<Tz>> = parking_lot::const_rwlock(None);
static ENVIRONMENT_ZONE: OnceLock<Tz> = OnceLock::new();

/// The zone naive selections are anchored in when compared with zoned ones.
///
/// Resolution order: an explicit [`set_default_zone`] override, then the `TZ`
/// environment variable, then UTC.
pub fn default_zone() -> Tz {
    if let Some(zone) = *DEFAULT_ZONE_OVERRIDE.read() {
        return zone;
    }
    *ENVIRONMENT_ZONE.get_or_init(zone_from_environment)
}

/// Override the process default zone.
pub fn set_default_zone(zone: Tz) {
    debug!("Default time zone set to {}", zone.name());
    *DEFAULT_ZONE_OVERRIDE.write() = Some(zone);
}

/// Drop any override so [`default_zone`] falls back to the environment.
pub fn clear_default_zone() {
    *DEFAULT_ZONE_OVERRIDE.write() = None;
}

fn zone_from_environment() -> Tz {
    match std::env::var("TZ") {
        Ok(name) if !name.trim().is_empty() => {
            let name = name.trim().trim_start_matches(':');
            parse_zone(name).unwrap_or_else(|_| {
                warn!("Ignoring unrecognised TZ value {:?}, using UTC", name);
                Tz::UTC
            })
        }
        _ => Tz::UTC,
    }
}

/// Parse an IANA zone name such as `America/New_York`.
pub fn parse_zone(name: &str) -> Result<Tz, ValidationError> {
    name.parse::<Tz>()
        .map_err(|_| ValidationError::UnknownZone(name.to_string()))
}

/// Attach `zone` to a local wall-clock reading.
///
/// Ambiguous readings (clocks turned back) take the earlier offset. Readings
/// inside a gap (clocks turned forward) are shifted later by the length of
/// the gap.
pub fn resolve_local(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let day_before = local.checked_sub_signed(TimeDelta::days(1)).unwrap_or(local);
            let offset = zone
                .offset_from_local_datetime(&day_before)
                .earliest()
                .map(|o| o.fix())
                .unwrap_or_else(|| zone.offset_from_utc_datetime(&local).fix());
            let utc = local
                .checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc() as i64))
                .unwrap_or(local);
            zone.from_utc_datetime(&utc)
        }
    }
}

/// Re-read a local wall-clock value from `from` as the same instant in `to`.
pub fn convert_same_instant(local: NaiveDateTime, from: Tz, to: Tz) -> NaiveDateTime {
    if from == to {
        return local;
    }
    resolve_local(from, local).with_timezone(&to).naive_local()
}
