//! Value model properties across the public API.

use std::cmp::Ordering;

use almanac::time::{DateTimeSelection, Duration, Selection, TimeSpan, TimeValue};
use almanac::ValidationError;
use chrono::NaiveDate;
use chrono_tz::Tz;

fn sel(y: i32, m: u32, d: u32, h: i32, min: i32) -> DateTimeSelection {
    DateTimeSelection::of(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, min).unwrap()
}

#[test]
fn test_every_valid_time_round_trips() {
    for hour in 0..24 {
        for minute in 0..60 {
            let t = TimeValue::new(hour, minute).unwrap();
            assert_eq!(t.hour(), hour as u32);
            assert_eq!(t.minute(), minute as u32);
        }
    }
}

#[test]
fn test_invalid_inputs_leave_state_unchanged() {
    assert!(TimeValue::new(-1, 0).is_err());
    assert!(TimeValue::new(24, 0).is_err());
    assert!(TimeValue::new(0, 60).is_err());
    assert!(TimeValue::new(0, -1).is_err());

    let mut t = TimeValue::new(9, 30).unwrap();
    assert_eq!(t.set_hour(25), Err(ValidationError::HourOutOfRange(25)));
    assert_eq!(t.set_minute(60), Err(ValidationError::MinuteOutOfRange(60)));
    assert_eq!(t, TimeValue::new(9, 30).unwrap());

    let mut d = Duration::from_minutes(90).unwrap();
    assert_eq!(
        d.set_total_minutes(-1),
        Err(ValidationError::NegativeDuration(-1))
    );
    assert_eq!(d.total_minutes(), 90);
    assert!(Duration::from_minutes(-5).is_err());

    let mut span = TimeSpan::new(sel(2024, 3, 1, 9, 0), d).unwrap();
    let before = span;
    assert!(span.set_end(sel(2024, 2, 29, 9, 0)).is_err());
    assert_eq!(span, before);
}

#[test]
fn test_zero_duration_is_identity() {
    let s = sel(2024, 12, 31, 23, 59);
    assert_eq!(
        s.plus(Duration::ZERO).unwrap().plus(Duration::ZERO).unwrap(),
        s
    );
}

#[test]
fn test_same_instant_in_other_zone_compares_equal() {
    let zones = [
        Tz::Europe__London,
        Tz::Europe__Berlin,
        Tz::Asia__Kolkata,
        Tz::Australia__Sydney,
        Tz::America__Los_Angeles,
    ];
    let ny = sel(2024, 3, 10, 10, 0).at_zone(Tz::America__New_York);
    for zone in zones {
        let other = ny.with_zone_same_instant(zone);
        assert_eq!(ny.compare_in(&other.into(), Tz::UTC), Ordering::Equal, "{zone}");
        assert_eq!(other.compare_in(&ny.into(), Tz::UTC), Ordering::Equal, "{zone}");
    }
}

#[test]
fn test_spans_compare_by_instant_not_fields() {
    // 09:00 in New York is later than 10:00 in London.
    let ny = TimeSpan::zoned(sel(2024, 3, 5, 9, 0), Duration::from_minutes(30).unwrap(), Tz::America__New_York)
        .unwrap();
    let london = TimeSpan::zoned(sel(2024, 3, 5, 10, 0), Duration::from_minutes(30).unwrap(), Tz::Europe__London)
        .unwrap();
    assert_eq!(ny.compare_in(&london, Tz::UTC), Ordering::Greater);
    assert_eq!(london.compare_in(&ny, Tz::UTC), Ordering::Less);
    assert!(!ny.overlaps_in(&london, Tz::UTC));
}

#[test]
fn test_naive_and_zoned_mix_uses_default_zone() {
    let naive = Selection::from(sel(2024, 7, 1, 12, 0));
    let tokyo = Selection::from(sel(2024, 7, 1, 21, 0).at_zone(Tz::Asia__Tokyo));
    assert_eq!(naive.compare_in(&tokyo, Tz::UTC), Ordering::Equal);
    assert_eq!(tokyo.compare_in(&naive, Tz::UTC), Ordering::Equal);
    assert_eq!(naive.compare_in(&tokyo, Tz::Europe__Paris), Ordering::Less);
}

#[test]
fn test_span_end_invariant_after_mutations() {
    let mut span = TimeSpan::new(sel(2024, 1, 31, 22, 0), Duration::new(0, 3, 0).unwrap()).unwrap();
    let steps: Vec<Box<dyn Fn(&mut TimeSpan)>> = vec![
        Box::new(|s| {
            s.set_start(sel(2024, 2, 28, 23, 15)).unwrap();
        }),
        Box::new(|s| {
            s.set_duration(Duration::new(1, 2, 30).unwrap()).unwrap();
        }),
        Box::new(|s| {
            s.set_duration(Duration::ZERO).unwrap();
        }),
        Box::new(|s| {
            s.set_start(sel(2023, 12, 31, 23, 59)).unwrap();
        }),
    ];
    for step in steps {
        step(&mut span);
        assert_eq!(span.end(), span.start().plus(span.duration()).unwrap());
    }
}
