//! Day-grouped views kept in step with an upstream collection.

use almanac::calendar::{
    import_changes, Appointment, AppointmentCollection, AppointmentRef, ChangeBatch,
    ChangeRecord, DayBucketIndex, DayEntry, DayEntryList,
};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn appt(key: i64, start: NaiveDateTime, end: NaiveDateTime) -> AppointmentRef {
    Appointment::new(key, start, end).shared()
}

#[test]
fn test_remove_seven_add_nine() {
    let seven = appt(7, at(2024, 3, 5, 9), at(2024, 3, 5, 10));
    let nine = appt(9, at(2024, 3, 5, 13), at(2024, 3, 5, 14));
    let mut target: Vec<DayEntry> = DayEntry::expand(&seven).collect();

    let batch = ChangeBatch::from(ChangeRecord::Structural {
        removed: vec![seven],
        added: vec![nine],
    });
    assert!(import_changes(&batch, &mut target));

    assert!(target.iter().all(|e| e.primary_key() != 7));
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].primary_key(), 9);
    assert_eq!(target[0].date, date(2024, 3, 5));
}

#[test]
fn test_permutation_only_batch_is_noop() {
    let seven = appt(7, at(2024, 3, 5, 9), at(2024, 3, 5, 10));
    let mut target: Vec<DayEntry> = DayEntry::expand(&seven).collect();

    let batch = ChangeBatch::from(ChangeRecord::Permutation);
    assert!(!import_changes(&batch, &mut target));
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].primary_key(), 7);
}

#[test]
fn test_january_buckets() {
    let appointments = vec![
        appt(1, at(2024, 1, 1, 9), at(2024, 1, 1, 10)),
        appt(2, at(2024, 1, 1, 11), at(2024, 1, 1, 12)),
        appt(3, at(2024, 1, 2, 9), at(2024, 1, 2, 10)),
    ];
    let buckets = DayBucketIndex::create_buckets(&appointments);

    let dates: Vec<_> = buckets.iter().map(|b| b.date()).collect();
    assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2)]);

    let first_day: Vec<_> = buckets[0]
        .entries()
        .iter()
        .map(|e| (e.appointment.primary_key, e.is_first_of_day))
        .collect();
    assert_eq!(first_day, vec![(1, true), (2, false)]);
}

#[test]
fn test_collection_feeds_day_list() {
    let mut collection = AppointmentCollection::new();
    let mut days = DayEntryList::new();
    let mut batch = ChangeBatch::new();

    batch.extend(collection.insert(appt(1, at(2024, 3, 4, 22), at(2024, 3, 5, 2))));
    batch.extend(collection.insert(appt(2, at(2024, 3, 5, 9), at(2024, 3, 5, 10))));
    assert!(days.import(&batch));
    assert_eq!(days.len(), 3);

    let on_fifth: Vec<_> = days.on(date(2024, 3, 5)).map(|e| e.primary_key()).collect();
    assert_eq!(on_fifth, vec![1, 2]);

    // A no-op update produces nothing to import.
    assert!(collection
        .update(appt(2, at(2024, 3, 5, 9), at(2024, 3, 5, 10)))
        .is_none());

    let moved = collection
        .update(appt(1, at(2024, 3, 6, 8), at(2024, 3, 6, 9)))
        .unwrap();
    assert!(days.import(&moved.into()));
    let dates: Vec<_> = days
        .entries()
        .iter()
        .map(|e| (e.date, e.primary_key()))
        .collect();
    assert_eq!(dates, vec![(date(2024, 3, 5), 2), (date(2024, 3, 6), 1)]);

    let buckets = days.buckets();
    assert_eq!(buckets.len(), 2);
    assert!(buckets.iter().all(|b| b.entries()[0].is_first_of_day));
}

#[test]
fn test_reload_only_touches_changed_entries() {
    let mut collection = AppointmentCollection::new();
    let initial = vec![
        appt(1, at(2024, 3, 1, 9), at(2024, 3, 1, 10)),
        appt(2, at(2024, 3, 2, 9), at(2024, 3, 2, 10)),
    ];
    let first = collection.replace_all(initial.clone()).unwrap();
    let mut days = DayEntryList::new();
    assert!(days.import(&first.into()));

    let untouched = AppointmentRef::clone(&days.entries()[0].appointment);

    let reloaded = vec![
        AppointmentRef::clone(&initial[0]),
        appt(3, at(2024, 3, 3, 9), at(2024, 3, 3, 10)),
    ];
    let change = collection.replace_all(reloaded).unwrap();
    assert!(days.import(&change.into()));

    let keys: Vec<_> = days.entries().iter().map(|e| e.primary_key()).collect();
    assert_eq!(keys, vec![1, 3]);
    assert!(AppointmentRef::ptr_eq(&untouched, &days.entries()[0].appointment));
}
