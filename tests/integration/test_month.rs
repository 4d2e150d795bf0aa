//! Month placement driven through the collection API.

use almanac::calendar::{
    Appointment, AppointmentCollection, AppointmentFilter, AppointmentRef, GridPosition,
    MonthPlacementEngine,
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

fn occupied(engine: &MonthPlacementEngine, key: i64) -> Vec<usize> {
    engine
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.appointments().any(|a| a.primary_key == key))
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_march_2024_scenario() {
    let a = Appointment::new(1, at(2024, 3, 5, 8), at(2024, 3, 5, 9)).shared();
    let b = Appointment::new(2, at(2024, 2, 28, 23), at(2024, 3, 2, 1)).shared();

    let mut engine = MonthPlacementEngine::new(date(2024, 3, 1));
    engine.set_appointments([&a, &b]);

    assert_eq!(occupied(&engine, 1), vec![4]);
    let cell = engine.cell(4).unwrap();
    assert!(!cell.continued_from_previous());
    assert!(!cell.continued_on_next());

    assert_eq!(occupied(&engine, 2), vec![0, 1]);
    assert!(engine.cell(0).unwrap().continued_from_previous());
    assert_eq!(engine.cell(0).unwrap().date(), Some(date(2024, 3, 1)));
    assert_eq!(
        engine.grid_position(0),
        Some(GridPosition { row: 0, column: 5 })
    );
}

#[test]
fn test_collection_changes_drive_placement() {
    let march = date(2024, 3, 1);
    let mut collection = AppointmentCollection::with_filter(AppointmentFilter::for_month(march));
    let mut engine = MonthPlacementEngine::new(march);

    let long: AppointmentRef = Appointment::new(1, at(2024, 3, 29, 18), at(2024, 4, 2, 9)).shared();
    let change = collection.insert(long).unwrap();
    assert!(engine.apply_change(&change));
    assert_eq!(occupied(&engine, 1), vec![28, 29, 30]);
    assert!(engine.cell(30).unwrap().continued_on_next());

    let shortened = Appointment::new(1, at(2024, 3, 29, 18), at(2024, 3, 30, 0)).shared();
    let change = collection.update(shortened).unwrap();
    assert!(engine.apply_change(&change));
    assert_eq!(occupied(&engine, 1), vec![28]);
    assert!(!engine.cell(28).unwrap().continued_on_next());

    let change = collection.delete(1).unwrap();
    assert!(engine.apply_change(&change));
    assert!(engine.cells().iter().all(|c| c.is_empty()));
}

#[test]
fn test_switching_months_reuses_collection() {
    let spanning = Appointment::new(9, at(2024, 1, 30, 12), at(2024, 2, 2, 12)).shared();
    let mut engine = MonthPlacementEngine::new(date(2024, 1, 15));
    engine.set_appointments([&spanning]);
    assert_eq!(occupied(&engine, 9), vec![29, 30]);

    assert!(engine.set_target_month(date(2024, 2, 20)));
    assert_eq!(engine.days_in_month(), 29);
    assert_eq!(occupied(&engine, 9), vec![0, 1]);
    let first = &engine.cell(0).unwrap().entries()[0];
    assert!(first.continued_from_previous);
    assert!(first.continued_on_next);
    assert!(!engine.cell(1).unwrap().continued_on_next());
}
