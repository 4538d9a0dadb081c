//! Tests for the simulation clock and month arithmetic

use chrono::NaiveDate;
use disease_simulator_core_rs::core::time::{add_months, sub_months};
use disease_simulator_core_rs::{SimulationClock, SimulationError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_clock_starts_at_start_date() {
    let clock = SimulationClock::new(date(2010, 1, 1));
    assert_eq!(clock.start_date(), date(2010, 1, 1));
    assert_eq!(clock.current_date(), date(2010, 1, 1));
    assert_eq!(clock.days_elapsed(), 0);
}

#[test]
fn test_advance_to_same_date_is_allowed() {
    let mut clock = SimulationClock::new(date(2010, 1, 1));
    clock.advance_to(date(2010, 3, 1)).unwrap();
    clock.advance_to(date(2010, 3, 1)).unwrap();

    assert_eq!(clock.current_date(), date(2010, 3, 1));
    assert_eq!(clock.days_elapsed(), 59);
}

#[test]
fn test_advance_backwards_is_an_error() {
    let mut clock = SimulationClock::new(date(2010, 1, 1));
    clock.advance_to(date(2010, 6, 1)).unwrap();

    assert_eq!(
        clock.advance_to(date(2010, 5, 31)),
        Err(SimulationError::TimeWentBackwards {
            current: date(2010, 6, 1),
            requested: date(2010, 5, 31),
        })
    );
}

#[test]
fn test_month_offsets_follow_calendar() {
    assert_eq!(add_months(date(2010, 1, 1), 1).unwrap(), date(2010, 2, 1));
    assert_eq!(add_months(date(2010, 1, 1), 12).unwrap(), date(2011, 1, 1));
    assert_eq!(add_months(date(2012, 1, 31), 1).unwrap(), date(2012, 2, 29));
    assert_eq!(sub_months(date(2010, 3, 2), 1).unwrap(), date(2010, 2, 2));
}
