//! Time management for the simulation
//!
//! The simulation advances over calendar dates. Recurring transitions are
//! spaced in whole months, so this module also owns the month arithmetic
//! shared by the scheduler and the cure eligibility window.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::orchestrator::SimulationError;

/// Add `months` calendar months to `date`.
///
/// Days past the end of the target month are clamped to its last day, so
/// 31 January plus one month is the last day of February.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use disease_simulator_core_rs::core::time::add_months;
///
/// let jan_31 = NaiveDate::from_ymd_opt(2010, 1, 31).unwrap();
/// let feb_28 = NaiveDate::from_ymd_opt(2010, 2, 28).unwrap();
/// assert_eq!(add_months(jan_31, 1).unwrap(), feb_28);
/// ```
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, SimulationError> {
    date.checked_add_months(Months::new(months))
        .ok_or(SimulationError::DateOutOfRange { date, months })
}

/// Subtract `months` calendar months from `date`, clamping like [`add_months`].
pub fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate, SimulationError> {
    date.checked_sub_months(Months::new(months))
        .ok_or(SimulationError::DateOutOfRange { date, months })
}

/// Simulation clock
///
/// Tracks the start date of the run and the date of the firing currently
/// being processed. Time never moves backwards.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use disease_simulator_core_rs::SimulationClock;
///
/// let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
/// let mut clock = SimulationClock::new(start);
/// assert_eq!(clock.current_date(), start);
///
/// let next = NaiveDate::from_ymd_opt(2010, 2, 1).unwrap();
/// clock.advance_to(next).unwrap();
/// assert_eq!(clock.current_date(), next);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    start_date: NaiveDate,
    current_date: NaiveDate,
}

impl SimulationClock {
    /// Create a clock positioned at `start_date`
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            current_date: start_date,
        }
    }

    /// Restore a clock from a checkpoint
    pub(crate) fn from_parts(start_date: NaiveDate, current_date: NaiveDate) -> Self {
        Self {
            start_date,
            current_date,
        }
    }

    /// Move the clock forward to `date`
    ///
    /// Advancing to the current date is a no-op; several transitions may
    /// fire on the same day.
    ///
    /// # Errors
    /// `TimeWentBackwards` if `date` is earlier than the current date.
    pub fn advance_to(&mut self, date: NaiveDate) -> Result<(), SimulationError> {
        if date < self.current_date {
            return Err(SimulationError::TimeWentBackwards {
                current: self.current_date,
                requested: date,
            });
        }
        self.current_date = date;
        Ok(())
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Whole days elapsed since the start of the run
    pub fn days_elapsed(&self) -> i64 {
        (self.current_date - self.start_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_advance_backwards_rejected() {
        let mut clock = SimulationClock::new(date(2010, 3, 1));
        let err = clock.advance_to(date(2010, 2, 1)).unwrap_err();
        assert!(matches!(err, SimulationError::TimeWentBackwards { .. }));
        assert_eq!(clock.current_date(), date(2010, 3, 1));
    }

    #[test]
    fn test_sub_months_clamps_to_month_end() {
        assert_eq!(sub_months(date(2010, 3, 31), 1).unwrap(), date(2010, 2, 28));
    }

    #[test]
    fn test_add_months_out_of_range() {
        let err = add_months(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, SimulationError::DateOutOfRange { months: 1, .. }));
    }
}
