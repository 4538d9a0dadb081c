//! Population State Store
//!
//! Columnar table of individuals. Each disease attribute is one column
//! indexed by [`PersonId`]; rows are fixed for the lifetime of a run since
//! births and deaths are handled elsewhere.
//!
//! # Critical Invariants
//!
//! 1. **Column Alignment**: every column has exactly `len()` entries
//! 2. **Infection Dating**: `is_infected` implies `date_infected` is set and
//!    not later than the current simulation date
//! 3. **Single Writer**: only the infection and cure paths touch the
//!    disease columns

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::orchestrator::SimulationError;

/// Row identifier within a [`Population`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub usize);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "person_{}", self.0)
    }
}

/// Read-only view of one individual's disease attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndividualRecord {
    pub is_infected: bool,
    pub date_infected: Option<NaiveDate>,
    pub date_cured: Option<NaiveDate>,
}

/// Columnar store of disease attributes
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use disease_simulator_core_rs::{PersonId, Population};
///
/// let mut population = Population::new(3);
/// let date = NaiveDate::from_ymd_opt(2010, 2, 1).unwrap();
///
/// population.apply_infection(&[PersonId(1)], date);
/// assert_eq!(population.count_infected(), 1);
/// assert_eq!(population.date_infected(PersonId(1)), Some(date));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    is_infected: Vec<bool>,
    date_infected: Vec<Option<NaiveDate>>,
    date_cured: Vec<Option<NaiveDate>>,
}

impl Population {
    /// Create `size` individuals, all uninfected with no dates recorded
    pub fn new(size: usize) -> Self {
        Self {
            is_infected: vec![false; size],
            date_infected: vec![None; size],
            date_cured: vec![None; size],
        }
    }

    /// Rebuild a store from saved columns
    ///
    /// # Errors
    /// `MaskLengthMismatch` if the columns disagree on length.
    pub fn from_columns(
        is_infected: Vec<bool>,
        date_infected: Vec<Option<NaiveDate>>,
        date_cured: Vec<Option<NaiveDate>>,
    ) -> Result<Self, SimulationError> {
        let expected = is_infected.len();
        for actual in [date_infected.len(), date_cured.len()] {
            if actual != expected {
                return Err(SimulationError::MaskLengthMismatch { expected, actual });
            }
        }
        Ok(Self {
            is_infected,
            date_infected,
            date_cured,
        })
    }

    pub fn len(&self) -> usize {
        self.is_infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_infected.is_empty()
    }

    /// All row identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = PersonId> {
        (0..self.len()).map(PersonId)
    }

    /// Snapshot of one row
    ///
    /// # Panics
    /// Panics if `id` is outside the population.
    pub fn record(&self, id: PersonId) -> IndividualRecord {
        IndividualRecord {
            is_infected: self.is_infected[id.0],
            date_infected: self.date_infected[id.0],
            date_cured: self.date_cured[id.0],
        }
    }

    pub fn is_infected(&self, id: PersonId) -> bool {
        self.is_infected[id.0]
    }

    pub fn date_infected(&self, id: PersonId) -> Option<NaiveDate> {
        self.date_infected[id.0]
    }

    pub fn date_cured(&self, id: PersonId) -> Option<NaiveDate> {
        self.date_cured[id.0]
    }

    pub fn is_infected_column(&self) -> &[bool] {
        &self.is_infected
    }

    pub fn date_infected_column(&self) -> &[Option<NaiveDate>] {
        &self.date_infected
    }

    pub fn date_cured_column(&self) -> &[Option<NaiveDate>] {
        &self.date_cured
    }

    /// Reset every row to the uninfected state with no dates
    pub fn reset_disease_columns(&mut self) {
        self.is_infected.fill(false);
        self.date_infected.fill(None);
        self.date_cured.fill(None);
    }

    /// Boolean mask of rows satisfying `predicate`
    pub fn mask_where<F>(&self, mut predicate: F) -> Vec<bool>
    where
        F: FnMut(IndividualRecord) -> bool,
    {
        self.ids().map(|id| predicate(self.record(id))).collect()
    }

    /// Identifiers of rows selected by `mask`, in ascending order
    ///
    /// # Errors
    /// `MaskLengthMismatch` if `mask` does not cover the whole population.
    pub fn ids_where(&self, mask: &[bool]) -> Result<Vec<PersonId>, SimulationError> {
        if mask.len() != self.len() {
            return Err(SimulationError::MaskLengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        Ok(mask
            .iter()
            .enumerate()
            .filter_map(|(idx, &selected)| selected.then_some(PersonId(idx)))
            .collect())
    }

    pub fn count_infected(&self) -> usize {
        self.is_infected.iter().filter(|&&infected| infected).count()
    }

    /// Mark `ids` infected on `date`, overwriting any earlier infection date
    pub fn apply_infection(&mut self, ids: &[PersonId], date: NaiveDate) {
        for id in ids {
            self.is_infected[id.0] = true;
            self.date_infected[id.0] = Some(date);
        }
    }

    /// Mark `ids` cured on `date`; the infection date is kept as history
    pub fn apply_cure(&mut self, ids: &[PersonId], date: NaiveDate) {
        for id in ids {
            self.is_infected[id.0] = false;
            self.date_cured[id.0] = Some(date);
        }
    }

    /// Verify the infection-dating invariant against `current_date`
    ///
    /// # Errors
    /// `InvariantViolation` naming the first offending row.
    pub fn check_invariants(&self, current_date: NaiveDate) -> Result<(), SimulationError> {
        for id in self.ids() {
            let record = self.record(id);
            if !record.is_infected {
                continue;
            }
            match record.date_infected {
                None => {
                    return Err(SimulationError::InvariantViolation(format!(
                        "{} is infected without an infection date",
                        id
                    )))
                }
                Some(date) if date > current_date => {
                    return Err(SimulationError::InvariantViolation(format!(
                        "{} infected on {} which is after current date {}",
                        id, date, current_date
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ids_where_rejects_short_mask() {
        let population = Population::new(3);
        let err = population.ids_where(&[true, false]).unwrap_err();
        assert_eq!(
            err,
            SimulationError::MaskLengthMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_cure_keeps_infection_date() {
        let mut population = Population::new(1);
        population.apply_infection(&[PersonId(0)], date(2010, 2, 1));
        population.apply_cure(&[PersonId(0)], date(2010, 4, 1));

        let record = population.record(PersonId(0));
        assert!(!record.is_infected);
        assert_eq!(record.date_infected, Some(date(2010, 2, 1)));
        assert_eq!(record.date_cured, Some(date(2010, 4, 1)));
    }

    #[test]
    fn test_invariant_check_flags_future_infection() {
        let mut population = Population::new(2);
        population.apply_infection(&[PersonId(1)], date(2010, 5, 1));

        assert!(population.check_invariants(date(2010, 5, 1)).is_ok());
        assert!(matches!(
            population.check_invariants(date(2010, 4, 30)),
            Err(SimulationError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_from_columns_rejects_ragged_columns() {
        let result = Population::from_columns(vec![false; 2], vec![None; 2], vec![None; 1]);
        assert!(matches!(
            result,
            Err(SimulationError::MaskLengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
