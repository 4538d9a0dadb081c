//! Cure transition
//!
//! Infected individuals become eligible for cure once strictly more than
//! one calendar month has passed since their latest infection. Each
//! eligible individual is then cured with probability `p_cure`.
//!
//! This transition does not write to the incidence or prevalence series.

use chrono::NaiveDate;

use super::{RecurringTransition, StatsDelta, TransitionKind};
use crate::core::time::sub_months;
use crate::models::{DiseaseParameters, PersonId, Population};
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;

/// Months an infection must exceed before it can be cured
pub const MIN_INFECTION_MONTHS: u32 = 1;

/// Stochastically cures individuals infected for over a month
#[derive(Debug, Clone, Copy, Default)]
pub struct CureTransition;

impl CureTransition {
    /// Whether an individual with this state is cure-eligible at `current_date`
    ///
    /// An absent infection date is never eligible.
    pub fn is_eligible(
        is_infected: bool,
        date_infected: Option<NaiveDate>,
        current_date: NaiveDate,
    ) -> Result<bool, SimulationError> {
        let cutoff = sub_months(current_date, MIN_INFECTION_MONTHS)?;
        Ok(Self::infected_before(is_infected, date_infected, cutoff))
    }

    /// Infected with a recorded infection date strictly before `cutoff`
    fn infected_before(
        is_infected: bool,
        date_infected: Option<NaiveDate>,
        cutoff: NaiveDate,
    ) -> bool {
        is_infected && date_infected.is_some_and(|infected_on| cutoff > infected_on)
    }
}

impl RecurringTransition for CureTransition {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Cure
    }

    fn fire(
        &self,
        current_date: NaiveDate,
        population: &mut Population,
        rng: &mut RngManager,
        params: &DiseaseParameters,
    ) -> Result<StatsDelta, SimulationError> {
        let cutoff = sub_months(current_date, MIN_INFECTION_MONTHS)?;
        let eligible_mask = population.mask_where(|record| {
            Self::infected_before(record.is_infected, record.date_infected, cutoff)
        });
        let eligible = population.ids_where(&eligible_mask)?;

        let draws = rng.bernoulli_mask(eligible.len(), params.p_cure());
        let selected: Vec<PersonId> = eligible
            .iter()
            .zip(draws)
            .filter_map(|(&id, hit)| hit.then_some(id))
            .collect();

        population.apply_cure(&selected, current_date);

        Ok(StatsDelta {
            kind: TransitionKind::Cure,
            eligible: eligible.len(),
            selected: selected.len(),
            record: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_eligibility_window_is_strict() {
        let infected_on = Some(date(2010, 2, 1));

        assert!(!CureTransition::is_eligible(true, infected_on, date(2010, 3, 1)).unwrap());
        assert!(CureTransition::is_eligible(true, infected_on, date(2010, 3, 2)).unwrap());
    }

    #[test]
    fn test_missing_date_never_eligible() {
        assert!(!CureTransition::is_eligible(true, None, date(2012, 1, 1)).unwrap());
        assert!(
            !CureTransition::is_eligible(false, Some(date(2010, 1, 1)), date(2012, 1, 1)).unwrap()
        );
    }

    #[test]
    fn test_fire_uses_strict_window() {
        let mut population = Population::new(2);
        population.apply_infection(&[PersonId(0)], date(2010, 2, 1));
        population.apply_infection(&[PersonId(1)], date(2010, 1, 31));
        let mut rng = RngManager::new(9);
        let params = DiseaseParameters::new(0.0, 1.0).unwrap();

        let delta = CureTransition
            .fire(date(2010, 3, 1), &mut population, &mut rng, &params)
            .unwrap();

        assert_eq!(delta.eligible, 1);
        assert!(population.is_infected(PersonId(0)));
        assert!(!population.is_infected(PersonId(1)));
    }

    #[test]
    fn test_cure_produces_no_tick_record() {
        let mut population = Population::new(2);
        population.apply_infection(&[PersonId(0), PersonId(1)], date(2010, 1, 1));
        let mut rng = RngManager::new(3);
        let params = DiseaseParameters::new(0.0, 1.0).unwrap();

        let delta = CureTransition
            .fire(date(2010, 6, 1), &mut population, &mut rng, &params)
            .unwrap();

        assert_eq!(delta.selected, 2);
        assert_eq!(delta.record, None);
        assert_eq!(population.count_infected(), 0);
    }
}
