//! Infection transition
//!
//! Every uninfected individual independently becomes infected with
//! probability `p_infection`. The firing reports how many were infected
//! and how many are infected afterwards.

use chrono::NaiveDate;

use super::{RecurringTransition, StatsDelta, TickRecord, TransitionKind};
use crate::models::{DiseaseParameters, PersonId, Population};
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;

/// Stochastically infects uninfected individuals
#[derive(Debug, Clone, Copy, Default)]
pub struct InfectionTransition;

impl RecurringTransition for InfectionTransition {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Infection
    }

    fn fire(
        &self,
        current_date: NaiveDate,
        population: &mut Population,
        rng: &mut RngManager,
        params: &DiseaseParameters,
    ) -> Result<StatsDelta, SimulationError> {
        let eligible_mask = population.mask_where(|record| !record.is_infected);
        let eligible = population.ids_where(&eligible_mask)?;

        let draws = rng.bernoulli_mask(eligible.len(), params.p_infection());
        let selected: Vec<PersonId> = eligible
            .iter()
            .zip(draws)
            .filter_map(|(&id, hit)| hit.then_some(id))
            .collect();

        population.apply_infection(&selected, current_date);

        Ok(StatsDelta {
            kind: TransitionKind::Infection,
            eligible: eligible.len(),
            selected: selected.len(),
            record: Some(TickRecord {
                incidence: selected.len(),
                prevalence: population.count_infected(),
            }),
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
    fn test_already_infected_are_not_redrawn() {
        let mut population = Population::new(3);
        population.apply_infection(&[PersonId(0)], date(2010, 1, 1));
        let mut rng = RngManager::new(5);
        let params = DiseaseParameters::new(1.0, 0.0).unwrap();

        let delta = InfectionTransition
            .fire(date(2010, 2, 1), &mut population, &mut rng, &params)
            .unwrap();

        assert_eq!(delta.eligible, 2);
        assert_eq!(delta.selected, 2);
        assert_eq!(population.date_infected(PersonId(0)), Some(date(2010, 1, 1)));
        assert_eq!(
            delta.record,
            Some(TickRecord {
                incidence: 2,
                prevalence: 3
            })
        );
    }

    #[test]
    fn test_empty_population_records_zero() {
        let mut population = Population::new(0);
        let mut rng = RngManager::new(5);
        let params = DiseaseParameters::default();

        let delta = InfectionTransition
            .fire(date(2010, 2, 1), &mut population, &mut rng, &params)
            .unwrap();

        assert_eq!(
            delta.record,
            Some(TickRecord {
                incidence: 0,
                prevalence: 0
            })
        );
        assert_eq!(rng.get_state(), RngManager::new(5).get_state());
    }
}
