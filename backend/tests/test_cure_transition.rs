//! Tests for the cure transition
//!
//! The cure transition never writes incidence or prevalence; that is
//! deliberate and asserted here.

use chrono::NaiveDate;
use disease_simulator_core_rs::{
    CureTransition, DiseaseParameters, InfectionTransition, PersonId, Population,
    RecurringTransition, RngManager, TransitionKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn infected_population(size: usize, on: NaiveDate) -> Population {
    let mut population = Population::new(size);
    let everyone: Vec<_> = population.ids().collect();
    population.apply_infection(&everyone, on);
    population
}

#[test]
fn test_literal_scenario_infect_then_cure() {
    let mut population = Population::new(4);
    let mut rng = RngManager::new(0);
    let mut params = DiseaseParameters::default();
    params.set("p_infection", 1.0).unwrap();

    let infection = InfectionTransition
        .fire(date(2010, 2, 1), &mut population, &mut rng, &params)
        .unwrap();
    assert_eq!(infection.selected, 4);

    params.set("p_cure", 1.0).unwrap();

    // Exactly one month later: not yet eligible
    let too_early = CureTransition
        .fire(date(2010, 3, 1), &mut population, &mut rng, &params)
        .unwrap();
    assert_eq!(too_early.eligible, 0);
    assert_eq!(population.count_infected(), 4);

    let cured = CureTransition
        .fire(date(2010, 3, 2), &mut population, &mut rng, &params)
        .unwrap();
    assert_eq!(cured.kind, TransitionKind::Cure);
    assert_eq!(cured.eligible, 4);
    assert_eq!(cured.selected, 4);
    assert_eq!(cured.record, None);

    for id in population.ids() {
        let record = population.record(id);
        assert!(!record.is_infected);
        assert_eq!(record.date_cured, Some(date(2010, 3, 2)));
        assert_eq!(record.date_infected, Some(date(2010, 2, 1)));
    }
}

#[test]
fn test_only_long_infections_are_eligible() {
    let mut population = Population::new(3);
    population.apply_infection(&[PersonId(0)], date(2010, 1, 15));
    population.apply_infection(&[PersonId(1)], date(2010, 2, 15));

    let mut rng = RngManager::new(2);
    let params = DiseaseParameters::new(0.0, 1.0).unwrap();

    let delta = CureTransition
        .fire(date(2010, 3, 1), &mut population, &mut rng, &params)
        .unwrap();

    assert_eq!(delta.eligible, 1);
    assert!(!population.is_infected(PersonId(0)));
    assert!(population.is_infected(PersonId(1)));
    assert_eq!(population.date_cured(PersonId(2)), None);
}

#[test]
fn test_zero_cure_probability_cures_nobody() {
    let mut population = infected_population(20, date(2010, 1, 1));
    let mut rng = RngManager::new(2);
    let params = DiseaseParameters::new(0.0, 0.0).unwrap();

    let delta = CureTransition
        .fire(date(2011, 1, 1), &mut population, &mut rng, &params)
        .unwrap();

    assert_eq!(delta.eligible, 20);
    assert_eq!(delta.selected, 0);
    assert_eq!(population.count_infected(), 20);
}

#[test]
fn test_empty_eligible_set_is_noop() {
    let mut population = Population::new(5);
    let mut rng = RngManager::new(2);
    let before = rng.clone();
    let params = DiseaseParameters::new(0.0, 1.0).unwrap();

    let delta = CureTransition
        .fire(date(2010, 6, 1), &mut population, &mut rng, &params)
        .unwrap();

    assert_eq!(delta.eligible, 0);
    assert_eq!(delta.selected, 0);
    assert_eq!(rng, before);
    assert_eq!(population, Population::new(5));
}

#[test]
fn test_end_of_month_window_uses_clamped_dates() {
    // 31 March minus one month clamps to 28 February
    let mut population = infected_population(1, date(2010, 2, 27));
    let mut rng = RngManager::new(2);
    let params = DiseaseParameters::new(0.0, 1.0).unwrap();

    let delta = CureTransition
        .fire(date(2010, 3, 31), &mut population, &mut rng, &params)
        .unwrap();
    assert_eq!(delta.selected, 1);

    let mut population = infected_population(1, date(2010, 2, 28));
    let delta = CureTransition
        .fire(date(2010, 3, 31), &mut population, &mut rng, &params)
        .unwrap();
    assert_eq!(delta.selected, 0);
}
