//! Disease module
//!
//! Owns the parameters, the statistics sink and the transition schedules of
//! one simulation run. Every run gets its own module, so parameter sweeps
//! can run side by side in one process.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    transition_for, DiseaseStatistics, RecurringTransition, StatsDelta, SummaryTable,
    TransitionKind,
};
use crate::core::time::add_months;
use crate::models::parameters::ConfigError;
use crate::models::{DiseaseParameters, Population};
use crate::orchestrator::SimulationError;

/// When a recurring transition first fires and how often it repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSchedule {
    /// Months after `initialise_simulation` before the first firing
    pub first_offset_months: u32,
    /// Months between firings
    pub repeat_months: u32,
}

impl TransitionSchedule {
    pub const INFECTION_DEFAULT: TransitionSchedule = TransitionSchedule {
        first_offset_months: 1,
        repeat_months: 1,
    };

    pub const CURE_DEFAULT: TransitionSchedule = TransitionSchedule {
        first_offset_months: 2,
        repeat_months: 1,
    };

    pub fn validate(&self, kind: TransitionKind) -> Result<(), ConfigError> {
        if self.repeat_months == 0 {
            return Err(ConfigError::ZeroRepeatInterval(kind.to_string()));
        }
        Ok(())
    }
}

/// A transition ready to be handed to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringSchedule {
    pub kind: TransitionKind,
    pub first_date: NaiveDate,
    pub period_months: u32,
}

/// Disease State Model for one run
///
/// # Example
///
/// ```rust
/// use disease_simulator_core_rs::{DiseaseModule, Population};
///
/// let mut module = DiseaseModule::new();
/// module.load_parameters();
/// module.set_parameter("p_infection", 0.5).unwrap();
///
/// let mut population = Population::new(10);
/// module.initialize(&mut population);
/// assert_eq!(population.count_infected(), 0);
/// assert!(module.summarize(&population).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DiseaseModule {
    parameters: DiseaseParameters,
    statistics: DiseaseStatistics,
    infection_schedule: TransitionSchedule,
    cure_schedule: TransitionSchedule,
}

impl Default for DiseaseModule {
    fn default() -> Self {
        Self::new()
    }
}

impl DiseaseModule {
    /// Module with default schedules and default parameters
    pub fn new() -> Self {
        Self {
            parameters: DiseaseParameters::default(),
            statistics: DiseaseStatistics::new(),
            infection_schedule: TransitionSchedule::INFECTION_DEFAULT,
            cure_schedule: TransitionSchedule::CURE_DEFAULT,
        }
    }

    /// Module with custom schedules
    ///
    /// # Errors
    /// `ZeroRepeatInterval` if either schedule never repeats.
    pub fn with_schedules(
        infection_schedule: TransitionSchedule,
        cure_schedule: TransitionSchedule,
    ) -> Result<Self, ConfigError> {
        infection_schedule.validate(TransitionKind::Infection)?;
        cure_schedule.validate(TransitionKind::Cure)?;
        Ok(Self {
            infection_schedule,
            cure_schedule,
            ..Self::new()
        })
    }

    /// Restore a module from checkpointed parts
    pub(crate) fn from_parts(
        parameters: DiseaseParameters,
        statistics: DiseaseStatistics,
        infection_schedule: TransitionSchedule,
        cure_schedule: TransitionSchedule,
    ) -> Self {
        Self {
            parameters,
            statistics,
            infection_schedule,
            cure_schedule,
        }
    }

    /// Assign the fixed default parameter values
    pub fn load_parameters(&mut self) {
        self.parameters = DiseaseParameters::default();
    }

    /// Override one parameter; transitions see the new value at their next firing
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        self.parameters.set(name, value)?;
        debug!(name, value, "parameter overridden");
        Ok(())
    }

    pub fn parameters(&self) -> &DiseaseParameters {
        &self.parameters
    }

    pub fn statistics(&self) -> &DiseaseStatistics {
        &self.statistics
    }

    pub fn infection_schedule(&self) -> TransitionSchedule {
        self.infection_schedule
    }

    pub fn cure_schedule(&self) -> TransitionSchedule {
        self.cure_schedule
    }

    /// Put every individual in the uninfected state with no dates
    ///
    /// Calling this again before the run starts yields the same state.
    pub fn initialize(&self, population: &mut Population) {
        population.reset_disease_columns();
    }

    /// First firing date and period of both transitions, relative to `date`
    pub fn initialise_simulation(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<RecurringSchedule>, SimulationError> {
        [
            (TransitionKind::Infection, self.infection_schedule),
            (TransitionKind::Cure, self.cure_schedule),
        ]
        .into_iter()
        .map(|(kind, schedule)| -> Result<RecurringSchedule, SimulationError> {
            Ok(RecurringSchedule {
                kind,
                first_date: add_months(date, schedule.first_offset_months)?,
                period_months: schedule.repeat_months,
            })
        })
        .collect()
    }

    /// Transitions to register with the scheduler, in schedule order
    pub fn transitions(&self) -> Vec<Box<dyn RecurringTransition>> {
        vec![
            transition_for(TransitionKind::Infection),
            transition_for(TransitionKind::Cure),
        ]
    }

    /// Fold the outcome of a firing into the statistics sink
    pub fn record(&mut self, date: NaiveDate, delta: &StatsDelta) {
        if let Some(record) = delta.record {
            self.statistics.record(date, record);
        }
    }

    /// Incidence and prevalence table stamped with the current population size
    pub fn summarize(&self, population: &Population) -> SummaryTable {
        self.statistics.summarize(population.len())
    }

    /// End-of-run hook: build and log the summary
    pub fn on_simulation_end(&self, population: &Population) -> SummaryTable {
        let summary = self.summarize(population);
        info!(
            ticks = summary.len(),
            total_incidence = self.statistics.total_incidence(),
            population = population.len(),
            "disease incidence and prevalence\n{}",
            summary
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_schedule_offsets() {
        let module = DiseaseModule::new();
        let schedules = module.initialise_simulation(date(2010, 1, 1)).unwrap();

        assert_eq!(
            schedules,
            vec![
                RecurringSchedule {
                    kind: TransitionKind::Infection,
                    first_date: date(2010, 2, 1),
                    period_months: 1,
                },
                RecurringSchedule {
                    kind: TransitionKind::Cure,
                    first_date: date(2010, 3, 1),
                    period_months: 1,
                },
            ]
        );
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let never = TransitionSchedule {
            first_offset_months: 1,
            repeat_months: 0,
        };
        let err = DiseaseModule::with_schedules(TransitionSchedule::INFECTION_DEFAULT, never)
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroRepeatInterval("cure".to_string()));
    }

    #[test]
    fn test_transitions_match_schedule_order() {
        let module = DiseaseModule::new();
        let kinds: Vec<_> = module.transitions().iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, vec![TransitionKind::Infection, TransitionKind::Cure]);
    }
}
