//! Simulation Engine
//!
//! Reference host for the disease module. It owns everything the module
//! treats as external: the population store, the clock, the random stream
//! and the scheduler.
//!
//! # Run Loop
//!
//! ```text
//! new(config):
//!   validate config, load parameters, apply overrides, initialize population
//! run():
//!   initialise_simulation -> schedule both transitions
//!   while next firing < end_date:
//!     1. Advance clock to firing date
//!     2. Fire transition (eligibility, Bernoulli draws, state writes)
//!     3. Fold StatsDelta into the statistics sink
//!     4. Log event
//!     5. Reschedule one period later
//!   on_simulation_end -> summary table
//! ```
//!
//! # Example
//!
//! ```rust
//! use disease_simulator_core_rs::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     population_size: 100,
//!     rng_seed: 42,
//!     ..SimulationConfig::default()
//! };
//!
//! let mut sim = Simulation::new(config).unwrap();
//! sim.set_parameter("p_infection", 0.5).unwrap();
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.len(), 11);
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::scheduler::{ScheduledFiring, Scheduler};
use crate::core::time::SimulationClock;
use crate::disease::{
    DiseaseModule, RecurringTransition, StatsDelta, SummaryTable, TransitionKind,
    TransitionSchedule,
};
use crate::models::parameters::ConfigError;
use crate::models::{DiseaseParameters, Event, EventLog, Population};
use crate::rng::RngManager;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete run configuration
///
/// Missing fields fall back to the reference scenario: one year from
/// 2010-01-01, 1000 individuals, seed 0, default parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_date: NaiveDate,

    /// Firings on or after this date do not run
    pub end_date: NaiveDate,

    pub population_size: usize,

    /// Seed for the run's single random stream
    pub rng_seed: u64,

    /// Parameter values applied after the defaults are loaded
    pub parameter_overrides: BTreeMap<String, f64>,

    pub infection_schedule: TransitionSchedule,

    pub cure_schedule: TransitionSchedule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default();
        Self {
            start_date,
            end_date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap_or_default(),
            population_size: 1000,
            rng_seed: 0,
            parameter_overrides: BTreeMap::new(),
            infection_schedule: TransitionSchedule::INFECTION_DEFAULT,
            cure_schedule: TransitionSchedule::CURE_DEFAULT,
        }
    }
}

impl SimulationConfig {
    /// Check everything that can be checked before the first firing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date <= self.start_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }
        self.infection_schedule.validate(TransitionKind::Infection)?;
        self.cure_schedule.validate(TransitionKind::Cure)?;

        let mut params = DiseaseParameters::default();
        for (name, value) in &self.parameter_overrides {
            params.set(name, *value)?;
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced to the host; any of them ends the run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Mask of length {actual} does not match population of {expected}")]
    MaskLengthMismatch { expected: usize, actual: usize },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Date {date} shifted by {months} month(s) is out of range")]
    DateOutOfRange { date: NaiveDate, months: u32 },

    #[error("Cannot move time back from {current} to {requested}")]
    TimeWentBackwards {
        current: NaiveDate,
        requested: NaiveDate,
    },

    #[error("Parameters cannot be changed once the run has started")]
    RunAlreadyStarted,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("State validation error: {0}")]
    StateValidationError(String),
}

// ============================================================================
// Tick Result
// ============================================================================

/// Outcome of one scheduled firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub date: NaiveDate,
    pub delta: StatsDelta,
}

// ============================================================================
// Simulation
// ============================================================================

/// One simulation run
///
/// Each run owns its module, population and random stream, so several runs
/// can live in the same process.
pub struct Simulation {
    run_id: Uuid,
    config: SimulationConfig,
    clock: SimulationClock,
    rng: RngManager,
    population: Population,
    module: DiseaseModule,
    transitions: Vec<Box<dyn RecurringTransition>>,
    scheduler: Scheduler,
    event_log: EventLog,
    started: bool,
}

impl Simulation {
    /// Build a run ready to start
    ///
    /// # Errors
    /// `Config` for any invalid setting; nothing has fired yet.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut module =
            DiseaseModule::with_schedules(config.infection_schedule, config.cure_schedule)?;
        module.load_parameters();
        for (name, value) in &config.parameter_overrides {
            module.set_parameter(name, *value)?;
        }

        let mut population = Population::new(config.population_size);
        module.initialize(&mut population);

        let transitions = module.transitions();

        Ok(Self {
            run_id: Uuid::new_v4(),
            clock: SimulationClock::new(config.start_date),
            rng: RngManager::new(config.rng_seed),
            population,
            module,
            transitions,
            scheduler: Scheduler::new(),
            event_log: EventLog::new(),
            started: false,
            config,
        })
    }

    /// Reassemble a run from checkpointed parts
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        config: SimulationConfig,
        clock: SimulationClock,
        rng: RngManager,
        population: Population,
        module: DiseaseModule,
        scheduler: Scheduler,
        event_log: EventLog,
        started: bool,
    ) -> Self {
        let transitions = module.transitions();
        Self {
            run_id: Uuid::new_v4(),
            config,
            clock,
            rng,
            population,
            module,
            transitions,
            scheduler,
            event_log,
            started,
        }
    }

    /// Override a parameter before the run starts
    ///
    /// # Errors
    /// `RunAlreadyStarted` after the first call to `step` or `run`;
    /// `Config` if the value is not a probability.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), SimulationError> {
        if self.started {
            return Err(SimulationError::RunAlreadyStarted);
        }
        self.module.set_parameter(name, value)?;
        Ok(())
    }

    /// Schedule both transitions; called implicitly by `step` and `run`
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.started {
            return Ok(());
        }

        for schedule in self.module.initialise_simulation(self.clock.current_date())? {
            let slot = self
                .transitions
                .iter()
                .position(|t| t.kind() == schedule.kind)
                .ok_or_else(|| {
                    SimulationError::InvariantViolation(format!(
                        "no registered transition for {}",
                        schedule.kind
                    ))
                })?;
            self.scheduler
                .schedule_recurring(slot, schedule.first_date, schedule.period_months);
        }

        self.started = true;
        info!(
            run_id = %self.run_id,
            start = %self.config.start_date,
            end = %self.config.end_date,
            population = self.population.len(),
            seed = self.config.rng_seed,
            p_infection = self.module.parameters().p_infection(),
            p_cure = self.module.parameters().p_cure(),
            "simulation started"
        );
        Ok(())
    }

    /// Run the next firing due before the end date
    ///
    /// Returns `None` once nothing is left to fire.
    pub fn step(&mut self) -> Result<Option<TickResult>, SimulationError> {
        self.start()?;

        let Some(firing) = self.scheduler.pop_due(self.config.end_date) else {
            return Ok(None);
        };
        let delta = self.fire(firing)?;
        self.scheduler.reschedule(firing)?;

        Ok(Some(TickResult {
            date: firing.date,
            delta,
        }))
    }

    fn fire(&mut self, firing: ScheduledFiring) -> Result<StatsDelta, SimulationError> {
        self.clock.advance_to(firing.date)?;
        let date = self.clock.current_date();

        let transition = self.transitions.get(firing.slot).ok_or_else(|| {
            SimulationError::InvariantViolation(format!("unknown transition slot {}", firing.slot))
        })?;
        let delta = transition.fire(
            date,
            &mut self.population,
            &mut self.rng,
            self.module.parameters(),
        )?;
        self.population.check_invariants(date)?;

        self.module.record(date, &delta);
        self.event_log.log(match delta.record {
            Some(record) => Event::InfectionFired {
                date,
                eligible: delta.eligible,
                infected: delta.selected,
                prevalence: record.prevalence,
            },
            None => Event::CureFired {
                date,
                eligible: delta.eligible,
                cured: delta.selected,
            },
        });

        debug!(
            kind = %delta.kind,
            %date,
            eligible = delta.eligible,
            selected = delta.selected,
            "transition fired"
        );
        Ok(delta)
    }

    /// Run to the end date and return the summary
    pub fn run(&mut self) -> Result<SummaryTable, SimulationError> {
        let span = info_span!("simulation", run_id = %self.run_id);
        let _enter = span.enter();

        while self.step()?.is_some() {}

        self.clock.advance_to(self.config.end_date)?;
        info!(
            firings = self.event_log.len(),
            prevalence = self.population.count_infected(),
            "simulation finished"
        );
        Ok(self.module.on_simulation_end(&self.population))
    }

    /// Summary of what has been recorded so far
    pub fn summarize(&self) -> SummaryTable {
        self.module.summarize(&self.population)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn current_date(&self) -> NaiveDate {
        self.clock.current_date()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn module(&self) -> &DiseaseModule {
        &self.module
    }

    pub fn parameters(&self) -> &DiseaseParameters {
        self.module.parameters()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn rng(&self) -> &RngManager {
        &self.rng
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
