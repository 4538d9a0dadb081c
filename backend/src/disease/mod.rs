//! Disease State Model
//!
//! A single-disease module that keeps one infection state per individual
//! and mutates it through two recurring stochastic transitions.
//!
//! # Transition Interface
//!
//! Both transitions implement [`RecurringTransition`]. The host schedules
//! them by slot and calls `fire` with the current date, the population,
//! the run's random stream and the live parameter values:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use disease_simulator_core_rs::disease::{InfectionTransition, RecurringTransition};
//! use disease_simulator_core_rs::{DiseaseParameters, Population, RngManager};
//!
//! let mut population = Population::new(4);
//! let mut rng = RngManager::new(1);
//! let params = DiseaseParameters::new(1.0, 0.15).unwrap();
//! let date = NaiveDate::from_ymd_opt(2010, 2, 1).unwrap();
//!
//! let delta = InfectionTransition
//!     .fire(date, &mut population, &mut rng, &params)
//!     .unwrap();
//! assert_eq!(delta.selected, 4);
//! ```
//!
//! # Statistics
//!
//! Only the infection transition produces a [`TickRecord`]; the cure
//! transition changes state without touching the incidence or prevalence
//! series.

pub mod cure;
pub mod infection;
pub mod model;
pub mod statistics;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DiseaseParameters, Population};
use crate::orchestrator::SimulationError;
use crate::rng::RngManager;

pub use cure::CureTransition;
pub use infection::InfectionTransition;
pub use model::{DiseaseModule, RecurringSchedule, TransitionSchedule};
pub use statistics::{DiseaseStatistics, SummaryRow, SummaryTable};

/// Which transition a firing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    Infection,
    Cure,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Infection => "infection",
            TransitionKind::Cure => "cure",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incidence and prevalence observed at one firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    /// New infections during the firing
    pub incidence: usize,
    /// Infected individuals once the firing completed
    pub prevalence: usize,
}

/// Outcome of one firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsDelta {
    pub kind: TransitionKind,
    /// Size of the eligible set, evaluated before any writes
    pub eligible: usize,
    /// Individuals whose trial succeeded
    pub selected: usize,
    /// Entry for the statistics sink, if this transition records one
    pub record: Option<TickRecord>,
}

/// A recurring, population-wide stochastic transition
///
/// Implementations evaluate eligibility against the state as it was when
/// the firing began, draw one Bernoulli trial per eligible individual in
/// ascending id order, then apply all updates.
pub trait RecurringTransition: Send + Sync {
    fn kind(&self) -> TransitionKind;

    /// Apply the transition at `current_date`
    ///
    /// # Errors
    /// Any error means the store or the date arithmetic is broken; the
    /// host must abort the run.
    fn fire(
        &self,
        current_date: NaiveDate,
        population: &mut Population,
        rng: &mut RngManager,
        params: &DiseaseParameters,
    ) -> Result<StatsDelta, SimulationError>;
}

/// Build the transition registered for `kind`
pub fn transition_for(kind: TransitionKind) -> Box<dyn RecurringTransition> {
    match kind {
        TransitionKind::Infection => Box::new(InfectionTransition),
        TransitionKind::Cure => Box::new(CureTransition),
    }
}
