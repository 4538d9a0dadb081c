//! Disease Simulator Core - Rust Engine
//!
//! Individual-based disease state model with two recurring stochastic
//! transitions (infection and cure) and incidence/prevalence bookkeeping.
//!
//! # Architecture
//!
//! - **core**: Simulation clock and calendar-month arithmetic
//! - **models**: Population store, parameters, event log
//! - **disease**: Disease module, transitions, statistics and summary
//! - **orchestrator**: Reference host (scheduler, run loop, checkpoints)
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. `is_infected` implies a set infection date no later than today
//! 2. All randomness is deterministic (one seeded stream per run)
//! 3. Each firing evaluates eligibility before writing any state

// Module declarations
pub mod core;
pub mod disease;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use core::time::SimulationClock;
pub use disease::{
    CureTransition, DiseaseModule, DiseaseStatistics, InfectionTransition, RecurringTransition,
    StatsDelta, SummaryRow, SummaryTable, TickRecord, TransitionKind, TransitionSchedule,
};
pub use models::{
    event::{Event, EventLog},
    parameters::{ConfigError, DiseaseParameters},
    population::{IndividualRecord, PersonId, Population},
};
pub use orchestrator::{Simulation, SimulationConfig, SimulationError, TickResult};
pub use rng::RngManager;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn disease_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::simulation::PySimulation>()?;
    Ok(())
}
