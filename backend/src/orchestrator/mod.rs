//! Orchestrator - reference host for the disease module
//!
//! Supplies the population store, clock, random stream and scheduler, and
//! drives the recurring transitions to the end date.
//!
//! See `engine.rs` for the run loop.

pub mod checkpoint;
pub mod engine;
pub mod scheduler;

// Re-export main types for convenience
pub use engine::{Simulation, SimulationConfig, SimulationError, TickResult};
pub use scheduler::{ScheduledFiring, Scheduler};

// Re-export checkpoint types
pub use checkpoint::{PopulationSnapshot, StateSnapshot};
