//! Domain models for the disease simulator

pub mod event;
pub mod parameters;
pub mod population;

// Re-exports
pub use event::{Event, EventLog};
pub use parameters::{ConfigError, DiseaseParameters};
pub use population::{IndividualRecord, PersonId, Population};
