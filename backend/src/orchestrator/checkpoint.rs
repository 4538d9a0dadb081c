//! Checkpoint - Save/Load Simulation State
//!
//! Serializes a run to JSON so it can be paused and resumed. A resumed run
//! continues with the same random stream and the same pending firings, so
//! it follows the same trajectory as an uninterrupted run.
//!
//! # Critical Invariants
//!
//! - **Determinism**: resume from a snapshot reproduces the uninterrupted trajectory
//! - **Column Alignment**: all population columns have the same length
//! - **Config Matching**: a snapshot can only be loaded with the config that produced it

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::engine::{Simulation, SimulationConfig, SimulationError};
use super::scheduler::{ScheduledFiring, Scheduler};
use crate::core::time::SimulationClock;
use crate::disease::{DiseaseModule, DiseaseStatistics};
use crate::models::{DiseaseParameters, EventLog, Population};
use crate::rng::RngManager;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete run state at a point between firings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub start_date: NaiveDate,
    pub current_date: NaiveDate,

    /// Random stream state (CRITICAL for determinism)
    pub rng_state: u64,

    pub population: PopulationSnapshot,
    pub parameters: DiseaseParameters,
    pub incidence_by_date: BTreeMap<NaiveDate, usize>,
    pub prevalence_by_date: BTreeMap<NaiveDate, usize>,

    pub pending_firings: Vec<ScheduledFiring>,
    pub next_sequence: u64,
    pub started: bool,
    pub event_log: EventLog,

    /// SHA256 of the canonical config JSON
    pub config_hash: String,
}

/// Disease columns of the population store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub is_infected: Vec<bool>,
    pub date_infected: Vec<Option<NaiveDate>>,
    pub date_cured: Vec<Option<NaiveDate>>,
}

impl From<&Population> for PopulationSnapshot {
    fn from(population: &Population) -> Self {
        PopulationSnapshot {
            is_infected: population.is_infected_column().to_vec(),
            date_infected: population.date_infected_column().to_vec(),
            date_cured: population.date_cured_column().to_vec(),
        }
    }
}

impl TryFrom<PopulationSnapshot> for Population {
    type Error = SimulationError;

    fn try_from(snapshot: PopulationSnapshot) -> Result<Self, Self::Error> {
        Population::from_columns(snapshot.is_infected, snapshot.date_infected, snapshot.date_cured)
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// SHA256 hex digest of `config` serialized with sorted keys
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    // serde_json::Value objects keep keys sorted, giving a canonical encoding
    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;
    let json = serde_json::to_string(&value).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Structural checks on a snapshot before it is restored
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    config: &SimulationConfig,
) -> Result<(), SimulationError> {
    let expected_hash = compute_config_hash(config)?;
    if snapshot.config_hash != expected_hash {
        return Err(SimulationError::StateValidationError(
            "Config hash mismatch: snapshot was taken with a different config".to_string(),
        ));
    }

    if snapshot.population.is_infected.len() != config.population_size {
        return Err(SimulationError::StateValidationError(format!(
            "Population size mismatch: config has {}, snapshot has {}",
            config.population_size,
            snapshot.population.is_infected.len()
        )));
    }

    if snapshot.current_date < snapshot.start_date {
        return Err(SimulationError::StateValidationError(format!(
            "Current date {} precedes start date {}",
            snapshot.current_date, snapshot.start_date
        )));
    }

    if let Some(firing) = snapshot
        .pending_firings
        .iter()
        .find(|f| f.sequence >= snapshot.next_sequence)
    {
        return Err(SimulationError::StateValidationError(format!(
            "Pending firing sequence {} not below next sequence {}",
            firing.sequence, snapshot.next_sequence
        )));
    }

    Ok(())
}

// ============================================================================
// Save / Load
// ============================================================================

impl Simulation {
    /// Capture the current state
    pub fn snapshot(&self) -> Result<StateSnapshot, SimulationError> {
        let statistics = self.module().statistics();
        Ok(StateSnapshot {
            start_date: self.clock().start_date(),
            current_date: self.clock().current_date(),
            rng_state: self.rng().get_state(),
            population: PopulationSnapshot::from(self.population()),
            parameters: self.parameters().clone(),
            incidence_by_date: statistics.incidence_by_date().clone(),
            prevalence_by_date: statistics.prevalence_by_date().clone(),
            pending_firings: self.scheduler().pending(),
            next_sequence: self.scheduler().next_sequence(),
            started: self.is_started(),
            event_log: self.event_log().clone(),
            config_hash: compute_config_hash(self.config())?,
        })
    }

    /// Serialize the current state to JSON
    pub fn save_state(&self) -> Result<String, SimulationError> {
        serde_json::to_string(&self.snapshot()?).map_err(|e| {
            SimulationError::SerializationError(format!("Failed to serialize state: {}", e))
        })
    }

    /// Restore a run saved with [`save_state`](Self::save_state)
    ///
    /// # Errors
    /// `StateValidationError` if the snapshot does not belong to `config`;
    /// `SerializationError` if the JSON cannot be parsed or holds a parameter
    /// outside `[0, 1]`.
    pub fn load_state(config: SimulationConfig, state_json: &str) -> Result<Self, SimulationError> {
        config.validate()?;
        let snapshot: StateSnapshot = serde_json::from_str(state_json).map_err(|e| {
            SimulationError::SerializationError(format!("Failed to parse state: {}", e))
        })?;
        validate_snapshot(&snapshot, &config)?;

        let population = Population::try_from(snapshot.population)?;
        population.check_invariants(snapshot.current_date)?;

        let module = DiseaseModule::from_parts(
            snapshot.parameters,
            DiseaseStatistics::from_series(snapshot.incidence_by_date, snapshot.prevalence_by_date),
            config.infection_schedule,
            config.cure_schedule,
        );

        Ok(Simulation::from_parts(
            config,
            SimulationClock::from_parts(snapshot.start_date, snapshot.current_date),
            RngManager::new(snapshot.rng_state),
            population,
            module,
            Scheduler::from_pending(snapshot.pending_firings, snapshot.next_sequence),
            snapshot.event_log,
            snapshot.started,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_config_hash_deterministic() {
        let config = SimulationConfig::default();
        assert_eq!(
            compute_config_hash(&config).unwrap(),
            compute_config_hash(&config.clone()).unwrap()
        );
    }

    #[test]
    fn test_config_hash_changes_with_seed() {
        let a = SimulationConfig::default();
        let b = SimulationConfig {
            rng_seed: 7,
            ..SimulationConfig::default()
        };
        assert_ne!(compute_config_hash(&a).unwrap(), compute_config_hash(&b).unwrap());
    }

    #[test]
    fn test_ragged_population_snapshot_rejected() {
        let snapshot = PopulationSnapshot {
            is_infected: vec![false; 3],
            date_infected: vec![None; 3],
            date_cured: vec![None; 2],
        };
        assert!(Population::try_from(snapshot).is_err());
    }
}
