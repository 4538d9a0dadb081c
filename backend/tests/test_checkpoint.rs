//! Tests for save/load of simulation state
//!
//! CRITICAL: a resumed run must follow the same trajectory as an
//! uninterrupted one.

use disease_simulator_core_rs::orchestrator::checkpoint::compute_config_hash;
use disease_simulator_core_rs::{Simulation, SimulationConfig, SimulationError};

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        population_size: 250,
        rng_seed: seed,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_resume_matches_uninterrupted_run() {
    let mut uninterrupted = Simulation::new(config(77)).unwrap();
    let expected = uninterrupted.run().unwrap();

    let mut first_half = Simulation::new(config(77)).unwrap();
    for _ in 0..9 {
        first_half.step().unwrap().unwrap();
    }
    let saved = first_half.save_state().unwrap();

    let mut resumed = Simulation::load_state(config(77), &saved).unwrap();
    assert_eq!(resumed.current_date(), first_half.current_date());
    let actual = resumed.run().unwrap();

    assert_eq!(actual, expected);
    assert_eq!(resumed.population(), uninterrupted.population());
    assert_eq!(resumed.event_log(), uninterrupted.event_log());
}

#[test]
fn test_snapshot_before_start_resumes_cleanly() {
    let fresh = Simulation::new(config(5)).unwrap();
    let saved = fresh.save_state().unwrap();

    let mut resumed = Simulation::load_state(config(5), &saved).unwrap();
    assert!(!resumed.is_started());

    let mut reference = Simulation::new(config(5)).unwrap();
    assert_eq!(resumed.run().unwrap(), reference.run().unwrap());
}

#[test]
fn test_overridden_parameters_survive_checkpoint() {
    let mut sim = Simulation::new(config(6)).unwrap();
    sim.set_parameter("p_infection", 0.5).unwrap();
    sim.step().unwrap();

    let resumed = Simulation::load_state(config(6), &sim.save_state().unwrap()).unwrap();
    assert_eq!(resumed.parameters().p_infection(), 0.5);
}

#[test]
fn test_config_mismatch_rejected() {
    let sim = Simulation::new(config(1)).unwrap();
    let saved = sim.save_state().unwrap();

    let result = Simulation::load_state(config(2), &saved);
    assert!(matches!(result, Err(SimulationError::StateValidationError(_))));
}

#[test]
fn test_garbage_state_rejected() {
    let result = Simulation::load_state(config(1), "{not json");
    assert!(matches!(result, Err(SimulationError::SerializationError(_))));
}

#[test]
fn test_snapshot_carries_config_hash() {
    let sim = Simulation::new(config(3)).unwrap();
    let snapshot = sim.snapshot().unwrap();

    assert_eq!(snapshot.config_hash, compute_config_hash(&config(3)).unwrap());
    assert_eq!(snapshot.population.is_infected.len(), 250);
    assert!(snapshot.pending_firings.is_empty());
}

#[test]
fn test_out_of_range_parameters_in_state_rejected() {
    let sim = Simulation::new(config(4)).unwrap();
    let mut state: serde_json::Value = serde_json::from_str(&sim.save_state().unwrap()).unwrap();
    state["parameters"]["p_infection"] = serde_json::json!(7.5);
    state["parameters"]["p_cure"] = serde_json::json!(-3.0);

    let result = Simulation::load_state(config(4), &state.to_string());
    assert!(matches!(result, Err(SimulationError::SerializationError(_))));
}

#[test]
fn test_valid_edited_parameters_in_state_accepted() {
    let sim = Simulation::new(config(4)).unwrap();
    let mut state: serde_json::Value = serde_json::from_str(&sim.save_state().unwrap()).unwrap();
    state["parameters"]["p_cure"] = serde_json::json!(1.0);

    let resumed = Simulation::load_state(config(4), &state.to_string()).unwrap();
    assert_eq!(resumed.parameters().p_cure(), 1.0);
}
