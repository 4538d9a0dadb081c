//! Python bindings
//!
//! Exposes [`Simulation`](crate::Simulation) to Python as `Simulation`.
//! Configuration crosses the boundary as a dict and results come back as
//! lists of dicts.

pub mod simulation;
pub mod types;
