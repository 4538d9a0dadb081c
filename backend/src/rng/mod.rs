//! Deterministic random number generation
//!
//! Every stochastic decision in a run draws from one seeded stream owned by
//! the host, so the same seed and the same sequence of firings reproduce the
//! same trajectory. Nothing else in the crate may create randomness.

mod xorshift;

pub use xorshift::RngManager;
