//! Disease parameters
//!
//! Named probabilities read by the transitions at fire time. Values are
//! validated whenever they are written, so a stored parameter is always a
//! finite probability in `[0, 1]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-tick probability that an uninfected individual becomes infected
pub const P_INFECTION: &str = "p_infection";

/// Per-tick probability that an eligible infected individual is cured
pub const P_CURE: &str = "p_cure";

pub const DEFAULT_P_INFECTION: f64 = 0.1;
pub const DEFAULT_P_CURE: f64 = 0.15;

/// Errors raised while loading or overriding configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Parameter '{name}' must be within [0, 1], got {value}")]
    OutOfRange { name: String, value: f64 },

    #[error("Parameter '{name}' must be a finite number")]
    NotFinite { name: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Repeat interval for {0} transition must be at least one month")]
    ZeroRepeatInterval(String),

    #[error("End date {end} must be after start date {start}")]
    InvalidDateRange { start: String, end: String },
}

/// Check that `value` is a usable probability for parameter `name`
pub fn validate_probability(name: &str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite {
            name: name.to_string(),
        });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Parameter store for the disease module
///
/// # Example
///
/// ```rust
/// use disease_simulator_core_rs::DiseaseParameters;
///
/// let mut params = DiseaseParameters::default();
/// assert_eq!(params.p_infection(), 0.1);
///
/// params.set("p_infection", 0.5).unwrap();
/// assert_eq!(params.get("p_infection").unwrap(), 0.5);
/// assert!(params.set("p_cure", 1.5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameters")]
pub struct DiseaseParameters {
    p_infection: f64,
    p_cure: f64,
}

/// Unchecked wire form; deserialized values pass through [`DiseaseParameters::new`]
#[derive(Deserialize)]
struct RawParameters {
    p_infection: f64,
    p_cure: f64,
}

impl TryFrom<RawParameters> for DiseaseParameters {
    type Error = ConfigError;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        DiseaseParameters::new(raw.p_infection, raw.p_cure)
    }
}

impl Default for DiseaseParameters {
    fn default() -> Self {
        Self {
            p_infection: DEFAULT_P_INFECTION,
            p_cure: DEFAULT_P_CURE,
        }
    }
}

impl DiseaseParameters {
    /// Build a parameter set, validating both probabilities
    pub fn new(p_infection: f64, p_cure: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            p_infection: validate_probability(P_INFECTION, p_infection)?,
            p_cure: validate_probability(P_CURE, p_cure)?,
        })
    }

    /// Names accepted by [`get`](Self::get) and [`set`](Self::set)
    pub fn names() -> [&'static str; 2] {
        [P_INFECTION, P_CURE]
    }

    pub fn p_infection(&self) -> f64 {
        self.p_infection
    }

    pub fn p_cure(&self) -> f64 {
        self.p_cure
    }

    /// Read a parameter by name
    pub fn get(&self, name: &str) -> Result<f64, ConfigError> {
        match name {
            P_INFECTION => Ok(self.p_infection),
            P_CURE => Ok(self.p_cure),
            other => Err(ConfigError::UnknownParameter(other.to_string())),
        }
    }

    /// Override a parameter by name
    ///
    /// The stored value is left untouched when validation fails.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let slot = match name {
            P_INFECTION => &mut self.p_infection,
            P_CURE => &mut self.p_cure,
            other => return Err(ConfigError::UnknownParameter(other.to_string())),
        };
        *slot = validate_probability(name, value)?;
        Ok(())
    }
}
