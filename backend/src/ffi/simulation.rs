//! PyO3 wrapper for Simulation
//!
//! ```python
//! from disease_simulator._core import Simulation
//!
//! sim = Simulation({"population_size": 1000, "rng_seed": 0})
//! sim.set_parameter("p_infection", 0.5)
//! for row in sim.run():
//!     print(row["date"], row["incidence"], row["prevalence"])
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{parse_simulation_config, series_to_py, summary_to_py, tick_result_to_py};
use crate::orchestrator::{Simulation as RustSimulation, SimulationError};

fn to_py_err(err: SimulationError) -> PyErr {
    match err {
        SimulationError::Config(_) | SimulationError::RunAlreadyStarted => {
            PyValueError::new_err(err.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustSimulation,
}

#[pymethods]
impl PySimulation {
    /// Raises ValueError for any invalid configuration value
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;
        let inner = RustSimulation::new(rust_config).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> PyResult<()> {
        self.inner.set_parameter(name, value).map_err(to_py_err)
    }

    fn get_parameter(&self, name: &str) -> PyResult<f64> {
        self.inner
            .parameters()
            .get(name)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Fire the next scheduled transition; None when the run is over
    fn step<'py>(&mut self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        match self.inner.step().map_err(to_py_err)? {
            Some(result) => Ok(Some(tick_result_to_py(py, &result)?)),
            None => Ok(None),
        }
    }

    /// Run to the end date and return the summary rows
    fn run<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyList>> {
        let summary = self.inner.run().map_err(to_py_err)?;
        summary_to_py(py, &summary)
    }

    fn current_date(&self) -> String {
        self.inner.current_date().to_string()
    }

    fn incidence<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        series_to_py(py, self.inner.module().statistics().incidence_by_date())
    }

    fn prevalence<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        series_to_py(py, self.inner.module().statistics().prevalence_by_date())
    }

    fn save_state(&self) -> PyResult<String> {
        self.inner.save_state().map_err(to_py_err)
    }
}
