//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and Python dicts/lists.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::disease::{SummaryTable, TransitionSchedule};
use crate::orchestrator::{SimulationConfig, TickResult};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract an optional field; fails only when the value has the wrong type
fn extract_optional<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<T>>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

fn parse_date(key: &str, raw: &str) -> PyResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        PyValueError::new_err(format!("Field '{}' must be a YYYY-MM-DD date: {}", key, e))
    })
}

fn parse_schedule(
    dict: &Bound<'_, PyDict>,
    key: &str,
    default: TransitionSchedule,
) -> PyResult<TransitionSchedule> {
    let Some(raw) = dict.get_item(key)? else {
        return Ok(default);
    };
    let schedule = raw.downcast::<PyDict>()?;
    Ok(TransitionSchedule {
        first_offset_months: extract_optional(schedule, "first_offset_months")?
            .unwrap_or(default.first_offset_months),
        repeat_months: extract_optional(schedule, "repeat_months")?
            .unwrap_or(default.repeat_months),
    })
}

/// Build a [`SimulationConfig`] from a Python dict
///
/// Every key is optional; missing keys take the default scenario values.
pub fn parse_simulation_config(dict: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let defaults = SimulationConfig::default();

    let start_date = match extract_optional::<String>(dict, "start_date")? {
        Some(raw) => parse_date("start_date", &raw)?,
        None => defaults.start_date,
    };
    let end_date = match extract_optional::<String>(dict, "end_date")? {
        Some(raw) => parse_date("end_date", &raw)?,
        None => defaults.end_date,
    };
    let parameter_overrides: BTreeMap<String, f64> =
        extract_optional::<HashMap<String, f64>>(dict, "parameter_overrides")?
            .unwrap_or_default()
            .into_iter()
            .collect();

    Ok(SimulationConfig {
        start_date,
        end_date,
        population_size: extract_optional(dict, "population_size")?
            .unwrap_or(defaults.population_size),
        rng_seed: extract_optional(dict, "rng_seed")?.unwrap_or(defaults.rng_seed),
        parameter_overrides,
        infection_schedule: parse_schedule(
            dict,
            "infection_schedule",
            defaults.infection_schedule,
        )?,
        cure_schedule: parse_schedule(dict, "cure_schedule", defaults.cure_schedule)?,
    })
}

pub fn tick_result_to_py<'py>(
    py: Python<'py>,
    result: &TickResult,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("date", result.date.to_string())?;
    dict.set_item("kind", result.delta.kind.as_str())?;
    dict.set_item("eligible", result.delta.eligible)?;
    dict.set_item("selected", result.delta.selected)?;
    if let Some(record) = result.delta.record {
        dict.set_item("incidence", record.incidence)?;
        dict.set_item("prevalence", record.prevalence)?;
    }
    Ok(dict)
}

pub fn summary_to_py<'py>(py: Python<'py>, summary: &SummaryTable) -> PyResult<Bound<'py, PyList>> {
    let rows = PyList::empty_bound(py);
    for row in summary.rows() {
        let dict = PyDict::new_bound(py);
        dict.set_item("date", row.date.to_string())?;
        dict.set_item("incidence", row.incidence)?;
        dict.set_item("prevalence", row.prevalence)?;
        dict.set_item("total_population", row.total_population)?;
        rows.append(dict)?;
    }
    Ok(rows)
}

pub fn series_to_py<'py>(
    py: Python<'py>,
    series: &BTreeMap<NaiveDate, usize>,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (date, count) in series {
        dict.set_item(date.to_string(), *count)?;
    }
    Ok(dict)
}
