//! Statistics sink and end-of-run summary
//!
//! Incidence and prevalence are kept as date-ordered series. The summary
//! table is indexed by every date present in the incidence series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::TickRecord;

/// Incidence and prevalence series for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseStatistics {
    incidence_by_date: BTreeMap<NaiveDate, usize>,
    prevalence_by_date: BTreeMap<NaiveDate, usize>,
}

impl DiseaseStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved series
    pub fn from_series(
        incidence_by_date: BTreeMap<NaiveDate, usize>,
        prevalence_by_date: BTreeMap<NaiveDate, usize>,
    ) -> Self {
        Self {
            incidence_by_date,
            prevalence_by_date,
        }
    }

    /// Store the observation for `date`
    ///
    /// A second observation for the same date replaces the first and is
    /// returned.
    pub fn record(&mut self, date: NaiveDate, record: TickRecord) -> Option<TickRecord> {
        let previous_incidence = self.incidence_by_date.insert(date, record.incidence);
        let previous_prevalence = self.prevalence_by_date.insert(date, record.prevalence);

        match (previous_incidence, previous_prevalence) {
            (Some(incidence), Some(prevalence)) => {
                warn!(%date, "incidence already recorded for date, replacing");
                Some(TickRecord {
                    incidence,
                    prevalence,
                })
            }
            _ => None,
        }
    }

    pub fn incidence_by_date(&self) -> &BTreeMap<NaiveDate, usize> {
        &self.incidence_by_date
    }

    pub fn prevalence_by_date(&self) -> &BTreeMap<NaiveDate, usize> {
        &self.prevalence_by_date
    }

    /// Number of recorded ticks
    pub fn len(&self) -> usize {
        self.incidence_by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidence_by_date.is_empty()
    }

    pub fn total_incidence(&self) -> usize {
        self.incidence_by_date.values().sum()
    }

    /// Build the summary table, stamping every row with `total_population`
    pub fn summarize(&self, total_population: usize) -> SummaryTable {
        let rows = self
            .incidence_by_date
            .iter()
            .map(|(&date, &incidence)| SummaryRow {
                date,
                incidence,
                prevalence: self.prevalence_by_date.get(&date).copied().unwrap_or(0),
                total_population,
            })
            .collect();
        SummaryTable { rows }
    }
}

/// One row of the end-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub incidence: usize,
    pub prevalence: usize,
    pub total_population: usize,
}

/// End-of-run incidence and prevalence table, ordered by date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.date == date)
    }
}

impl std::fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<12} {:>10} {:>11} {:>17}",
            "date", "incidence", "prevalence", "total_population"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<12} {:>10} {:>11} {:>17}",
                row.date.to_string(),
                row.incidence,
                row.prevalence,
                row.total_population
            )?;
        }
        Ok(())
    }
}
