//! Event logging for simulation replay and auditing.
//!
//! One event is appended for every transition firing, in firing order.
//! The log lets tests and callers check scheduling order and per-firing
//! counts without re-deriving them from the population.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::disease::TransitionKind;

/// Record of one transition firing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Infection transition fired
    InfectionFired {
        date: NaiveDate,
        eligible: usize,
        infected: usize,
        prevalence: usize,
    },

    /// Cure transition fired
    CureFired {
        date: NaiveDate,
        eligible: usize,
        cured: usize,
    },
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        match self {
            Event::InfectionFired { date, .. } => *date,
            Event::CureFired { date, .. } => *date,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            Event::InfectionFired { .. } => TransitionKind::Infection,
            Event::CureFired { .. } => TransitionKind::Cure,
        }
    }

    /// Size of the eligible set for this firing
    pub fn eligible(&self) -> usize {
        match self {
            Event::InfectionFired { eligible, .. } => *eligible,
            Event::CureFired { eligible, .. } => *eligible,
        }
    }

    /// Number of individuals whose state changed
    pub fn selected(&self) -> usize {
        match self {
            Event::InfectionFired { infected, .. } => *infected,
            Event::CureFired { cured, .. } => *cured,
        }
    }
}

/// Append-only log of firings for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date() == date).collect()
    }

    pub fn events_of_kind(&self, kind: TransitionKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }
}
