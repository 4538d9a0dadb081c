//! Recurring event scheduler
//!
//! A min-heap of pending firings ordered by date, then by the order in
//! which they were scheduled. A fired entry is pushed back one period
//! later with a fresh sequence number, so on a shared date an entry that
//! has waited longer fires first.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SimulationError;
use crate::core::time::add_months;

/// One pending firing of a registered transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduledFiring {
    pub date: NaiveDate,
    pub sequence: u64,
    /// Index of the transition in the host's registry
    pub slot: usize,
    pub period_months: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<ScheduledFiring>>,
    next_sequence: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a scheduler from checkpointed entries
    pub fn from_pending(pending: Vec<ScheduledFiring>, next_sequence: u64) -> Self {
        Self {
            queue: pending.into_iter().map(Reverse).collect(),
            next_sequence,
        }
    }

    /// Schedule `slot` to fire on `first_date` and every `period_months` after
    pub fn schedule_recurring(&mut self, slot: usize, first_date: NaiveDate, period_months: u32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(ScheduledFiring {
            date: first_date,
            sequence,
            slot,
            period_months,
        }));
    }

    /// Date of the next pending firing
    pub fn peek_date(&self) -> Option<NaiveDate> {
        self.queue.peek().map(|Reverse(firing)| firing.date)
    }

    /// Remove and return the next firing if it falls strictly before `end_date`
    pub fn pop_due(&mut self, end_date: NaiveDate) -> Option<ScheduledFiring> {
        match self.peek_date() {
            Some(date) if date < end_date => self.queue.pop().map(|Reverse(firing)| firing),
            _ => None,
        }
    }

    /// Queue the next occurrence of a firing that has just run
    pub fn reschedule(&mut self, fired: ScheduledFiring) -> Result<(), SimulationError> {
        let next_date = add_months(fired.date, fired.period_months)?;
        self.schedule_recurring(fired.slot, next_date, fired.period_months);
        Ok(())
    }

    /// Pending firings in the order they will run
    pub fn pending(&self) -> Vec<ScheduledFiring> {
        let mut pending: Vec<_> = self.queue.iter().map(|Reverse(firing)| *firing).collect();
        pending.sort();
        pending
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
