use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::solution::ScoredSolution;

/// A run whose best beat the previous best-ever.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEvent {
    pub run: u64,
    pub total_distance: f64,
    pub previous_distance: f64,
    pub at: DateTime<Utc>,
}

/// Process-wide search state. Only the search controller mutates it, under
/// its lock.
#[derive(Debug, Default)]
pub struct SearchMemory {
    initial_baseline: Option<ScoredSolution>,
    best_ever: Option<ScoredSolution>,
    records: Vec<RecordEvent>,
    runs: u64,
}

impl SearchMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_baseline(&self) -> Option<&ScoredSolution> {
        self.initial_baseline.as_ref()
    }

    pub fn best_ever(&self) -> Option<&ScoredSolution> {
        self.best_ever.as_ref()
    }

    pub fn records(&self) -> &[RecordEvent] {
        &self.records
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Store `candidate` as baseline and best-ever unless a baseline exists.
    /// Returns whether it was stored.
    pub fn seed_baseline(&mut self, candidate: ScoredSolution) -> bool {
        if self.initial_baseline.is_some() {
            return false;
        }
        self.best_ever = Some(candidate.clone());
        self.initial_baseline = Some(candidate);
        true
    }

    /// Count a finished run and replace best-ever on strict improvement.
    ///
    /// Ties keep the incumbent. Without a baseline the candidate seeds it.
    pub fn offer(&mut self, candidate: &ScoredSolution) -> Option<RecordEvent> {
        self.runs += 1;
        let previous = match &self.best_ever {
            Some(best) => best.total_distance,
            None => {
                self.seed_baseline(candidate.clone());
                return None;
            }
        };
        if candidate.total_distance >= previous {
            return None;
        }

        let event = RecordEvent {
            run: self.runs,
            total_distance: candidate.total_distance,
            previous_distance: previous,
            at: Utc::now(),
        };
        self.best_ever = Some(candidate.clone());
        self.records.push(event.clone());
        Some(event)
    }
}
