use serde::Serialize;

use crate::domain::types::{CustomerId, Solution};

/// Evaluated figures for one non-empty vehicle route. Distances are meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// 1-based vehicle slot.
    pub vehicle_id: usize,
    pub description: String,
    pub distance: f64,
    pub load: u32,
    pub customer_ids: Vec<CustomerId>,
}

/// A solution together with everything the evaluator derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSolution {
    pub solution: Solution,
    pub total_distance: f64,
    pub routes: Vec<RouteSummary>,
    /// Customers no vehicle could take, in instance order.
    pub unassigned: Vec<CustomerId>,
}

impl ScoredSolution {
    pub fn total_load(&self) -> u32 {
        self.routes.iter().map(|r| r.load).sum()
    }

    pub fn is_better_than(&self, other: &ScoredSolution) -> bool {
        self.total_distance < other.total_distance
    }
}
