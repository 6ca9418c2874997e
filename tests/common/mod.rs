#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use cvrp_planner::distance::{DistanceMatrix, DistanceProvider, Geometry};
use cvrp_planner::domain::{Location, ProblemInstance};
use cvrp_planner::error::ProviderError;
use cvrp_planner::solver::{SearchConfig, SearchController};

/// Serves a fixed table; can be switched into a timing-out state.
#[derive(Debug)]
pub struct FlakyProvider {
    rows: Vec<Vec<f64>>,
    down: AtomicBool,
    pub matrix_calls: AtomicUsize,
}

impl FlakyProvider {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self {
            rows,
            down: AtomicBool::new(false),
            matrix_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

impl DistanceProvider for FlakyProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout);
        }
        DistanceMatrix::from_rows(self.rows.clone(), points.len())
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        if self.down.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            waypoints.to_vec()
        }
    }
}

/// Serves a fixed table but panics on any geometry request.
#[derive(Debug)]
pub struct PanickingProvider {
    rows: Vec<Vec<f64>>,
}

impl PanickingProvider {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }
}

impl DistanceProvider for PanickingProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        DistanceMatrix::from_rows(self.rows.clone(), points.len())
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        panic!("geometry backend crashed on {} waypoints", waypoints.len())
    }
}

/// Customers 1..=n with a symmetric table built from scattered positions, so
/// different candidates cost different amounts.
pub fn grid_problem(n: usize, demand: u32, capacity: u32, vehicles: usize) -> (ProblemInstance, Vec<Vec<f64>>) {
    let customers: Vec<Location> = (1..=n as u32)
        .map(|id| Location::customer(id, format!("C{}", id), 0.0, id as f64 * 0.01, demand))
        .collect();
    let pi = ProblemInstance::new(Location::depot("Depot", 0.0, 0.0), customers, capacity, vehicles)
        .unwrap();

    let pos = |i: usize| ((i * 37) % 11) as f64 * 100.0 + i as f64;
    let rows = (0..=n)
        .map(|i| {
            (0..=n)
                .map(|j| if i == j { 0.0 } else { (pos(i) - pos(j)).abs() + 50.0 })
                .collect()
        })
        .collect();
    (pi, rows)
}

pub fn controller<P: DistanceProvider>(
    provider: P,
    pi: ProblemInstance,
    trials: usize,
    seed: u64,
) -> SearchController<P> {
    SearchController::new(
        provider,
        Arc::new(pi),
        SearchConfig {
            trials,
            seed: Some(seed),
        },
    )
}
