//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::{DistanceProvider, Geometry};
use crate::domain::types::{Location, ProblemInstance};
use crate::error::ProviderError;

/// Depot plus A (id 1) and B (id 2), both demand 10.
pub fn two_customer_instance(capacity: u32, vehicles: usize) -> ProblemInstance {
    ProblemInstance::new(
        Location::depot("Depot", 0.0, 0.0),
        vec![
            Location::customer(1, "A", 0.0, 0.1, 10),
            Location::customer(2, "B", 0.1, 0.0, 10),
        ],
        capacity,
        vehicles,
    )
    .unwrap()
}

/// Symmetric: depot-A 5, depot-B 5, A-B 3.
pub fn two_customer_matrix() -> DistanceMatrix {
    DistanceMatrix::from_rows(
        vec![vec![0.0, 5.0, 5.0], vec![5.0, 0.0, 3.0], vec![5.0, 3.0, 0.0]],
        3,
    )
    .unwrap()
}

/// `n` customers of the given demand on a line east of the depot.
pub fn line_instance(n: u32, demand: u32, capacity: u32, vehicles: usize) -> ProblemInstance {
    let customers = (1..=n)
        .map(|id| Location::customer(id, format!("C{}", id), 0.0, id as f64 * 0.01, demand))
        .collect();
    ProblemInstance::new(Location::depot("Depot", 0.0, 0.0), customers, capacity, vehicles).unwrap()
}

/// Provider over a fixed table that counts matrix calls and can be told to fail.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    pub rows: Option<Vec<Vec<f64>>>,
    pub failing: AtomicBool,
    pub matrix_calls: AtomicUsize,
    pub geometry_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn with_rows(rows: Vec<Vec<f64>>) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn matrix_calls(&self) -> usize {
        self.matrix_calls.load(Ordering::SeqCst)
    }
}

impl DistanceProvider for ScriptedProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        self.matrix_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout);
        }
        match &self.rows {
            Some(rows) => DistanceMatrix::from_rows(rows.clone(), points.len()),
            None => crate::distance::providers::HaversineProvider
                .distance_matrix(points)
                .await,
        }
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        self.geometry_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Vec::new()
        } else {
            waypoints.to_vec()
        }
    }
}
