//! Turning scored solutions into caller-facing payloads.
//!
//! Everything inside the crate is in meters; conversion to kilometers
//! happens here and nowhere else.

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::config::constant::METERS_PER_KILOMETER;
use crate::distance::provider::DistanceProvider;
use crate::domain::solution::{RouteSummary, ScoredSolution};
use crate::domain::types::{CustomerId, Location, ProblemInstance};
use crate::solver::search::SearchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentOptions {
    pub include_geometry: bool,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            include_geometry: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePayload {
    pub vehicle_id: usize,
    pub route_str: String,
    pub distance_km: f64,
    pub load: u32,
    /// `[lat, lon]` pairs; empty when geometry is off or unavailable.
    pub geometry: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionPayload {
    pub total_distance_km: f64,
    pub route_details: Vec<RoutePayload>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unassigned_customers: Vec<CustomerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResponse {
    pub initial: SolutionPayload,
    pub best_option: SolutionPayload,
    pub current_trial: SolutionPayload,
}

/// Static problem definition for the index endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemView {
    pub depot: Location,
    pub customers: Vec<Location>,
    pub vehicle_capacity: u32,
    pub num_vehicles: usize,
}

impl From<&ProblemInstance> for ProblemView {
    fn from(pi: &ProblemInstance) -> Self {
        Self {
            depot: pi.depot().clone(),
            customers: pi.customers().to_vec(),
            vehicle_capacity: pi.vehicle_capacity(),
            num_vehicles: pi.num_vehicles(),
        }
    }
}

fn to_km(meters: f64) -> f64 {
    meters / METERS_PER_KILOMETER
}

/// Waypoints for a route: depot, its customers in order, depot.
fn route_waypoints(route: &RouteSummary, pi: &ProblemInstance) -> Vec<(f64, f64)> {
    std::iter::once(pi.depot().coords())
        .chain(
            route
                .customer_ids
                .iter()
                .filter_map(|id| pi.customer(*id))
                .map(Location::coords),
        )
        .chain(std::iter::once(pi.depot().coords()))
        .collect()
}

/// Build the payload for one solution, fetching route geometry concurrently
/// when enabled. Geometry failures leave that route's geometry empty.
pub async fn present<P: DistanceProvider>(
    scored: &ScoredSolution,
    pi: &ProblemInstance,
    provider: &P,
    options: PresentOptions,
) -> SolutionPayload {
    let geometries = if options.include_geometry {
        let waypoints: Vec<Vec<(f64, f64)>> =
            scored.routes.iter().map(|r| route_waypoints(r, pi)).collect();
        debug!("Fetching geometry for {} routes", waypoints.len());
        join_all(waypoints.iter().map(|w| provider.route_geometry(w))).await
    } else {
        vec![Vec::new(); scored.routes.len()]
    };

    let route_details = scored
        .routes
        .iter()
        .zip(geometries)
        .map(|(route, geometry)| RoutePayload {
            vehicle_id: route.vehicle_id,
            route_str: route.description.clone(),
            distance_km: to_km(route.distance),
            load: route.load,
            geometry: geometry.into_iter().map(|(lat, lon)| [lat, lon]).collect(),
        })
        .collect();

    SolutionPayload {
        total_distance_km: to_km(scored.total_distance),
        route_details,
        unassigned_customers: scored.unassigned.clone(),
    }
}

/// Payloads for all three solutions of a search run.
pub async fn present_outcome<P: DistanceProvider>(
    outcome: &SearchOutcome,
    pi: &ProblemInstance,
    provider: &P,
    options: PresentOptions,
) -> SolveResponse {
    let (initial, best_option, current_trial) = futures::join!(
        present(&outcome.initial, pi, provider, options),
        present(&outcome.best_ever, pi, provider, options),
        present(&outcome.best_in_run, pi, provider, options),
    );
    SolveResponse {
        initial,
        best_option,
        current_trial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::matrix::DistanceMatrix;
    use crate::domain::types::{Route, Solution};
    use crate::evaluation::evaluator::evaluate;
    use crate::test_support::{two_customer_instance, two_customer_matrix, ScriptedProvider};
    use std::sync::atomic::Ordering;

    fn scored(routes: Vec<Vec<CustomerId>>, capacity: u32) -> (ScoredSolution, ProblemInstance) {
        let pi = two_customer_instance(capacity, routes.len());
        let solution = Solution {
            routes: routes.into_iter().map(|customers| Route { customers }).collect(),
        };
        (evaluate(&solution, &pi, &km_matrix()), pi)
    }

    /// The fixture matrix with every entry read as kilometers.
    fn km_matrix() -> DistanceMatrix {
        let rows = two_customer_matrix()
            .rows()
            .iter()
            .map(|row| row.iter().map(|d| d * 1000.0).collect())
            .collect();
        DistanceMatrix::from_rows(rows, 3).unwrap()
    }

    #[tokio::test]
    async fn converts_to_kilometers_and_fetches_geometry() {
        let (scored, pi) = scored(vec![vec![1, 2], vec![]], 30);
        let provider = ScriptedProvider::default();
        let payload = present(&scored, &pi, &provider, PresentOptions::default()).await;

        assert_eq!(payload.total_distance_km, 13.0);
        assert_eq!(payload.route_details.len(), 1);
        let route = &payload.route_details[0];
        assert_eq!(route.vehicle_id, 1);
        assert_eq!(route.route_str, "A -> B");
        assert_eq!(route.load, 20);
        // depot, A, B, depot
        assert_eq!(
            route.geometry,
            vec![[0.0, 0.0], [0.0, 0.1], [0.1, 0.0], [0.0, 0.0]]
        );
        assert_eq!(provider.geometry_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn geometry_failure_degrades_to_empty() {
        let (scored, pi) = scored(vec![vec![1], vec![2]], 30);
        let provider = ScriptedProvider::default();
        provider.set_failing(true);
        let payload = present(&scored, &pi, &provider, PresentOptions::default()).await;
        assert_eq!(payload.route_details.len(), 2);
        assert!(payload.route_details.iter().all(|r| r.geometry.is_empty()));
        assert_eq!(payload.total_distance_km, 20.0);
    }

    #[tokio::test]
    async fn geometry_can_be_disabled() {
        let (scored, pi) = scored(vec![vec![1, 2]], 30);
        let provider = ScriptedProvider::default();
        let options = PresentOptions {
            include_geometry: false,
        };
        let payload = present(&scored, &pi, &provider, options).await;
        assert!(payload.route_details[0].geometry.is_empty());
        assert_eq!(provider.geometry_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unassigned_only_serialized_when_present() {
        let provider = ScriptedProvider::default();
        let options = PresentOptions {
            include_geometry: false,
        };

        let (full, pi) = scored(vec![vec![1, 2]], 30);
        let json = serde_json::to_value(present(&full, &pi, &provider, options).await).unwrap();
        assert!(json.get("unassigned_customers").is_none());

        let (partial, pi) = scored(vec![vec![2]], 10);
        let json = serde_json::to_value(present(&partial, &pi, &provider, options).await).unwrap();
        assert_eq!(json["unassigned_customers"], serde_json::json!([1]));
    }
}
