use itertools::Itertools;

use crate::config::constant::ROUTE_SEPARATOR;
use crate::distance::matrix::DistanceMatrix;
use crate::domain::solution::{RouteSummary, ScoredSolution};
use crate::domain::types::{CustomerId, ProblemInstance, Solution};

const DEPOT: usize = 0;

/// Score a solution: per-route distance and load, total distance and the
/// customers left out.
///
/// Pure and deterministic. Empty routes are skipped but keep their slot in
/// the 1-based `vehicle_id` numbering. Ids unknown to the instance are
/// ignored.
pub fn evaluate(solution: &Solution, pi: &ProblemInstance, dm: &DistanceMatrix) -> ScoredSolution {
    let mut routes = Vec::new();
    let mut total_distance = 0.0;

    for (slot, route) in solution.routes.iter().enumerate() {
        if route.is_empty() {
            continue;
        }
        let distance = route_distance(&route.customers, pi, dm);
        let load = route
            .customers
            .iter()
            .filter_map(|id| pi.customer(*id))
            .map(|c| c.demand)
            .sum();
        let description = route
            .customers
            .iter()
            .filter_map(|id| pi.customer(*id))
            .map(|c| c.name.as_str())
            .join(ROUTE_SEPARATOR);

        total_distance += distance;
        routes.push(RouteSummary {
            vehicle_id: slot + 1,
            description,
            distance,
            load,
            customer_ids: route.customers.clone(),
        });
    }

    ScoredSolution {
        solution: solution.clone(),
        total_distance,
        routes,
        unassigned: unassigned_customers(solution, pi),
    }
}

/// Depot to first, each consecutive leg, last back to depot.
pub fn route_distance(customers: &[CustomerId], pi: &ProblemInstance, dm: &DistanceMatrix) -> f64 {
    let stops: Vec<usize> = customers
        .iter()
        .filter_map(|id| pi.matrix_index(*id))
        .collect();
    if stops.is_empty() {
        return 0.0;
    }

    let warehouse_to_first_loc = dm.get(DEPOT, stops[0]);
    let last_loc_to_warehouse = dm.get(stops[stops.len() - 1], DEPOT);
    let legs: f64 = stops.windows(2).map(|w| dm.get(w[0], w[1])).sum();

    warehouse_to_first_loc + legs + last_loc_to_warehouse
}

fn unassigned_customers(solution: &Solution, pi: &ProblemInstance) -> Vec<CustomerId> {
    let assigned: std::collections::HashSet<CustomerId> = solution
        .routes
        .iter()
        .flat_map(|r| r.customers.iter().copied())
        .collect();
    pi.customer_ids()
        .into_iter()
        .filter(|id| !assigned.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Route;
    use crate::test_support::{two_customer_instance, two_customer_matrix};
    use rstest::rstest;

    fn solution(routes: &[&[CustomerId]]) -> Solution {
        Solution {
            routes: routes
                .iter()
                .map(|r| Route {
                    customers: r.to_vec(),
                })
                .collect(),
        }
    }

    #[rstest]
    #[case(&[1, 2])]
    #[case(&[2, 1])]
    fn symmetric_pair_costs_thirteen_either_way(#[case] order: &[CustomerId]) {
        let pi = two_customer_instance(30, 1);
        let dm = two_customer_matrix();
        let scored = evaluate(&solution(&[order]), &pi, &dm);
        assert_eq!(scored.total_distance, 13.0);
        assert_eq!(scored.routes.len(), 1);
        assert_eq!(scored.routes[0].load, 20);
        assert!(scored.unassigned.is_empty());
    }

    #[test]
    fn describes_routes_and_keeps_slot_numbers() {
        let pi = two_customer_instance(30, 3);
        let dm = two_customer_matrix();
        let scored = evaluate(&solution(&[&[], &[2], &[1]]), &pi, &dm);

        assert_eq!(scored.routes.len(), 2);
        assert_eq!(scored.routes[0].vehicle_id, 2);
        assert_eq!(scored.routes[0].description, "B");
        assert_eq!(scored.routes[0].distance, 10.0);
        assert_eq!(scored.routes[1].vehicle_id, 3);
        assert_eq!(scored.routes[1].customer_ids, vec![1]);
        assert_eq!(scored.total_distance, 20.0);
    }

    #[test]
    fn joins_names_in_visiting_order() {
        let pi = two_customer_instance(30, 1);
        let scored = evaluate(&solution(&[&[2, 1]]), &pi, &two_customer_matrix());
        assert_eq!(scored.routes[0].description, "B -> A");
    }

    #[test]
    fn reports_unassigned_customers() {
        let pi = two_customer_instance(10, 1);
        let scored = evaluate(&solution(&[&[2]]), &pi, &two_customer_matrix());
        assert_eq!(scored.unassigned, vec![1]);
        assert_eq!(scored.total_load(), 10);
    }

    #[test]
    fn empty_solution_costs_nothing() {
        let pi = two_customer_instance(30, 2);
        let scored = evaluate(&Solution::empty(2), &pi, &two_customer_matrix());
        assert_eq!(scored.total_distance, 0.0);
        assert!(scored.routes.is_empty());
        assert_eq!(scored.unassigned, vec![1, 2]);
    }

    #[test]
    fn asymmetric_matrix_follows_direction() {
        let pi = two_customer_instance(30, 1);
        let dm = DistanceMatrix::from_rows(
            vec![vec![0.0, 1.0, 2.0], vec![4.0, 0.0, 8.0], vec![16.0, 32.0, 0.0]],
            3,
        )
        .unwrap();
        // 0->1 (1) + 1->2 (8) + 2->0 (16)
        assert_eq!(evaluate(&solution(&[&[1, 2]]), &pi, &dm).total_distance, 25.0);
        // 0->2 (2) + 2->1 (32) + 1->0 (4)
        assert_eq!(evaluate(&solution(&[&[2, 1]]), &pi, &dm).total_distance, 38.0);
    }
}
