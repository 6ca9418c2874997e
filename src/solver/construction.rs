use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::domain::types::{CustomerId, ProblemInstance, Solution};

/// Build one candidate: shuffle the customers with `rng`, then place them
/// first-fit.
pub fn build_candidate<R: Rng + ?Sized>(pi: &ProblemInstance, rng: &mut R) -> Solution {
    let mut order = pi.customer_ids();
    order.shuffle(rng);
    trace!("Candidate order: {:?}", order);
    place_in_order(pi, &order)
}

/// First-fit placement in the given visiting order.
///
/// Each customer goes to the lowest vehicle slot that still has room for its
/// demand. A customer that fits nowhere is dropped; the evaluator reports it
/// as unassigned. Unknown ids are skipped.
pub fn place_in_order(pi: &ProblemInstance, order: &[CustomerId]) -> Solution {
    let mut solution = Solution::empty(pi.num_vehicles());
    let mut loads = vec![0u32; pi.num_vehicles()];

    for &id in order {
        let Some(customer) = pi.customer(id) else {
            continue;
        };
        let slot = loads
            .iter()
            .position(|&load| load.saturating_add(customer.demand) <= pi.vehicle_capacity());
        match slot {
            Some(slot) => {
                loads[slot] += customer.demand;
                solution.routes[slot].customers.push(id);
            }
            None => trace!("Customer {} (demand {}) fits no vehicle", id, customer.demand),
        }
    }

    solution
}
