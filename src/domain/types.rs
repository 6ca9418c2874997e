use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProblemError;

pub type CustomerId = u32;

/// A depot or customer position. The depot has no id and zero demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub demand: u32,
}

impl Location {
    pub fn depot(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            lat,
            lon,
            demand: 0,
        }
    }

    pub fn customer(id: CustomerId, name: impl Into<String>, lat: f64, lon: f64, demand: u32) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            lat,
            lon,
            demand,
        }
    }

    /// `(lat, lon)` pair.
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// Ordered customer visits for one vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub customers: Vec<CustomerId>,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// One route per vehicle slot, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub routes: Vec<Route>,
}

impl Solution {
    pub fn empty(num_vehicles: usize) -> Self {
        Self {
            routes: vec![Route::default(); num_vehicles],
        }
    }

    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|r| r.customers.len()).sum()
    }
}

/// Depot, customers and fleet. Immutable once built: fields are only
/// readable, so the id index always matches the customer list.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    depot: Location,
    customers: Vec<Location>,
    vehicle_capacity: u32,
    num_vehicles: usize,
    matrix_index: HashMap<CustomerId, usize>,
}

impl ProblemInstance {
    /// Validate and index a problem definition.
    ///
    /// Customers whose demand exceeds the vehicle capacity are accepted but
    /// logged; they can never be placed and show up as unassigned.
    pub fn new(
        depot: Location,
        customers: Vec<Location>,
        vehicle_capacity: u32,
        num_vehicles: usize,
    ) -> Result<Self, ProblemError> {
        if num_vehicles == 0 {
            return Err(ProblemError::NoVehicles);
        }
        if vehicle_capacity == 0 {
            return Err(ProblemError::ZeroCapacity);
        }

        let mut seen = HashSet::new();
        let mut matrix_index = HashMap::with_capacity(customers.len());
        for (pos, customer) in customers.iter().enumerate() {
            let id = match customer.id {
                Some(id) if id > 0 => id,
                other => return Err(ProblemError::InvalidCustomerId(other.unwrap_or(0))),
            };
            if !seen.insert(id) {
                return Err(ProblemError::DuplicateCustomerId(id));
            }
            matrix_index.insert(id, pos + 1);
        }

        let depot = Location { id: None, demand: 0, ..depot };
        let instance = Self {
            depot,
            customers,
            vehicle_capacity,
            num_vehicles,
            matrix_index,
        };

        for customer in instance.infeasible_customers() {
            warn!(
                "Customer {} ({}) demands {} > capacity {}; it will never be assigned",
                customer.id.unwrap_or_default(),
                customer.name,
                customer.demand,
                vehicle_capacity
            );
        }

        Ok(instance)
    }

    pub fn depot(&self) -> &Location {
        &self.depot
    }

    /// Customers in instance (matrix) order.
    pub fn customers(&self) -> &[Location] {
        &self.customers
    }

    pub fn vehicle_capacity(&self) -> u32 {
        self.vehicle_capacity
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Matrix row/column of a customer: depot is 0, customer at list position k is k + 1.
    pub fn matrix_index(&self, id: CustomerId) -> Option<usize> {
        self.matrix_index.get(&id).copied()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Location> {
        self.matrix_index(id).and_then(|idx| self.customers.get(idx - 1))
    }

    pub fn customer_ids(&self) -> Vec<CustomerId> {
        self.customers.iter().filter_map(|c| c.id).collect()
    }

    /// Depot first, then customers in instance order: the matrix ordering.
    pub fn locations(&self) -> Vec<&Location> {
        std::iter::once(&self.depot).chain(self.customers.iter()).collect()
    }

    pub fn dimension(&self) -> usize {
        self.customers.len() + 1
    }

    pub fn infeasible_customers(&self) -> impl Iterator<Item = &Location> {
        self.customers
            .iter()
            .filter(move |c| c.demand > self.vehicle_capacity)
    }

    /// Fail on the first customer that no vehicle could ever carry.
    pub fn ensure_all_placeable(&self) -> Result<(), ProblemError> {
        match self.infeasible_customers().next() {
            Some(c) => Err(ProblemError::InfeasibleCustomer {
                id: c.id.unwrap_or_default(),
                demand: c.demand,
                capacity: self.vehicle_capacity,
            }),
            None => Ok(()),
        }
    }
}
