//! The boundary to whatever service knows road distances.
//!
//! Points are `(lat, lon)` pairs. Matrix queries fail loudly; geometry
//! queries are cosmetic and degrade to an empty polyline.

use std::future::Future;

use crate::distance::matrix::DistanceMatrix;
use crate::error::ProviderError;

/// Ordered `(lat, lon)` polyline.
pub type Geometry = Vec<(f64, f64)>;

pub trait DistanceProvider: Send + Sync {
    /// Pairwise distances in meters between `points`, in the same order.
    fn distance_matrix(
        &self,
        points: &[(f64, f64)],
    ) -> impl Future<Output = Result<DistanceMatrix, ProviderError>> + Send;

    /// Road geometry through `waypoints`; empty when unavailable.
    fn route_geometry(&self, waypoints: &[(f64, f64)]) -> impl Future<Output = Geometry> + Send;
}
