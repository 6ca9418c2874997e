use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::{DistanceProvider, Geometry};
use crate::error::ProviderError;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two `(lat, lon)` points, in meters.
pub fn haversine_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Offline provider: straight-line distances and straight-line geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineProvider;

impl DistanceProvider for HaversineProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        if points.is_empty() {
            return Err(ProviderError::Malformed("no coordinates to query".to_string()));
        }
        let rows = points
            .iter()
            .map(|&a| points.iter().map(|&b| haversine_meters(a, b)).collect())
            .collect();
        DistanceMatrix::from_rows(rows, points.len())
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        waypoints.to_vec()
    }
}
