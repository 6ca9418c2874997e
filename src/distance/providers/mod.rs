pub mod fixed;
pub mod haversine;
pub mod osrm;

use tracing::info;

pub use fixed::StaticMatrixProvider;
pub use haversine::HaversineProvider;
pub use osrm::OsrmProvider;

use crate::config::{ProviderKind, Settings};
use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::{DistanceProvider, Geometry};
use crate::error::{ConfigError, ProviderError};
use crate::fixtures::problem::ProblemDefinition;

/// The provider picked at startup from `DISTANCE_PROVIDER`.
#[derive(Debug, Clone)]
pub enum ConfiguredProvider {
    Osrm(OsrmProvider),
    Haversine(HaversineProvider),
    Static(StaticMatrixProvider),
}

impl ConfiguredProvider {
    pub fn from_settings(
        settings: &Settings,
        definition: &ProblemDefinition,
    ) -> Result<Self, ConfigError> {
        info!("Using distance provider {:?}", settings.provider);
        match settings.provider {
            ProviderKind::Osrm => Ok(Self::Osrm(OsrmProvider::from_settings(settings))),
            ProviderKind::Haversine => Ok(Self::Haversine(HaversineProvider)),
            ProviderKind::Static => match &definition.distance_matrix {
                Some(rows) => Ok(Self::Static(StaticMatrixProvider::new(rows.clone()))),
                None => Err(ConfigError::InvalidValue {
                    key: "DISTANCE_PROVIDER",
                    value: "static (problem file has no distance_matrix)".to_string(),
                }),
            },
        }
    }
}

impl DistanceProvider for ConfiguredProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        match self {
            Self::Osrm(p) => p.distance_matrix(points).await,
            Self::Haversine(p) => p.distance_matrix(points).await,
            Self::Static(p) => p.distance_matrix(points).await,
        }
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        match self {
            Self::Osrm(p) => p.route_geometry(waypoints).await,
            Self::Haversine(p) => p.route_geometry(waypoints).await,
            Self::Static(p) => p.route_geometry(waypoints).await,
        }
    }
}
