use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::distance::provider::DistanceProvider;
use crate::distance::providers::ConfiguredProvider;
use crate::domain::types::ProblemInstance;
use crate::error::ConfigError;
use crate::fixtures::problem::ProblemDefinition;
use crate::presentation::PresentOptions;
use crate::solver::search::{SearchConfig, SearchController};

/// Everything a request needs: the controller (with its memory and matrix
/// cache) and how to render results.
pub struct AppState<P> {
    pub controller: SearchController<P>,
    pub present: PresentOptions,
}

impl<P: DistanceProvider> AppState<P> {
    pub fn new(controller: SearchController<P>, present: PresentOptions) -> Self {
        Self {
            controller,
            present,
        }
    }

    pub fn instance(&self) -> &ProblemInstance {
        self.controller.instance()
    }
}

impl AppState<ConfiguredProvider> {
    /// Load the problem and wire up the configured provider.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let definition = ProblemDefinition::load(settings.problem_file.as_deref())?;
        let instance = definition.to_instance()?;
        if settings.strict_feasibility {
            instance.ensure_all_placeable()?;
        }
        info!(
            "Problem: {} customers, {} vehicles of capacity {}",
            instance.customers().len(),
            instance.num_vehicles(),
            instance.vehicle_capacity()
        );

        let provider = ConfiguredProvider::from_settings(settings, &definition)?;
        let controller =
            SearchController::new(provider, Arc::new(instance), SearchConfig::from(settings));
        Ok(Self::new(
            controller,
            PresentOptions {
                include_geometry: settings.include_geometry,
            },
        ))
    }
}
