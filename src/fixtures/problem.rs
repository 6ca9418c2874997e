use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::types::{Location, ProblemInstance};
use crate::error::ProblemError;

/// Problem definition as read from JSON and served by the index endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    pub depot: Location,
    pub customers: Vec<Location>,
    pub vehicle_capacity: u32,
    pub num_vehicles: usize,
    /// Optional precomputed table for the static provider, in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_matrix: Option<Vec<Vec<f64>>>,
}

impl ProblemDefinition {
    /// Depot and nine customers in West Jakarta, three vehicles of capacity 30.
    pub fn builtin() -> Self {
        let customer = |id, name: &str, lat, lon| Location::customer(id, name, lat, lon, 10);
        Self {
            depot: Location::depot("Depot", -6.185875070871443, 106.779258142967),
            customers: vec![
                customer(1, "Pelanggan A", -6.259972903118333, 106.82681300383585),
                customer(2, "Pelanggan B", -6.262689337785392, 106.83611277989932),
                customer(3, "Pelanggan C", -6.267616787850371, 106.83329530788009),
                customer(4, "Pelanggan D", -6.178433204859067, 106.76864904697906),
                customer(5, "Pelanggan E", -6.192541460600721, 106.77280470224031),
                customer(6, "Pelanggan F", -6.182984429170896, 106.7523769992909),
                customer(7, "Pelanggan G", -6.197661227734034, 106.77400633182557),
                customer(8, "Pelanggan H", -6.159261766086418, 106.76662489294469),
                customer(9, "Pelanggan I", -6.162760498959078, 106.76593824803936),
            ],
            vehicle_capacity: 30,
            num_vehicles: 3,
            distance_matrix: None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let definition: Self = serde_json::from_str(&text)?;
        info!(
            "Loaded problem from {} ({} customers, {} vehicles)",
            path.display(),
            definition.customers.len(),
            definition.num_vehicles
        );
        Ok(definition)
    }

    /// Load `path` if given, else the built-in problem.
    pub fn load(path: Option<&Path>) -> Result<Self, ProblemError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No PROBLEM_FILE configured, using built-in problem");
                Ok(Self::builtin())
            }
        }
    }

    pub fn to_instance(&self) -> Result<ProblemInstance, ProblemError> {
        ProblemInstance::new(
            self.depot.clone(),
            self.customers.clone(),
            self.vehicle_capacity,
            self.num_vehicles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_is_valid_and_feasible() {
        let pi = ProblemDefinition::builtin().to_instance().unwrap();
        assert_eq!(pi.customers().len(), 9);
        assert_eq!(pi.num_vehicles(), 3);
        assert!(pi.ensure_all_placeable().is_ok());
    }

    #[test]
    fn reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "depot": {{"name": "Hub", "lat": 0.0, "lon": 0.0}},
                "customers": [
                    {{"id": 1, "name": "A", "lat": 0.0, "lon": 0.1, "demand": 10}},
                    {{"id": 2, "name": "B", "lat": 0.1, "lon": 0.0, "demand": 10}}
                ],
                "vehicle_capacity": 30,
                "num_vehicles": 1,
                "distance_matrix": [[0, 5, 5], [5, 0, 3], [5, 3, 0]]
            }}"#
        )
        .unwrap();

        let definition = ProblemDefinition::load(Some(file.path())).unwrap();
        assert_eq!(definition.depot.demand, 0);
        assert_eq!(definition.customers[1].id, Some(2));
        assert_eq!(definition.distance_matrix.as_ref().map(|m| m.len()), Some(3));
        assert!(definition.to_instance().is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ProblemDefinition::from_file("/nonexistent/problem.json").unwrap_err();
        assert!(matches!(err, ProblemError::Io(_)));
    }
}
