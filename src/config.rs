use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{debug, info};

use crate::error::ConfigError;

pub mod constant {
    pub const DISTANCE_PROVIDER: &str = "osrm";
    pub const OSRM_BASE_URL: &str = "https://router.project-osrm.org";
    pub const MATRIX_TIMEOUT_SECS: u64 = 15;
    pub const GEOMETRY_TIMEOUT_SECS: u64 = 10;
    pub const SEARCH_TRIALS: usize = 20;
    pub const SEARCH_RUNS: usize = 10;
    pub const BIND_ADDR: &str = "127.0.0.1:5000";
    pub const RECORDS_CSV: &str = "best_so_far.csv";
    pub const ROUTE_SEPARATOR: &str = " -> ";
    pub const METERS_PER_KILOMETER: f64 = 1000.0;
}

/// Which distance provider backs the matrix and geometry queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Osrm,
    Haversine,
    /// Precomputed matrix from the problem file.
    Static,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrm" => Ok(Self::Osrm),
            "haversine" => Ok(Self::Haversine),
            "static" => Ok(Self::Static),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderKind,
    pub osrm_base_url: String,
    pub osrm_contact_email: Option<String>,
    pub matrix_timeout: Duration,
    pub geometry_timeout: Duration,
    pub search_trials: usize,
    pub search_seed: Option<u64>,
    pub search_runs: usize,
    pub include_geometry: bool,
    pub problem_file: Option<PathBuf>,
    pub strict_feasibility: bool,
    pub bind_addr: String,
    pub records_csv: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Osrm,
            osrm_base_url: constant::OSRM_BASE_URL.to_string(),
            osrm_contact_email: None,
            matrix_timeout: Duration::from_secs(constant::MATRIX_TIMEOUT_SECS),
            geometry_timeout: Duration::from_secs(constant::GEOMETRY_TIMEOUT_SECS),
            search_trials: constant::SEARCH_TRIALS,
            search_seed: None,
            search_runs: constant::SEARCH_RUNS,
            include_geometry: true,
            problem_file: None,
            strict_feasibility: false,
            bind_addr: constant::BIND_ADDR.to_string(),
            records_csv: PathBuf::from(constant::RECORDS_CSV),
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let settings = Self::from_lookup(|key| env::var(key).ok())?;
        info!(
            "Loaded settings: provider={:?}, trials={}, seed={:?}",
            settings.provider, settings.search_trials, settings.search_seed
        );
        Ok(settings)
    }

    /// Build settings from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match get("DISTANCE_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => constant::DISTANCE_PROVIDER.parse()?,
        };

        let settings = Self {
            provider,
            osrm_base_url: get("OSRM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.osrm_base_url),
            osrm_contact_email: get("OSRM_CONTACT_EMAIL").map(|e| e.trim().to_string()),
            matrix_timeout: Duration::from_secs(parse_or(
                "MATRIX_TIMEOUT_SECS",
                get("MATRIX_TIMEOUT_SECS"),
                constant::MATRIX_TIMEOUT_SECS,
            )?),
            geometry_timeout: Duration::from_secs(parse_or(
                "GEOMETRY_TIMEOUT_SECS",
                get("GEOMETRY_TIMEOUT_SECS"),
                constant::GEOMETRY_TIMEOUT_SECS,
            )?),
            search_trials: parse_or("SEARCH_TRIALS", get("SEARCH_TRIALS"), defaults.search_trials)?,
            search_seed: get("SEARCH_SEED")
                .map(|raw| parse_value("SEARCH_SEED", &raw))
                .transpose()?,
            search_runs: parse_or("SEARCH_RUNS", get("SEARCH_RUNS"), defaults.search_runs)?,
            include_geometry: parse_or(
                "INCLUDE_GEOMETRY",
                get("INCLUDE_GEOMETRY"),
                defaults.include_geometry,
            )?,
            problem_file: get("PROBLEM_FILE").map(PathBuf::from),
            strict_feasibility: parse_or(
                "STRICT_FEASIBILITY",
                get("STRICT_FEASIBILITY"),
                defaults.strict_feasibility,
            )?,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            records_csv: get("RECORDS_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.records_csv),
        };
        debug!("Settings: {:?}", settings);
        Ok(settings)
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
