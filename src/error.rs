use thiserror::Error;

use crate::domain::types::CustomerId;

/// Failures talking to a distance provider.
///
/// Every variant means the provider is unavailable for this request; the
/// split only exists so the logs say why.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Unavailable(String),
    #[error("request timed out")]
    Timeout,
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("provider returned code '{0}'")]
    Code(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Problems with a problem definition.
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("at least one vehicle is required")]
    NoVehicles,
    #[error("vehicle capacity must be positive")]
    ZeroCapacity,
    #[error("customer ids must be positive, got {0}")]
    InvalidCustomerId(CustomerId),
    #[error("customer id {0} appears more than once")]
    DuplicateCustomerId(CustomerId),
    #[error("customer {id} demands {demand} but vehicles only carry {capacity}")]
    InfeasibleCustomer {
        id: CustomerId,
        demand: u32,
        capacity: u32,
    },
    #[error("failed to read problem file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse problem file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by a search or index request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("distance provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Invalid environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown distance provider '{0}' (expected osrm, haversine or static)")]
    UnknownProvider(String),
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
