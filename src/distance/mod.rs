pub mod matrix;
pub mod provider;
pub mod providers;

pub use matrix::DistanceMatrix;
pub use provider::{DistanceProvider, Geometry};
