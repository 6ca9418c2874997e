pub mod evaluator;

pub use evaluator::{evaluate, route_distance};
