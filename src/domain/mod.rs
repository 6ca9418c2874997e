pub mod solution;
pub mod types;

pub use solution::{RouteSummary, ScoredSolution};
pub use types::{CustomerId, Location, ProblemInstance, Route, Solution};
