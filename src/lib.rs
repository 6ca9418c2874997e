//! Capacitated vehicle routing with a random-restart search that never
//! regresses.
//!
//! A [`ProblemInstance`](domain::types::ProblemInstance) is scored against a
//! distance matrix fetched once from a [`DistanceProvider`](distance::provider::DistanceProvider).
//! The [`SearchController`](solver::search::SearchController) keeps the
//! baseline and best-ever solutions for the lifetime of the process.

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod presentation;
pub mod server;
pub mod solver;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
