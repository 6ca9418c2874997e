//! Run a fixed number of searches back to back and report the records.

use std::error::Error;

use colored::*;
use tracing::{info, warn};

use cvrp_planner::config::constant::METERS_PER_KILOMETER;
use cvrp_planner::config::Settings;
use cvrp_planner::domain::ScoredSolution;
use cvrp_planner::server::AppState;
use cvrp_planner::solver::records::save_records_csv;
use cvrp_planner::telemetry;

fn km(meters: f64) -> f64 {
    meters / METERS_PER_KILOMETER
}

fn print_solution(label: &str, solution: &ScoredSolution) {
    println!("{} {:.2} km", label.bold(), km(solution.total_distance));
    for route in &solution.routes {
        println!(
            "  vehicle {}: {} ({:.2} km, load {})",
            route.vehicle_id,
            route.description,
            km(route.distance),
            route.load
        );
    }
    if !solution.unassigned.is_empty() {
        println!(
            "  {}",
            format!("unassigned customers: {:?}", solution.unassigned).yellow()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    telemetry::init_tracing();
    let settings = Settings::from_env()?;
    let state = AppState::from_settings(&settings)?;
    let controller = &state.controller;

    info!(
        "Running {} searches of {} trials",
        settings.search_runs, settings.search_trials
    );

    for run in 1..=settings.search_runs {
        let outcome = controller.run_search().await?;
        let line = format!(
            "run {:>3}: run best {:>8.2} km | best ever {:>8.2} km",
            run,
            km(outcome.best_in_run.total_distance),
            km(outcome.best_ever.total_distance)
        );
        if outcome.record.is_some() {
            println!("{} {}", line.green(), "NEW RECORD".green().bold());
        } else {
            println!("{}", line);
        }
    }

    if let Some(initial) = controller.initial_baseline()? {
        print_solution("Initial baseline:", &initial);
    }
    if let Some(best) = controller.best_ever()? {
        print_solution("Best ever:", &best);
    }

    let records = controller.records()?;
    if records.is_empty() {
        warn!("No run improved on the initial baseline");
    }
    save_records_csv(&records, &settings.records_csv)?;
    Ok(())
}
