use std::sync::Arc;

use cvrp_planner::config::Settings;
use cvrp_planner::server::{self, AppState};
use cvrp_planner::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let settings = Settings::from_env()?;
    let state = Arc::new(AppState::from_settings(&settings)?);
    server::serve(state, &settings).await
}
