use std::any::Any;
use std::error::Error;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::FutureExt;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::distance::provider::DistanceProvider;
use crate::error::SolveError;
use crate::presentation::{present_outcome, ProblemView};
use crate::server::state::AppState;

impl IntoResponse for SolveError {
    fn into_response(self) -> Response {
        match self {
            SolveError::ProviderUnavailable(e) => {
                warn!("Responding 503: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "error": format!("Distance provider unavailable: {}", e),
                        "kind": "provider_unavailable",
                    })),
                )
                    .into_response()
            }
            SolveError::Internal(detail) => {
                error!("Internal error while handling request: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error",
                        "kind": "internal",
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Problem definition for display. Builds the matrix first so a dead
/// provider shows up here rather than on the first solve.
pub async fn index_handler<P>(State(state): State<Arc<AppState<P>>>) -> Response
where
    P: DistanceProvider + 'static,
{
    match state.controller.ensure_matrix().await {
        Ok(_) => Json(ProblemView::from(state.instance())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// One search run: baseline, best-ever and this run's best.
pub async fn solve_handler<P>(State(state): State<Arc<AppState<P>>>) -> Response
where
    P: DistanceProvider + 'static,
{
    let outcome = match state.controller.run_search().await {
        Ok(outcome) => outcome,
        Err(e) => return e.into_response(),
    };
    let response = present_outcome(
        &outcome,
        state.instance(),
        state.controller.provider(),
        state.present,
    )
    .await;
    Json(response).into_response()
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// A panic below the router answers with the generic internal-error body
/// instead of dropping the connection.
async fn catch_panic(request: Request, next: Next) -> Response {
    let target = format!("{} {}", request.method(), request.uri());
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => SolveError::Internal(format!(
            "panic while handling {}: {}",
            target,
            panic_message(&*panic)
        ))
        .into_response(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

pub fn router<P>(state: Arc<AppState<P>>) -> Router
where
    P: DistanceProvider + 'static,
{
    Router::new()
        .route("/", get(index_handler::<P>))
        .route("/solve", post(solve_handler::<P>))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(catch_panic))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve<P>(state: Arc<AppState<P>>, settings: &Settings) -> Result<(), Box<dyn Error>>
where
    P: DistanceProvider + 'static,
{
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
