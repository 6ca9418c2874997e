use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, trace, warn};

use crate::config::Settings;
use crate::distance::matrix::DistanceMatrix;
use crate::distance::provider::{DistanceProvider, Geometry};
use crate::error::ProviderError;

const PUBLIC_OSRM_HOST: &str = "router.project-osrm.org";
const MAX_URL_LEN: usize = 8000;

#[derive(Debug, Deserialize)]
struct TableResponse {
    code: String,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: GeoJsonLine,
}

#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

/// OSRM `table` and `route` services over HTTP, driving profile.
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    user_agent: Option<String>,
    matrix_timeout: Duration,
    geometry_timeout: Duration,
}

impl OsrmProvider {
    pub fn new(base_url: impl Into<String>, matrix_timeout: Duration, geometry_timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            user_agent: None,
            matrix_timeout,
            geometry_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut provider = Self::new(
            settings.osrm_base_url.clone(),
            settings.matrix_timeout,
            settings.geometry_timeout,
        );
        // The public demo server asks clients to identify themselves.
        if provider.base_url.contains(PUBLIC_OSRM_HOST) {
            let contact = settings
                .osrm_contact_email
                .clone()
                .unwrap_or_else(|| "no-email-configured@example.com".to_string());
            let user_agent = format!("cvrp-planner/0.1 ({})", contact);
            info!("Using public OSRM with User-Agent: {}", user_agent);
            provider.user_agent = Some(user_agent);
        } else {
            info!("Using self-hosted OSRM at {}", provider.base_url);
        }
        provider
    }

    fn service_url(&self, service: &str, points: &[(f64, f64)], query: &str) -> String {
        format!(
            "{}/{}/v1/driving/{}?{}",
            self.base_url,
            service,
            coordinate_path(points),
            query
        )
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, ProviderError> {
        if url.len() > MAX_URL_LEN {
            warn!("OSRM URL too long ({} chars), consider self-hosted OSRM", url.len());
            return Err(ProviderError::Unavailable(format!(
                "request URL too long ({} chars)",
                url.len()
            )));
        }

        trace!("Sending GET to {}", url);
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(
            "Received response: HTTP {} ({} bytes)",
            status,
            response.content_length().unwrap_or(0)
        );
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        response.text().await.map_err(transport_error)
    }
}

impl DistanceProvider for OsrmProvider {
    async fn distance_matrix(&self, points: &[(f64, f64)]) -> Result<DistanceMatrix, ProviderError> {
        if points.is_empty() {
            return Err(ProviderError::Malformed("no coordinates to query".to_string()));
        }
        let url = self.service_url("table", points, "annotations=distance");
        info!("Requesting OSRM distance table ({} locations)", points.len());

        let result = match self.get_text(&url, self.matrix_timeout).await {
            Ok(text) => parse_table(&text, points.len()),
            Err(e) => Err(e),
        };
        match &result {
            Ok(dm) => info!(
                "Successfully created distance matrix: {}x{}",
                dm.dimension(),
                dm.dimension()
            ),
            Err(e) => error!("OSRM distance table unavailable: {}", e),
        }
        result
    }

    async fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Geometry {
        if waypoints.len() < 2 {
            return Vec::new();
        }
        let url = self.service_url("route", waypoints, "overview=full&geometries=geojson");
        let parsed = match self.get_text(&url, self.geometry_timeout).await {
            Ok(text) => parse_route(&text),
            Err(e) => Err(e),
        };
        parsed.unwrap_or_else(|e| {
            warn!("Route geometry unavailable ({} waypoints): {}", waypoints.len(), e);
            Vec::new()
        })
    }
}

/// OSRM wants `lon,lat` pairs joined by `;`.
fn coordinate_path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(lat, lon)| format!("{},{}", lon, lat))
        .collect::<Vec<String>>()
        .join(";")
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Unavailable(e.to_string())
    }
}

pub(crate) fn parse_table(text: &str, expected: usize) -> Result<DistanceMatrix, ProviderError> {
    let body: TableResponse = serde_json::from_str(text).map_err(|e| {
        ProviderError::Malformed(format!(
            "{} (first 200 chars: {})",
            e,
            text.chars().take(200).collect::<String>()
        ))
    })?;
    if body.code != "Ok" {
        return Err(ProviderError::Code(body.code));
    }
    let table = body
        .distances
        .ok_or_else(|| ProviderError::Malformed("no 'distances' table".to_string()))?;

    let mut rows = Vec::with_capacity(table.len());
    for (i, row) in table.into_iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len());
        for (j, cell) in row.into_iter().enumerate() {
            match cell {
                Some(d) => cells.push(d),
                None => {
                    return Err(ProviderError::Malformed(format!(
                        "location {} unreachable from {}",
                        j, i
                    )))
                }
            }
        }
        rows.push(cells);
    }
    DistanceMatrix::from_rows(rows, expected)
}

/// Extract the first route's geometry as `(lat, lon)` pairs.
pub(crate) fn parse_route(text: &str) -> Result<Geometry, ProviderError> {
    let body: RouteResponse =
        serde_json::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    if body.code != "Ok" {
        return Err(ProviderError::Code(body.code));
    }
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("no routes in response".to_string()))?;
    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lon, lat]| (lat, lon))
        .collect())
}
