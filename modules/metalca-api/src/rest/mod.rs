pub mod upload;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use openlca_client::{OpenLcaError, DATABASES_TIMEOUT};

use crate::envelope::{DatasetEnvelope, EngineStatus};
use crate::AppState;

/// The availability check answers fast; the dataset listing waits longer.
const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Deserialize)]
pub struct DatasetsQuery {
    source: Option<String>,
}

pub async fn api_check_openlca(State(state): State<Arc<AppState>>) -> Json<EngineStatus> {
    match state.engine.fetch_databases(CHECK_TIMEOUT).await {
        Ok(databases) => Json(EngineStatus::available(databases)),
        Err(OpenLcaError::Api { status, .. }) => {
            warn!(status, "OpenLCA availability check got a non-200");
            Json(EngineStatus::unavailable("OpenLCA API not responding"))
        }
        Err(e) => {
            warn!(error = %e, "OpenLCA availability check failed");
            Json(EngineStatus::unavailable("OpenLCA not running"))
        }
    }
}

pub async fn api_datasets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DatasetsQuery>,
) -> impl IntoResponse {
    let source = params.source.as_deref().unwrap_or("builtin");

    match state.resolver.resolve(source).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            warn!(source, error = %e, "Failed to resolve dataset");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DatasetEnvelope::failure(format!("Error loading dataset: {e}"))),
            )
                .into_response()
        }
    }
}

pub async fn api_openlca_databases(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    match state.engine.fetch_databases(DATABASES_TIMEOUT).await {
        Ok(databases) => Json(json!({ "success": true, "databases": databases })),
        Err(OpenLcaError::Api { .. }) => {
            Json(json!({ "success": false, "message": "Could not fetch databases" }))
        }
        Err(e) => {
            warn!(error = %e, "Failed to list OpenLCA databases");
            Json(json!({ "success": false, "message": e.to_string() }))
        }
    }
}

/// Processes "of" a database. The engine only serves its active database, so
/// the path segment is echoed back without being used to filter.
pub async fn api_openlca_processes(
    State(state): State<Arc<AppState>>,
    Path(database): Path<String>,
) -> Json<serde_json::Value> {
    match state.engine.fetch_process_descriptors().await {
        Ok(processes) => Json(json!({
            "success": true,
            "database": database,
            "count": processes.len(),
            "processes": processes,
        })),
        Err(OpenLcaError::Api { .. }) => {
            Json(json!({ "success": false, "message": "Could not fetch processes" }))
        }
        Err(e) => {
            warn!(database = %database, error = %e, "Failed to list OpenLCA processes");
            Json(json!({ "success": false, "message": e.to_string() }))
        }
    }
}
