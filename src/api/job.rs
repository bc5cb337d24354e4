use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_api_key;
use crate::services::SyncReport;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Runs one synchronization inline and returns its report.
///
/// # Endpoint
/// `POST /api/job/run`
///
/// Requires the configured secret in the `x-api-key` header.
pub async fn run_sync(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    let supplied = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    {
        let config = state.config().read().await;
        validate_api_key(supplied, &config.job.api_key)?;
    }

    info!(event = "sync_triggered", trigger = "api", "Sync requested over HTTP");
    let report = state.synchronizer().synchronize().await?;

    Ok(Json(ApiResponse::success(report)))
}
