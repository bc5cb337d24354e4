use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ShowDto, ShowRequest};
use crate::api::validation::validate_show_id;

pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ShowDto>>>, ApiError> {
    let shows = state.show_service().list_shows().await?;
    Ok(Json(ApiResponse::success(shows)))
}

pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ShowDto>>, ApiError> {
    let id = validate_show_id(id)?;
    let show = state.show_service().get_show(id).await?;
    Ok(Json(ApiResponse::success(show)))
}

/// Responds `201 Created` with a `Location` header pointing at the new show.
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ShowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_show_id(payload.id)?;
    let show = state.show_service().create_show(payload).await?;
    let location = format!("/api/shows/{}", show.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(show)),
    ))
}

pub async fn update_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ShowRequest>,
) -> Result<StatusCode, ApiError> {
    let id = validate_show_id(id)?;
    state.show_service().update_show(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_show_id(id)?;
    state.show_service().delete_show(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
