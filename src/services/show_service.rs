//! Domain service for reading and editing mirrored shows.
//!
//! Projects the stored aggregate into the flat [`ShowDto`] response shape.

use crate::api::types::{CountryDto, ExternalsDto, NetworkDto, RatingDto, ShowDto, ShowRequest};
use crate::domain::ShowId;
use crate::models::show::Show;
use thiserror::Error;

/// Errors specific to show operations.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error("Show not found: {0}")]
    NotFound(ShowId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Show already exists: {0}")]
    Conflict(ShowId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ShowError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ShowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Domain service trait for shows.
#[async_trait::async_trait]
pub trait ShowService: Send + Sync {
    /// Lists every stored show, ordered by id.
    async fn list_shows(&self) -> Result<Vec<ShowDto>, ShowError>;

    async fn get_show(&self, id: ShowId) -> Result<ShowDto, ShowError>;

    /// Stores a bare show (id, name, language). Nested data is only ever written by a sync run.
    async fn create_show(&self, request: ShowRequest) -> Result<ShowDto, ShowError>;

    /// Replaces name and language. `request.id` must equal `id`.
    async fn update_show(&self, id: ShowId, request: ShowRequest) -> Result<ShowDto, ShowError>;

    async fn delete_show(&self, id: ShowId) -> Result<(), ShowError>;
}

#[must_use]
pub fn show_to_dto(show: Show) -> ShowDto {
    ShowDto {
        id: show.id,
        name: show.name,
        language: show.language,
        genres: show.genres.into_iter().map(|g| g.name).collect(),
        network: show.network.map(|n| NetworkDto {
            id: n.id,
            name: n.name,
            country: n.country.map(|c| CountryDto {
                code: c.code,
                name: c.name,
                timezone: c.timezone,
            }),
        }),
        rating: show.rating.map(|r| RatingDto { average: r.average }),
        externals: show.externals.map(|e| ExternalsDto {
            imdb: e.imdb,
            tvrage: e.tvrage,
            thetvdb: e.thetvdb,
        }),
    }
}
