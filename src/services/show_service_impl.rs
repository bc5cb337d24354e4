//! `SeaORM` implementation of the `ShowService` trait.

use crate::api::types::{ShowDto, ShowRequest};
use crate::db::Store;
use crate::domain::ShowId;
use crate::models::show::Show;
use crate::services::show_service::{ShowError, ShowService, show_to_dto};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmShowService {
    store: Store,
}

impl SeaOrmShowService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_request(request: &ShowRequest) -> Result<(), ShowError> {
        if request.id <= 0 {
            return Err(ShowError::Validation(format!(
                "Invalid show ID: {}. ID must be a positive integer",
                request.id
            )));
        }
        if request.name.trim().is_empty() {
            return Err(ShowError::Validation("Show name cannot be empty".to_string()));
        }
        Ok(())
    }

    async fn load(&self, id: ShowId) -> Result<ShowDto, ShowError> {
        self.store
            .get_show(id.value())
            .await?
            .map(show_to_dto)
            .ok_or(ShowError::NotFound(id))
    }
}

#[async_trait]
impl ShowService for SeaOrmShowService {
    async fn list_shows(&self) -> Result<Vec<ShowDto>, ShowError> {
        let shows = self.store.list_shows().await?;
        Ok(shows.into_iter().map(show_to_dto).collect())
    }

    async fn get_show(&self, id: ShowId) -> Result<ShowDto, ShowError> {
        self.load(id).await
    }

    async fn create_show(&self, request: ShowRequest) -> Result<ShowDto, ShowError> {
        Self::validate_request(&request)?;
        let id = ShowId::new(request.id);

        if self.store.show_exists(request.id).await? {
            return Err(ShowError::Conflict(id));
        }

        let show = Show::shell(request.id, request.name, request.language);
        self.store.add_show(&show).await?;
        info!(show_id = %id, "Created show");

        Ok(show_to_dto(show))
    }

    async fn update_show(&self, id: ShowId, request: ShowRequest) -> Result<ShowDto, ShowError> {
        if request.id != id.value() {
            return Err(ShowError::Validation(format!(
                "Show ID in body ({}) does not match path ({id})",
                request.id
            )));
        }
        Self::validate_request(&request)?;

        let updated = self
            .store
            .update_show(id.value(), &request.name, request.language.as_deref())
            .await?;
        if !updated {
            return Err(ShowError::NotFound(id));
        }
        info!(show_id = %id, "Updated show");

        self.load(id).await
    }

    async fn delete_show(&self, id: ShowId) -> Result<(), ShowError> {
        if !self.store.remove_show(id.value()).await? {
            return Err(ShowError::NotFound(id));
        }
        info!(show_id = %id, "Deleted show");
        Ok(())
    }
}
