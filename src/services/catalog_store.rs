//! Persistence operations the show synchronizer depends on.
//!
//! Lookups return `Ok(None)` when nothing matches; absence means "create it", not failure.

use crate::db::Store;
use crate::models::show::{Country, Genre, Network, Show};
use anyhow::Result;

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Existence check only; does not load the show's nested rows.
    async fn show_exists(&self, id: i32) -> Result<bool>;

    async fn get_country(&self, code: &str) -> Result<Option<Country>>;

    async fn get_network(&self, id: i32) -> Result<Option<Network>>;

    async fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>>;

    /// Persists immediately so later inserts can reference the code.
    async fn create_country(&self, country: &Country) -> Result<Country>;

    /// Persists immediately so later inserts can reference the id.
    async fn create_network(&self, network: &Network) -> Result<Network>;

    /// Persists immediately and returns the row with its generated id.
    async fn create_genre(&self, name: &str) -> Result<Genre>;

    /// Writes a batch of fully linked shows in one flush; returns how many were written.
    async fn insert_shows(&self, shows: &[Show]) -> Result<usize>;
}

#[async_trait::async_trait]
impl CatalogStore for Store {
    async fn show_exists(&self, id: i32) -> Result<bool> {
        Self::show_exists(self, id).await
    }

    async fn get_country(&self, code: &str) -> Result<Option<Country>> {
        Self::get_country(self, code).await
    }

    async fn get_network(&self, id: i32) -> Result<Option<Network>> {
        Self::get_network(self, id).await
    }

    async fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        Self::get_genre_by_name(self, name).await
    }

    async fn create_country(&self, country: &Country) -> Result<Country> {
        Self::create_country(self, country).await
    }

    async fn create_network(&self, network: &Network) -> Result<Network> {
        Self::create_network(self, network).await
    }

    async fn create_genre(&self, name: &str) -> Result<Genre> {
        Self::create_genre(self, name).await
    }

    async fn insert_shows(&self, shows: &[Show]) -> Result<usize> {
        self.add_shows(shows).await
    }
}
