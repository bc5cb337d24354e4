use crate::models::show::{Country, Genre, Network, Show};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory database opens a fresh, empty one.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn reference_repo(&self) -> repositories::reference::ReferenceRepository {
        repositories::reference::ReferenceRepository::new(self.conn.clone())
    }

    // ========== Show Repository Methods ==========

    pub async fn get_show(&self, id: i32) -> Result<Option<Show>> {
        self.show_repo().get(id).await
    }

    pub async fn show_exists(&self, id: i32) -> Result<bool> {
        self.show_repo().exists(id).await
    }

    pub async fn list_shows(&self) -> Result<Vec<Show>> {
        self.show_repo().list_all().await
    }

    pub async fn add_show(&self, show: &Show) -> Result<()> {
        self.show_repo().insert(show).await
    }

    pub async fn add_shows(&self, shows: &[Show]) -> Result<usize> {
        self.show_repo().insert_many(shows).await
    }

    pub async fn update_show(&self, id: i32, name: &str, language: Option<&str>) -> Result<bool> {
        self.show_repo().update(id, name, language).await
    }

    pub async fn remove_show(&self, id: i32) -> Result<bool> {
        self.show_repo().remove(id).await
    }

    // ========== Reference Data Methods ==========

    pub async fn get_country(&self, code: &str) -> Result<Option<Country>> {
        self.reference_repo().get_country(code).await
    }

    pub async fn get_network(&self, id: i32) -> Result<Option<Network>> {
        self.reference_repo().get_network(id).await
    }

    pub async fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        self.reference_repo().get_genre_by_name(name).await
    }

    pub async fn create_country(&self, country: &Country) -> Result<Country> {
        self.reference_repo().create_country(country).await
    }

    pub async fn create_network(&self, network: &Network) -> Result<Network> {
        self.reference_repo().create_network(network).await
    }

    pub async fn create_genre(&self, name: &str) -> Result<Genre> {
        self.reference_repo().create_genre(name).await
    }
}
