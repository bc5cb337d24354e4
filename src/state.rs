use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::tvmaze::TvMazeClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmShowService, ShowService, ShowSynchronizer};

/// Build the HTTP client used for catalog fetches.
fn build_shared_http_client(timeout_seconds: u64, user_agent: &str) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub catalog: Arc<TvMazeClient>,

    pub show_service: Arc<dyn ShowService>,

    pub synchronizer: Arc<ShowSynchronizer>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_shared_http_client(
            config.catalog.request_timeout_seconds.into(),
            &config.catalog.user_agent,
        )?;
        let catalog = Arc::new(TvMazeClient::with_shared_client(
            http_client,
            config.catalog.shows_url.clone(),
        ));

        let show_service =
            Arc::new(SeaOrmShowService::new(store.clone())) as Arc<dyn ShowService>;

        let synchronizer = Arc::new(ShowSynchronizer::new(
            catalog.clone(),
            Arc::new(store.clone()),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            catalog,
            show_service,
            synchronizer,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
