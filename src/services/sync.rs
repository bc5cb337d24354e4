//! Mirrors the upstream show catalog into the local store.
//!
//! A run fetches the whole collection, skips every show id that is already stored, and
//! builds the remaining shows with their nested rows. Countries, networks and genres are
//! written as soon as they are first needed so that later records (and the final show
//! insert) can reference them; the new shows themselves are staged and written in one
//! transaction at the end of the run.
//!
//! Runs are strictly sequential and never overlap: a second call while one is in flight
//! fails with [`SyncError::AlreadyRunning`].

use crate::clients::tvmaze::{
    CatalogFetchError, CountryRecord, NetworkRecord, ShowRecord, TvMazeClient,
};
use crate::models::show::{Country, Externals, Genre, Network, Rating, Show};
use crate::services::catalog_store::CatalogStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Upstream fetch failed: {message}")]
    UpstreamFetch {
        status: Option<u16>,
        message: String,
    },

    #[error("Upstream payload invalid: {0}")]
    Decode(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("A synchronization run is already in progress")]
    AlreadyRunning,
}

impl From<CatalogFetchError> for SyncError {
    fn from(err: CatalogFetchError) -> Self {
        match err {
            CatalogFetchError::Status { status, .. } => Self::UpstreamFetch {
                status: Some(status),
                message: err.to_string(),
            },
            CatalogFetchError::Transport(_) => Self::UpstreamFetch {
                status: None,
                message: err.to_string(),
            },
            CatalogFetchError::Decode(msg) => Self::Decode(msg),
        }
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// Provides the raw show collection for a run.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, SyncError>;
}

#[async_trait::async_trait]
impl CatalogSource for TvMazeClient {
    async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, SyncError> {
        Ok(Self::fetch_shows(self).await?)
    }
}

/// Outcome of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub countries_created: usize,
    pub networks_created: usize,
    pub genres_created: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    fn new(fetched: usize) -> Self {
        let now = Utc::now();
        Self {
            fetched,
            inserted: 0,
            skipped: 0,
            countries_created: 0,
            networks_created: 0,
            genres_created: 0,
            started_at: now,
            finished_at: now,
        }
    }
}

/// Reference rows already resolved during the current run, keyed by natural key.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    countries: HashMap<String, Country>,
    networks: HashMap<i32, Network>,
    genres: HashMap<String, Genre>,
}

impl ReferenceCache {
    #[must_use]
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    #[must_use]
    pub fn network(&self, id: i32) -> Option<&Network> {
        self.networks.get(&id)
    }

    #[must_use]
    pub fn genre(&self, name: &str) -> Option<&Genre> {
        self.genres.get(name)
    }

    pub fn remember_country(&mut self, country: Country) {
        self.countries.insert(country.code.clone(), country);
    }

    pub fn remember_network(&mut self, network: Network) {
        self.networks.insert(network.id, network);
    }

    pub fn remember_genre(&mut self, genre: Genre) {
        self.genres.insert(genre.name.clone(), genre);
    }
}

/// New shows waiting for the end-of-run flush.
#[derive(Debug, Default)]
pub struct PendingShows {
    shows: Vec<Show>,
    ids: HashSet<i32>,
}

impl PendingShows {
    #[must_use]
    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `false` (and drops the show) if its id is already staged.
    pub fn stage(&mut self, show: Show) -> bool {
        if !self.ids.insert(show.id) {
            return false;
        }
        self.shows.push(show);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub async fn commit(self, store: &dyn CatalogStore) -> anyhow::Result<usize> {
        if self.shows.is_empty() {
            return Ok(0);
        }
        store.insert_shows(&self.shows).await
    }
}

/// State of a single run.
struct SyncRun<'a> {
    store: &'a dyn CatalogStore,
    cache: ReferenceCache,
    pending: PendingShows,
    report: SyncReport,
}

impl<'a> SyncRun<'a> {
    fn new(store: &'a dyn CatalogStore, fetched: usize) -> Self {
        Self {
            store,
            cache: ReferenceCache::default(),
            pending: PendingShows::default(),
            report: SyncReport::new(fetched),
        }
    }

    async fn process(&mut self, record: ShowRecord) -> Result<(), SyncError> {
        if self.pending.contains(record.id) || self.store.show_exists(record.id).await? {
            debug!(show_id = record.id, "Show already present, skipping");
            self.report.skipped += 1;
            metrics::counter!("showsync_shows_skipped_total").increment(1);
            return Ok(());
        }

        let show = self.build_show(record).await?;
        self.pending.stage(show);
        Ok(())
    }

    async fn build_show(&mut self, record: ShowRecord) -> Result<Show, SyncError> {
        let mut show = Show::shell(record.id, record.name, record.language);

        if let Some(ext) = record.externals {
            show.externals = Some(Externals {
                imdb: ext.imdb,
                tvrage: ext.tvrage,
                thetvdb: ext.thetvdb,
            });
        }

        if let Some(rating) = record.rating {
            show.rating = Some(Rating {
                average: rating.average,
            });
        }

        if let Some(network) = record.network {
            let country = match network.country.as_ref() {
                Some(country) if country.code().is_some() => {
                    Some(self.resolve_country(country).await?)
                }
                _ => None,
            };
            show.network = Some(self.resolve_network(&network, country).await?);
        }

        for name in &record.genres {
            let genre = self.resolve_genre(name).await?;
            show.genres.push(genre);
        }

        Ok(show)
    }

    async fn resolve_country(&mut self, record: &CountryRecord) -> Result<Country, SyncError> {
        let code = record.code().unwrap_or_default().to_string();

        if let Some(country) = self.cache.country(&code) {
            return Ok(country.clone());
        }

        let country = if let Some(existing) = self.store.get_country(&code).await? {
            existing
        } else {
            let created = self
                .store
                .create_country(&Country {
                    code: code.clone(),
                    name: record.name.clone(),
                    timezone: record.timezone.clone(),
                })
                .await?;
            self.report.countries_created += 1;
            metrics::counter!("showsync_reference_rows_created_total", "kind" => "country")
                .increment(1);
            debug!(country_code = %code, "Created country");
            created
        };

        self.cache.remember_country(country.clone());
        Ok(country)
    }

    async fn resolve_network(
        &mut self,
        record: &NetworkRecord,
        country: Option<Country>,
    ) -> Result<Network, SyncError> {
        if let Some(network) = self.cache.network(record.id) {
            return Ok(network.clone());
        }

        let network = if let Some(existing) = self.store.get_network(record.id).await? {
            existing
        } else {
            let created = self
                .store
                .create_network(&Network {
                    id: record.id,
                    name: record.name.clone(),
                    country_code: country.as_ref().map(|c| c.code.clone()),
                    country,
                })
                .await?;
            self.report.networks_created += 1;
            metrics::counter!("showsync_reference_rows_created_total", "kind" => "network")
                .increment(1);
            debug!(network_id = record.id, "Created network");
            created
        };

        self.cache.remember_network(network.clone());
        Ok(network)
    }

    async fn resolve_genre(&mut self, name: &str) -> Result<Genre, SyncError> {
        if let Some(genre) = self.cache.genre(name) {
            return Ok(genre.clone());
        }

        let genre = if let Some(existing) = self.store.get_genre_by_name(name).await? {
            existing
        } else {
            let created = self.store.create_genre(name).await?;
            self.report.genres_created += 1;
            metrics::counter!("showsync_reference_rows_created_total", "kind" => "genre")
                .increment(1);
            debug!(genre = %name, "Created genre");
            created
        };

        self.cache.remember_genre(genre.clone());
        Ok(genre)
    }

    async fn finish(self) -> Result<SyncReport, SyncError> {
        let Self {
            store,
            pending,
            mut report,
            ..
        } = self;

        debug!(staged = pending.len(), "Committing staged shows");
        report.inserted = pending.commit(store).await?;
        report.finished_at = Utc::now();
        metrics::counter!("showsync_shows_inserted_total").increment(report.inserted as u64);
        Ok(report)
    }
}

pub struct ShowSynchronizer {
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn CatalogStore>,
    run_lock: Mutex<()>,
}

impl ShowSynchronizer {
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            source,
            store,
            run_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Performs one run. Reference rows created before a failure stay committed.
    pub async fn synchronize(&self) -> Result<SyncReport, SyncError> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!(event = "sync_rejected", "Synchronization already in progress");
            return Err(SyncError::AlreadyRunning);
        };

        let start = std::time::Instant::now();
        info!(event = "sync_started", "Starting show synchronization");

        let result = self.run().await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(report) => {
                metrics::counter!("showsync_sync_runs_total", "outcome" => "success").increment(1);
                info!(
                    event = "sync_finished",
                    fetched = report.fetched,
                    inserted = report.inserted,
                    skipped = report.skipped,
                    genres_created = report.genres_created,
                    networks_created = report.networks_created,
                    countries_created = report.countries_created,
                    duration_ms = duration_ms,
                    "Show synchronization finished"
                );
            }
            Err(e) => {
                metrics::counter!("showsync_sync_runs_total", "outcome" => "failure").increment(1);
                error!(event = "sync_failed", error = %e, duration_ms = duration_ms, "Show synchronization failed");
            }
        }

        result
    }

    async fn run(&self) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let records = self.source.fetch_shows().await?;
        info!("Fetched {} show record(s) from catalog", records.len());

        let mut run = SyncRun::new(self.store.as_ref(), records.len());
        run.report.started_at = started_at;

        for record in records {
            run.process(record).await?;
        }

        run.finish().await
    }
}
