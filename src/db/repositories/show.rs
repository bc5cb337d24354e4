use crate::db::repositories::reference::ReferenceRepository;
use crate::entities::{countries, externals, genres, networks, prelude::*, ratings, show_genres, shows};
use crate::models::show::{Externals as ShowExternals, Genre, Network, Rating, Show};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Keeps `IN (...)` lists below SQLite's bound-parameter limit.
const ID_CHUNK: usize = 500;

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Eagerly loads network (with country), rating, externals and genres for each row.
    async fn load_aggregates(&self, models: Vec<shows::Model>) -> Result<Vec<Show>> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let network_ids: Vec<i32> = models
            .iter()
            .filter_map(|m| m.network_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut rating_map: HashMap<i32, Rating> = HashMap::new();
        let mut externals_map: HashMap<i32, ShowExternals> = HashMap::new();
        let mut genre_map: HashMap<i32, Vec<Genre>> = HashMap::new();
        let mut network_map: HashMap<i32, Network> = HashMap::new();

        for chunk in ids.chunks(ID_CHUNK) {
            let rows = Ratings::find()
                .filter(ratings::Column::Id.is_in(chunk.to_vec()))
                .all(&self.conn)
                .await?;
            for row in rows {
                rating_map.insert(row.id, Rating { average: row.average });
            }

            let rows = Externals::find()
                .filter(externals::Column::Id.is_in(chunk.to_vec()))
                .all(&self.conn)
                .await?;
            for row in rows {
                externals_map.insert(
                    row.id,
                    ShowExternals {
                        imdb: row.imdb,
                        tvrage: row.tvrage,
                        thetvdb: row.thetvdb,
                    },
                );
            }

            let rows = ShowGenres::find()
                .filter(show_genres::Column::ShowId.is_in(chunk.to_vec()))
                .find_also_related(genres::Entity)
                .order_by_asc(genres::Column::Name)
                .all(&self.conn)
                .await?;
            for (link, genre) in rows {
                if let Some(genre) = genre {
                    genre_map
                        .entry(link.show_id)
                        .or_default()
                        .push(ReferenceRepository::map_genre(genre));
                }
            }
        }

        for chunk in network_ids.chunks(ID_CHUNK) {
            let rows = Networks::find()
                .filter(networks::Column::Id.is_in(chunk.to_vec()))
                .find_also_related(countries::Entity)
                .all(&self.conn)
                .await?;
            for (network, country) in rows {
                network_map.insert(network.id, ReferenceRepository::map_network(network, country));
            }
        }

        Ok(models
            .into_iter()
            .map(|model| Show {
                id: model.id,
                name: model.name,
                language: model.language,
                genres: genre_map.remove(&model.id).unwrap_or_default(),
                network: model
                    .network_id
                    .and_then(|id| network_map.get(&id).cloned()),
                rating: rating_map.remove(&model.id),
                externals: externals_map.remove(&model.id),
            })
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Show>> {
        let Some(model) = Shows::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        Ok(self.load_aggregates(vec![model]).await?.pop())
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(Shows::find_by_id(id).one(&self.conn).await?.is_some())
    }

    pub async fn list_all(&self) -> Result<Vec<Show>> {
        let models = Shows::find()
            .order_by_asc(shows::Column::Id)
            .all(&self.conn)
            .await?;

        self.load_aggregates(models).await
    }

    /// Writes the show row plus its owned rows; referenced networks and genres must already exist.
    async fn insert_with<C: ConnectionTrait>(conn: &C, show: &Show) -> Result<()> {
        Shows::insert(shows::ActiveModel {
            id: Set(show.id),
            name: Set(show.name.clone()),
            language: Set(show.language.clone()),
            network_id: Set(show.network_id()),
        })
        .exec_without_returning(conn)
        .await?;

        if let Some(rating) = &show.rating {
            Ratings::insert(ratings::ActiveModel {
                id: Set(show.id),
                average: Set(rating.average),
            })
            .exec_without_returning(conn)
            .await?;
        }

        if let Some(ext) = &show.externals {
            Externals::insert(externals::ActiveModel {
                id: Set(show.id),
                imdb: Set(ext.imdb.clone()),
                tvrage: Set(ext.tvrage),
                thetvdb: Set(ext.thetvdb),
            })
            .exec_without_returning(conn)
            .await?;
        }

        let mut seen = HashSet::new();
        let links: Vec<show_genres::ActiveModel> = show
            .genres
            .iter()
            .filter(|g| seen.insert(g.id))
            .map(|g| show_genres::ActiveModel {
                show_id: Set(show.id),
                genre_id: Set(g.id),
            })
            .collect();

        if !links.is_empty() {
            ShowGenres::insert_many(links)
                .exec_without_returning(conn)
                .await?;
        }

        Ok(())
    }

    pub async fn insert(&self, show: &Show) -> Result<()> {
        self.insert_many(std::slice::from_ref(show)).await?;
        Ok(())
    }

    /// Inserts every show in one transaction; either all rows land or none do.
    pub async fn insert_many(&self, shows: &[Show]) -> Result<usize> {
        if shows.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;
        for show in shows {
            Self::insert_with(&txn, show).await?;
        }
        txn.commit().await?;

        info!("Inserted {} show(s)", shows.len());
        Ok(shows.len())
    }

    pub async fn update(&self, id: i32, name: &str, language: Option<&str>) -> Result<bool> {
        let result = Shows::update_many()
            .col_expr(shows::Column::Name, Expr::value(name))
            .col_expr(
                shows::Column::Language,
                Expr::value(language.map(str::to_string)),
            )
            .filter(shows::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        ShowGenres::delete_many()
            .filter(show_genres::Column::ShowId.eq(id))
            .exec(&txn)
            .await?;
        Ratings::delete_by_id(id).exec(&txn).await?;
        Externals::delete_by_id(id).exec(&txn).await?;

        let result = Shows::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed show with ID: {}", id);
        }
        Ok(removed)
    }
}
