//! Shared reference rows (countries, networks, genres) that many shows point at.

use crate::entities::{countries, genres, networks, prelude::*};
use crate::models::show::{Country, Genre, Network};
use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub struct ReferenceRepository {
    conn: DatabaseConnection,
}

impl ReferenceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub(crate) fn map_country(model: countries::Model) -> Country {
        Country {
            code: model.code,
            name: model.name,
            timezone: model.timezone,
        }
    }

    pub(crate) fn map_network(model: networks::Model, country: Option<countries::Model>) -> Network {
        Network {
            id: model.id,
            name: model.name,
            country_code: model.country_code,
            country: country.map(Self::map_country),
        }
    }

    pub(crate) fn map_genre(model: genres::Model) -> Genre {
        Genre {
            id: model.id,
            name: model.name,
        }
    }

    pub async fn get_country(&self, code: &str) -> Result<Option<Country>> {
        let model = Countries::find_by_id(code.to_string())
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_country))
    }

    pub async fn get_network(&self, id: i32) -> Result<Option<Network>> {
        let row = Networks::find_by_id(id)
            .find_also_related(countries::Entity)
            .one(&self.conn)
            .await?;
        Ok(row.map(|(network, country)| Self::map_network(network, country)))
    }

    pub async fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let model = Genres::find()
            .filter(genres::Column::Name.eq(name))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::map_genre))
    }

    pub async fn create_country(&self, country: &Country) -> Result<Country> {
        let active_model = countries::ActiveModel {
            code: Set(country.code.clone()),
            name: Set(country.name.clone()),
            timezone: Set(country.timezone.clone()),
        };

        Countries::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(country.clone())
    }

    pub async fn create_network(&self, network: &Network) -> Result<Network> {
        let active_model = networks::ActiveModel {
            id: Set(network.id),
            name: Set(network.name.clone()),
            country_code: Set(network.country_code.clone()),
        };

        Networks::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(network.clone())
    }

    pub async fn create_genre(&self, name: &str) -> Result<Genre> {
        let model = genres::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(Self::map_genre(model))
    }
}
