use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure modes of a catalog fetch.
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    #[error("catalog responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
}

/// One show as published by the upstream catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowRecord {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub externals: Option<ExternalsRecord>,
    #[serde(default)]
    pub rating: Option<RatingRecord>,
    #[serde(default)]
    pub network: Option<NetworkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalsRecord {
    #[serde(default)]
    pub imdb: Option<String>,
    #[serde(default)]
    pub tvrage: Option<i32>,
    #[serde(default)]
    pub thetvdb: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatingRecord {
    #[serde(default)]
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkRecord {
    /// Missing ids decode as 0 rather than failing the whole payload.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub country: Option<CountryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezone: String,
}

impl CountryRecord {
    /// The country code, if present and non-empty.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lower-cases every object key so field matching ignores case.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Decodes a show collection, matching field names case-insensitively.
pub fn parse_shows(body: &str) -> Result<Vec<ShowRecord>, CatalogFetchError> {
    let raw: Value =
        serde_json::from_str(body).map_err(|e| CatalogFetchError::Decode(e.to_string()))?;

    serde_json::from_value(lowercase_keys(raw)).map_err(|e| CatalogFetchError::Decode(e.to_string()))
}

#[derive(Clone)]
pub struct TvMazeClient {
    client: Client,
    shows_url: String,
}

impl TvMazeClient {
    pub fn new(
        shows_url: impl Into<String>,
        timeout_seconds: u64,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build catalog HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, shows_url))
    }

    #[must_use]
    pub fn with_shared_client(client: Client, shows_url: impl Into<String>) -> Self {
        Self {
            client,
            shows_url: shows_url.into(),
        }
    }

    #[must_use]
    pub fn shows_url(&self) -> &str {
        &self.shows_url
    }

    pub async fn fetch_shows(&self) -> Result<Vec<ShowRecord>, CatalogFetchError> {
        let response = self.client.get(&self.shows_url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogFetchError::Status { status, body });
        }

        let body = response.text().await?;
        parse_shows(&body)
    }
}
