use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDto {
    pub id: i32,
    pub name: String,
    pub language: Option<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<ExternalsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDto {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryDto {
    pub code: String,
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingDto {
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalsDto {
    pub imdb: Option<String>,
    pub tvrage: Option<i32>,
    pub thetvdb: Option<i32>,
}

/// Body of `POST /api/shows` and `PUT /api/shows/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowRequest {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub sync_running: bool,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
