use serde::{Deserialize, Serialize};

/// A television show together with everything it owns or references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub name: String,
    pub language: Option<String>,
    pub genres: Vec<Genre>,
    pub network: Option<Network>,
    pub rating: Option<Rating>,
    pub externals: Option<Externals>,
}

impl Show {
    /// A show with no nested data attached yet.
    #[must_use]
    pub const fn shell(id: i32, name: String, language: Option<String>) -> Self {
        Self {
            id,
            name,
            language,
            genres: Vec::new(),
            network: None,
            rating: None,
            externals: None,
        }
    }

    #[must_use]
    pub fn network_id(&self) -> Option<i32> {
        self.network.as_ref().map(|n| n.id)
    }

    #[must_use]
    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: i32,
    pub name: String,
    pub country_code: Option<String>,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// One-to-one with [`Show`]; keyed by the show id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: Option<f64>,
}

/// One-to-one with [`Show`]; keyed by the show id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Externals {
    pub imdb: Option<String>,
    pub tvrage: Option<i32>,
    pub thetvdb: Option<i32>,
}
