use std::{collections::HashMap, fs};

use url::Url;

use shared::domain::ReleaseKey;

use crate::error::CatalogueError;

/// Runtime settings for the catalogue client: where the query endpoint
/// lives and which release every query is pinned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub graphql_url: String,
    pub resource_acronym: String,
    pub resource_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:8080/graphql".into(),
            resource_acronym: "LifeCycle".into(),
            resource_version: "1.0.0".into(),
        }
    }
}

impl Settings {
    pub fn release_key(&self) -> ReleaseKey {
        ReleaseKey::new(&self.resource_acronym, &self.resource_version)
    }

    pub fn endpoint(&self) -> Result<Url, CatalogueError> {
        Url::parse(&self.graphql_url).map_err(|source| CatalogueError::InvalidEndpoint {
            url: self.graphql_url.clone(),
            source,
        })
    }
}

/// Loads settings from defaults, then `catalogue.toml` in the working
/// directory, then environment variables. Missing or unparsable sources
/// fall back silently to the previous layer.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("catalogue.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("graphql_url") {
                settings.graphql_url = v.clone();
            }
            if let Some(v) = file_cfg.get("resource_acronym") {
                settings.resource_acronym = v.clone();
            }
            if let Some(v) = file_cfg.get("resource_version") {
                settings.resource_version = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("CATALOGUE_GRAPHQL_URL") {
        settings.graphql_url = v;
    }
    if let Ok(v) = std::env::var("CATALOGUE_RESOURCE_ACRONYM") {
        settings.resource_acronym = v;
    }
    if let Ok(v) = std::env::var("CATALOGUE_RESOURCE_VERSION") {
        settings.resource_version = v;
    }

    settings
}
