use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};
use url::Url;

use shared::{
    domain::{ReleaseKey, VariableDetail},
    protocol::{
        CohortListData, CohortsFilter, FilterOnly, GraphqlRequest, GraphqlResponse,
        KeywordListData, MappingListData, MappingTargetEquals, MappingsFilter, SearchAndFilter,
        VariableDetailData, VariableListData, VariablesFilter,
    },
};
use store::{CatalogueStore, DetailLookup};

pub mod config;
pub mod error;

pub use config::{load_settings, Settings};
pub use error::CatalogueError;

const OP_VARIABLES: &str = "Variables";
const OP_VARIABLE_DETAILS: &str = "VariableDetails";
const OP_VARIABLE_MAPPINGS: &str = "VariableMappings";
const OP_KEYWORDS: &str = "Keywords";
const OP_COHORTS: &str = "Databanks";

const VARIABLES_QUERY: &str = r#"
query Variables($search: String, $filter: VariablesFilter) {
  Variables(limit: 100, search: $search, filter: $filter) {
    name
    release {
      resource {
        acronym
      }
      version
    }
    label
    repeats {
      name
    }
  }
  Variables_agg(search: $search, filter: $filter) {
    count
  }
}"#;

const VARIABLE_DETAILS_QUERY: &str = r#"
query Variables($filter: VariablesFilter) {
  Variables(limit: 1, filter: $filter) {
    name
    label
    format {
      name
    }
    unit {
      name
    }
    description
    repeats {
      name
    }
  }
}"#;

const DETAIL_MAPPINGS_QUERY: &str = r#"
query VariableMappings($filter: VariableMappingsFilter) {
  VariableMappings(filter: $filter) {
    fromTable {
      release {
        resource {
          acronym
        }
        version
      }
      name
    }
    match {
      name
    }
  }
}"#;

const MAPPINGS_QUERY: &str = r#"
query VariableMappings($filter: VariableMappingsFilter) {
  VariableMappings(limit: 100, filter: $filter) {
    fromTable {
      release {
        resource {
          acronym
        }
        version
      }
      name
    }
    toVariable {
      table {
        release {
          resource {
            acronym
          }
          version
        }
        name
      }
      name
    }
    match {
      name
    }
  }
}"#;

const KEYWORDS_QUERY: &str = r#"
query Keywords {
  Keywords {
    name
    definition
    order
    parent {
      name
    }
  }
}"#;

const COHORTS_QUERY: &str = r#"
query Databanks {
  Databanks {
    acronym
    name
    type {
      name
    }
  }
}"#;

const COHORTS_FILTERED_QUERY: &str = r#"
query Databanks($filter: DatabanksFilter) {
  Databanks(filter: $filter) {
    acronym
    name
    type {
      name
    }
  }
}"#;

/// Client for the harmonization variable catalogue. Owns the store its
/// fetches commit into; exclusive access through `&mut self` sequences
/// fetches per client, so a superseded response can never land after a
/// newer one.
pub struct CatalogueClient {
    http: Client,
    endpoint: Url,
    release: ReleaseKey,
    pub store: CatalogueStore,
}

impl CatalogueClient {
    pub fn new(settings: &Settings) -> Result<Self, CatalogueError> {
        Ok(Self::with_endpoint(
            settings.endpoint()?,
            settings.release_key(),
        ))
    }

    pub fn with_endpoint(endpoint: Url, release: ReleaseKey) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            release,
            store: CatalogueStore::new(),
        }
    }

    pub fn release(&self) -> &ReleaseKey {
        &self.release
    }

    /// Fetches up to 100 variables matching the current selection state
    /// plus the total match count, committing both in one transaction.
    /// The loading flag is cleared on success and on failure alike.
    pub async fn fetch_variables(&mut self) -> Result<(), CatalogueError> {
        self.store.set_loading(true);
        let result = self.fetch_variables_inner().await;
        self.store.set_loading(false);
        result
    }

    async fn fetch_variables_inner(&mut self) -> Result<(), CatalogueError> {
        let mut filter = VariablesFilter::pinned(&self.release);
        if !self.store.selected_keywords().is_empty() {
            filter = filter.with_keywords(self.store.selected_keywords().iter().cloned());
        }
        let variables = SearchAndFilter {
            search: self.store.search_string().map(str::to_owned),
            filter,
        };

        let data: VariableListData = self
            .post_query(OP_VARIABLES, VARIABLES_QUERY, Some(variables))
            .await?;
        let count = data.variables_agg.map(|agg| agg.count).unwrap_or_default();
        self.store.set_variable_results(data.variables, count);
        Ok(())
    }

    /// Returns the detail record for `name`, serving it from the store
    /// when already fetched. A miss issues exactly two queries: the
    /// variable record, then the mappings targeting it, attached to the
    /// record before it is stored. A variable the endpoint does not know
    /// fails fast with [`CatalogueError::VariableNotFound`].
    pub async fn fetch_variable_details(
        &mut self,
        name: &str,
    ) -> Result<VariableDetail, CatalogueError> {
        if let DetailLookup::Cached(detail) = self.store.detail_lookup(name) {
            debug!(variable = name, "variable detail served from cache");
            return Ok(detail.clone());
        }

        let filter = VariablesFilter::pinned(&self.release).with_name_like(name);
        let data: VariableDetailData = self
            .post_query(OP_VARIABLE_DETAILS, VARIABLE_DETAILS_QUERY, Some(FilterOnly { filter }))
            .await?;
        let mut detail = data
            .variables
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| CatalogueError::VariableNotFound {
                name: name.to_string(),
                release: self.release.to_string(),
            })?;

        let filter = MappingsFilter::targeting(vec![MappingTargetEquals::new(
            &self.release,
            detail.name.clone(),
        )]);
        let mappings: MappingListData = self
            .post_query(OP_VARIABLE_MAPPINGS, DETAIL_MAPPINGS_QUERY, Some(FilterOnly { filter }))
            .await?;
        detail.mappings = mappings.mappings.unwrap_or_default();

        self.store.insert_variable_detail(name, detail.clone());
        Ok(detail)
    }

    /// Fetches the full keyword taxonomy, parent references included.
    pub async fn fetch_keywords(&mut self) -> Result<(), CatalogueError> {
        let data: KeywordListData = self
            .post_query(OP_KEYWORDS, KEYWORDS_QUERY, None::<()>)
            .await?;
        self.store.set_keywords(data.keywords.unwrap_or_default());
        Ok(())
    }

    /// Fetches all cohorts with their type classification.
    pub async fn fetch_cohorts(&mut self) -> Result<(), CatalogueError> {
        let data: CohortListData = self
            .post_query(OP_COHORTS, COHORTS_QUERY, None::<()>)
            .await?;
        self.store.set_cohorts(data.cohorts.unwrap_or_default());
        Ok(())
    }

    /// Fetches only cohorts whose type matches one of `types`.
    pub async fn fetch_cohorts_of_types<I, S>(&mut self, types: I) -> Result<(), CatalogueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = CohortsFilter::of_types(types);
        let data: CohortListData = self
            .post_query(OP_COHORTS, COHORTS_FILTERED_QUERY, Some(FilterOnly { filter }))
            .await?;
        self.store.set_cohorts(data.cohorts.unwrap_or_default());
        Ok(())
    }

    /// Fetches the mappings targeting the currently loaded variables.
    /// An empty variable list commits an empty mapping slice without
    /// touching the network: no selection means no mappings, never the
    /// unfiltered global default.
    pub async fn fetch_mappings(&mut self) -> Result<(), CatalogueError> {
        if self.store.variables().is_empty() {
            self.store.set_variable_mappings(Some(Vec::new()));
            return Ok(());
        }

        let targets = self
            .store
            .variables()
            .iter()
            .map(|variable| MappingTargetEquals::new(&self.release, variable.name.clone()))
            .collect();
        let filter = MappingsFilter::targeting(targets);
        let data: MappingListData = self
            .post_query(OP_VARIABLE_MAPPINGS, MAPPINGS_QUERY, Some(FilterOnly { filter }))
            .await?;
        self.store.set_variable_mappings(data.mappings);
        Ok(())
    }

    async fn post_query<V, T>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Option<V>,
    ) -> Result<T, CatalogueError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| {
                error!(operation, error = %source, "catalogue query transport failure");
                CatalogueError::Transport { operation, source }
            })?;

        let envelope: GraphqlResponse<T> = response.json().await.map_err(|source| {
            if source.is_decode() {
                error!(operation, error = %source, "catalogue response body unusable");
                CatalogueError::MalformedResponse {
                    operation,
                    message: source.to_string(),
                }
            } else {
                error!(operation, error = %source, "catalogue query transport failure");
                CatalogueError::Transport { operation, source }
            }
        })?;

        if let Some(first) = envelope.errors.first() {
            warn!(operation, message = %first.message, "catalogue query rejected");
            return Err(CatalogueError::Query {
                operation,
                message: first.message.clone(),
            });
        }

        envelope.data.ok_or_else(|| CatalogueError::MalformedResponse {
            operation,
            message: "response carried neither data nor errors".to_string(),
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
