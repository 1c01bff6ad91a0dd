use serde::{Deserialize, Serialize};

use crate::domain::{
    Cohort, Keyword, ReleaseKey, VariableDetail, VariableMapping, VariableSummary,
};

/// Envelope posted to the query endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<V> {
    pub query: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<V>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// `{ equals: [...] }` filter clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EqualsClause<T> {
    pub equals: Vec<T>,
}

impl<T> EqualsClause<T> {
    pub fn one(value: T) -> Self {
        Self {
            equals: vec![value],
        }
    }
}

/// `{ like: [...] }` filter clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeClause {
    pub like: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameEquals {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceEquals {
    pub acronym: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseEquals {
    pub resource: ResourceEquals,
    pub version: String,
}

impl ReleaseEquals {
    pub fn from_key(release: &ReleaseKey) -> Self {
        Self {
            resource: ResourceEquals {
                acronym: release.resource_acronym.clone(),
            },
            version: release.version.clone(),
        }
    }
}

/// Filter for the `Variables` query: always pins the release, optionally
/// constrains keyword membership and exact variable name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariablesFilter {
    pub release: EqualsClause<ReleaseEquals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<EqualsClause<NameEquals>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LikeClause>,
}

impl VariablesFilter {
    pub fn pinned(release: &ReleaseKey) -> Self {
        Self {
            release: EqualsClause::one(ReleaseEquals::from_key(release)),
            keywords: None,
            name: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(EqualsClause {
            equals: names
                .into_iter()
                .map(|name| NameEquals { name: name.into() })
                .collect(),
        });
        self
    }

    pub fn with_name_like(mut self, name: impl Into<String>) -> Self {
        self.name = Some(LikeClause {
            like: vec![name.into()],
        });
        self
    }
}

/// One `(release, name)` pair identifying a mapping target variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingTargetEquals {
    pub release: ReleaseEquals,
    pub name: String,
}

impl MappingTargetEquals {
    pub fn new(release: &ReleaseKey, name: impl Into<String>) -> Self {
        Self {
            release: ReleaseEquals::from_key(release),
            name: name.into(),
        }
    }
}

/// Filter for the `VariableMappings` query, constraining the target side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingsFilter {
    #[serde(rename = "toVariable")]
    pub to_variable: EqualsClause<MappingTargetEquals>,
}

impl MappingsFilter {
    pub fn targeting(targets: Vec<MappingTargetEquals>) -> Self {
        Self {
            to_variable: EqualsClause { equals: targets },
        }
    }
}

/// Filter for the `Databanks` query, constraining the type classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortsFilter {
    #[serde(rename = "type")]
    pub kind: EqualsClause<NameEquals>,
}

impl CohortsFilter {
    pub fn of_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: EqualsClause {
                equals: names
                    .into_iter()
                    .map(|name| NameEquals { name: name.into() })
                    .collect(),
            },
        }
    }
}

/// Variables for the list query: optional full-text search plus filter.
#[derive(Debug, Clone, Serialize)]
pub struct SearchAndFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub filter: VariablesFilter,
}

/// Variables for queries that carry only a `filter` argument.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOnly<F> {
    pub filter: F,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountAgg {
    pub count: i64,
}

/// `data` shape of the combined list + aggregate query.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableListData {
    #[serde(rename = "Variables", default)]
    pub variables: Option<Vec<VariableSummary>>,
    #[serde(rename = "Variables_agg", default)]
    pub variables_agg: Option<CountAgg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDetailData {
    #[serde(rename = "Variables", default)]
    pub variables: Option<Vec<VariableDetail>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappingListData {
    #[serde(rename = "VariableMappings", default)]
    pub mappings: Option<Vec<VariableMapping>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordListData {
    #[serde(rename = "Keywords", default)]
    pub keywords: Option<Vec<Keyword>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohortListData {
    #[serde(rename = "Databanks", default)]
    pub cohorts: Option<Vec<Cohort>>,
}
