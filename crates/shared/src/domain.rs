use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Composite key pinning every catalogue query to one versioned release
/// of a data resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseKey {
    pub resource_acronym: String,
    pub version: String,
}

impl ReleaseKey {
    pub fn new(resource_acronym: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            resource_acronym: resource_acronym.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for ReleaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.resource_acronym, self.version)
    }
}

/// A record that only carries a `name`, the shape the endpoint uses for
/// ontology references (format, unit, match status, keyword parents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub acronym: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub resource: Resource,
    pub version: String,
}

/// Variable record as returned by the list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub release: Release,
    #[serde(default)]
    pub repeats: Vec<NamedRef>,
}

/// Variable record as returned by the detail query, with the mappings
/// targeting it attached before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDetail {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub repeats: Vec<NamedRef>,
    #[serde(default)]
    pub mappings: Vec<VariableMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NamedRef>,
}

/// Source data collection (databank) contributing variables and mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub acronym: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NamedRef>,
}

/// Source side of a mapping: a table scoped to a release. The release's
/// resource acronym identifies the contributing cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedTable {
    pub release: Release,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Target side of a mapping: a catalogue variable, optionally with the
/// table it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingTarget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<MappedTable>,
}

/// Declared correspondence between a cohort table and a catalogue
/// variable, annotated with a match quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMapping {
    pub from_table: MappedTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_variable: Option<MappingTarget>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl VariableMapping {
    /// Acronym of the cohort this mapping comes from.
    pub fn source_cohort(&self) -> &str {
        &self.from_table.release.resource.acronym
    }
}
