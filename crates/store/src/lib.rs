use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use shared::domain::{Cohort, Keyword, VariableDetail, VariableMapping, VariableSummary};

/// Outcome of the detail-cache check, decided before any network call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailLookup<'a> {
    Cached(&'a VariableDetail),
    Miss,
}

/// Match status per (target variable, source cohort), rederived from the
/// mapping slice on each access. Later mappings overwrite earlier ones
/// when they share a cell.
pub type HarmonizationGrid = HashMap<String, HashMap<String, String>>;

/// In-memory state behind the catalogue views. Each slice is replaced
/// wholesale by its mutation; the variable list and its count are
/// committed together so they cannot observably disagree.
#[derive(Debug, Clone, Default)]
pub struct CatalogueStore {
    variables: Vec<VariableSummary>,
    variable_count: i64,
    variable_details: HashMap<String, VariableDetail>,
    search_input: Option<String>,
    selected_keywords: Vec<String>,
    keywords: Vec<Keyword>,
    cohorts: Vec<Cohort>,
    variable_mappings: Vec<VariableMapping>,
    is_loading: bool,
}

impl CatalogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- mutations ----

    /// Commits the variable list and its total count as one transaction.
    /// A missing list normalizes to empty rather than being stored raw.
    pub fn set_variable_results(&mut self, variables: Option<Vec<VariableSummary>>, count: i64) {
        if variables.is_none() {
            warn!("variable list absent from response, storing empty list");
        }
        self.variables = variables.unwrap_or_default();
        self.variable_count = count;
    }

    /// Appends a detail record under the name it was requested by.
    /// Records are never invalidated within the store's lifetime.
    pub fn insert_variable_detail(&mut self, name: impl Into<String>, detail: VariableDetail) {
        self.variable_details.insert(name.into(), detail);
    }

    /// Stores the search input exactly as entered; trimming happens in
    /// [`CatalogueStore::search_string`].
    pub fn set_search_input(&mut self, input: Option<String>) {
        self.search_input = input;
    }

    /// Adds a keyword to the selection; no-op if already selected.
    pub fn add_keyword_to_selection(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.selected_keywords.contains(&name) {
            self.selected_keywords.push(name);
        }
    }

    /// Removes one keyword by value equality; no-op when absent.
    pub fn remove_keyword_from_selection(&mut self, name: &str) {
        self.selected_keywords.retain(|selected| selected != name);
    }

    pub fn set_selected_keywords<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_keywords.clear();
        for name in names {
            self.add_keyword_to_selection(name);
        }
    }

    pub fn set_keywords(&mut self, keywords: Vec<Keyword>) {
        self.keywords = keywords;
    }

    pub fn set_cohorts(&mut self, cohorts: Vec<Cohort>) {
        self.cohorts = cohorts;
    }

    /// Replaces the mapping slice; a missing list normalizes to empty.
    pub fn set_variable_mappings(&mut self, mappings: Option<Vec<VariableMapping>>) {
        if mappings.is_none() {
            warn!("mapping list absent from response, storing empty list");
        }
        self.variable_mappings = mappings.unwrap_or_default();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    // ---- slice accessors ----

    pub fn variables(&self) -> &[VariableSummary] {
        &self.variables
    }

    pub fn variable_count(&self) -> i64 {
        self.variable_count
    }

    pub fn variable_detail(&self, name: &str) -> Option<&VariableDetail> {
        self.variable_details.get(name)
    }

    pub fn search_input(&self) -> Option<&str> {
        self.search_input.as_deref()
    }

    pub fn selected_keywords(&self) -> &[String] {
        &self.selected_keywords
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn variable_mappings(&self) -> &[VariableMapping] {
        &self.variable_mappings
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    // ---- derived views ----

    /// The search term actually sent to the endpoint: `None` for absent
    /// or all-whitespace input, otherwise the trimmed string.
    pub fn search_string(&self) -> Option<&str> {
        self.search_input
            .as_deref()
            .map(str::trim)
            .filter(|trimmed| !trimmed.is_empty())
    }

    pub fn detail_lookup(&self, name: &str) -> DetailLookup<'_> {
        match self.variable_details.get(name) {
            Some(detail) => DetailLookup::Cached(detail),
            None => DetailLookup::Miss,
        }
    }

    /// Free-form details of one mapping, looked up by variable name and
    /// mapping position. Empty record when any link in the chain is
    /// absent; never fails.
    pub fn mapping_details(&self, name: &str, mapping_index: usize) -> Map<String, Value> {
        self.variable_details
            .get(name)
            .and_then(|detail| detail.mappings.get(mapping_index))
            .and_then(|mapping| mapping.details.clone())
            .unwrap_or_default()
    }

    /// Pivots the flat mapping slice into a grid keyed by target variable
    /// name, then by source cohort acronym, with the match status as the
    /// cell value. Input order decides collisions: later entries win.
    pub fn harmonization_grid(&self) -> HarmonizationGrid {
        let mut grid = HarmonizationGrid::new();
        for mapping in &self.variable_mappings {
            let Some(target) = &mapping.to_variable else {
                continue;
            };
            let Some(status) = &mapping.status else {
                continue;
            };
            grid.entry(target.name.clone())
                .or_default()
                .insert(mapping.source_cohort().to_string(), status.name.clone());
        }
        grid
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
