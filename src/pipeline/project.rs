use std::collections::BTreeSet;

use serde::Serialize;

use crate::input::maf::{MafField, MutationTable};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Column choices and filter values of the active session. Empty filter
/// sets impose no restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub columns: Vec<String>,
    pub genes: BTreeSet<String>,
    pub classifications: BTreeSet<String>,
    pub clusters: BTreeSet<String>,
    pub page_size: usize,
    pub page: usize,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            genes: BTreeSet::new(),
            classifications: BTreeSet::new(),
            clusters: BTreeSet::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
        }
    }
}

impl FilterSelection {
    /// Same column choices and page size, filters cleared.
    pub fn reset_filters(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            page_size: self.page_size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectedView<'a> {
    pub table: &'a MutationTable,
    pub columns: Vec<usize>,
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'v> {
    pub index: usize,
    pub size: usize,
    pub n_pages: usize,
    pub first_row: usize,
    pub rows: &'v [usize],
}

impl<'a> ProjectedView<'a> {
    pub fn column_names(&self) -> Vec<&'a str> {
        let names = self.table.table.columns();
        self.columns.iter().map(|&c| names[c].as_str()).collect()
    }

    pub fn row_values(&self, row: usize) -> Vec<&'a str> {
        let table = self.table;
        self.columns
            .iter()
            .map(|&c| table.table.value(row, c))
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Zero-based page; a page past the end holds no rows.
    pub fn page(&self, index: usize, size: usize) -> Page<'_> {
        let size = size.max(1);
        let n_pages = self.rows.len().div_ceil(size);
        let start = index.saturating_mul(size).min(self.rows.len());
        let end = start.saturating_add(size).min(self.rows.len());
        Page {
            index,
            size,
            n_pages,
            first_row: start,
            rows: &self.rows[start..end],
        }
    }
}

/// Default columns first, then user-selected ones, in first-seen order
/// without duplicates. Names absent from the table are dropped. Default
/// entries may list `|`-separated alternative spellings.
pub fn visible_columns(
    table: &MutationTable,
    defaults: &[String],
    selected: &[String],
) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::with_capacity(defaults.len() + selected.len());
    let resolved_defaults = defaults
        .iter()
        .map(|alias| (alias, table.table.resolve_alias(alias)));
    let resolved_selected = selected
        .iter()
        .map(|name| (name, table.table.column_index(name)));
    for (name, col) in resolved_defaults.chain(resolved_selected) {
        match col {
            Some(c) if !out.contains(&c) => out.push(c),
            Some(_) => {}
            None => tracing::debug!(
                "column {} not present in {}; omitted",
                name,
                table.path.display()
            ),
        }
    }
    out
}

/// Indices of rows passing every non-empty filter, in table order.
pub fn visible_rows(
    table: &MutationTable,
    genes: &BTreeSet<String>,
    classifications: &BTreeSet<String>,
    clusters: &BTreeSet<String>,
) -> Vec<usize> {
    let filters = [
        (MafField::Gene, genes),
        (MafField::Classification, classifications),
        (MafField::Cluster, clusters),
    ];
    (0..table.n_rows())
        .filter(|&row| {
            filters.iter().all(|(field, allowed)| {
                allowed.is_empty()
                    || table
                        .attribute(row, *field)
                        .is_some_and(|value| allowed.contains(value))
            })
        })
        .collect()
}

pub fn project<'a>(
    table: &'a MutationTable,
    defaults: &[String],
    selection: &FilterSelection,
) -> ProjectedView<'a> {
    let columns = visible_columns(table, defaults, &selection.columns);
    let rows = visible_rows(
        table,
        &selection.genes,
        &selection.classifications,
        &selection.clusters,
    );
    tracing::debug!(
        "projected {} of {} rows onto {} columns",
        rows.len(),
        table.n_rows(),
        columns.len()
    );
    ProjectedView {
        table,
        columns,
        rows,
    }
}

/// Choices offered by the column and filter dropdowns, always derived from
/// the full table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropdownOptions {
    pub columns: Vec<String>,
    pub genes: Vec<String>,
    pub classifications: Vec<String>,
    pub clusters: Vec<String>,
}

pub fn dropdown_options(table: &MutationTable) -> DropdownOptions {
    let mut clusters = unique_values(table, MafField::Cluster);
    sort_clusters(&mut clusters);
    DropdownOptions {
        columns: table.table.columns().to_vec(),
        genes: unique_values(table, MafField::Gene),
        classifications: unique_values(table, MafField::Classification),
        clusters,
    }
}

fn unique_values(table: &MutationTable, field: MafField) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for row in 0..table.n_rows() {
        if let Some(value) = table.attribute(row, field) {
            if !value.is_empty() && seen.insert(value) {
                out.push(value.to_string());
            }
        }
    }
    out
}

/// Numeric order when every label is a number, lexicographic otherwise.
pub fn sort_clusters(clusters: &mut [String]) {
    let as_number = |c: &String| c.parse::<f64>().unwrap_or(f64::NAN);
    if clusters.iter().all(|c| c.parse::<f64>().is_ok()) {
        clusters.sort_by(|a, b| as_number(a).total_cmp(&as_number(b)));
    } else {
        clusters.sort();
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/project.rs"]
mod tests;
