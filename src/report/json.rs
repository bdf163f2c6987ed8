use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::fields::AnnotationValue;
use crate::model::store::AnnotationStore;
use crate::pipeline::project::{DropdownOptions, Page, ProjectedView};
use crate::report::style::StyleRule;

#[derive(Debug, Serialize)]
pub struct ViewDocument<'a> {
    pub sample_id: &'a str,
    pub columns: Vec<&'a str>,
    /// Cells aligned with `columns`.
    pub rows: Vec<Vec<&'a str>>,
    pub table_rows: usize,
    pub matching_rows: usize,
    pub page: usize,
    pub page_size: usize,
    pub n_pages: usize,
    pub options: &'a DropdownOptions,
    pub styles: &'a [StyleRule],
}

pub fn build_view_document<'a>(
    sample_id: &'a str,
    view: &ProjectedView<'a>,
    page: &Page<'_>,
    options: &'a DropdownOptions,
    styles: &'a [StyleRule],
) -> ViewDocument<'a> {
    let columns = view.column_names();
    let rows = page
        .rows
        .iter()
        .map(|&r| view.row_values(r))
        .collect();
    ViewDocument {
        sample_id,
        columns,
        rows,
        table_rows: view.table.n_rows(),
        matching_rows: view.n_rows(),
        page: page.index,
        page_size: page.size,
        n_pages: page.n_pages,
        options,
        styles,
    }
}

pub fn render_view_json(doc: &ViewDocument<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

#[derive(Debug, Serialize)]
struct AnnotationsDocument<'a> {
    sample_id: &'a str,
    annotations: BTreeMap<&'a str, &'a AnnotationValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    unparsed: BTreeMap<&'a str, &'a serde_json::Value>,
}

pub fn render_annotations_json(
    store: &AnnotationStore,
    sample_id: Option<&str>,
) -> Result<String, serde_json::Error> {
    let ids: Vec<&str> = match sample_id {
        Some(id) => vec![id],
        None => store.sample_ids().collect(),
    };
    let docs: Vec<AnnotationsDocument<'_>> = ids
        .into_iter()
        .map(|id| AnnotationsDocument {
            sample_id: id,
            annotations: store
                .get(id)
                .map(|record| record.iter().collect())
                .unwrap_or_default(),
            unparsed: store
                .get(id)
                .map(|record| record.passthrough().collect())
                .unwrap_or_default(),
        })
        .collect();
    serde_json::to_string_pretty(&docs)
}

pub fn render_plot_json<T: Serialize>(
    kind: &str,
    sample_id: &str,
    data: &[T],
) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct PlotDocument<'a, T: Serialize> {
        kind: &'a str,
        sample_id: &'a str,
        data: &'a [T],
    }
    serde_json::to_string_pretty(&PlotDocument {
        kind,
        sample_id,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
