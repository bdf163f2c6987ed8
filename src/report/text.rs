use std::fmt::Write;

use crate::input::SampleRecord;
use crate::model::fields::FieldKind;
use crate::model::store::AnnotationStore;
use crate::model::session::PendingEdit;
use crate::pipeline::plots::{AlleleFractionPoint, HistogramBin, ProfileSegment};
use crate::pipeline::project::{DropdownOptions, Page, ProjectedView};
use crate::report::format_f64;

const MAX_CELL_WIDTH: usize = 40;

pub fn render_view_text(sample_id: &str, view: &ProjectedView<'_>, page: &Page<'_>) -> String {
    let mut out = String::new();
    let header = view.column_names();
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|&r| view.row_values(r).into_iter().map(clip).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| clip(h).chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let _ = writeln!(out, "Sample: {sample_id}");
    push_row(&mut out, header.iter().map(|h| clip(h)), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.into_iter(), &widths);
    for row in rows {
        push_row(&mut out, row.into_iter(), &widths);
    }

    let _ = writeln!(out, "{}", page_footer(view, page));
    out
}

pub fn page_footer(view: &ProjectedView<'_>, page: &Page<'_>) -> String {
    let total = view.table.n_rows();
    if page.rows.is_empty() {
        return format!(
            "No rows on page {} ({} of {} mutations match)",
            page.index + 1,
            view.n_rows(),
            total
        );
    }
    format!(
        "Rows {}-{} of {} (page {}/{}); {} mutations in table",
        page.first_row + 1,
        page.first_row + page.rows.len(),
        view.n_rows(),
        page.index + 1,
        page.n_pages,
        total
    )
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut s: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
    s.push_str("...");
    s
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Every matching row of the view, tab-separated, ignoring paging.
pub fn render_view_tsv(view: &ProjectedView<'_>) -> String {
    let mut out = view.column_names().join("\t");
    out.push('\n');
    for &row in &view.rows {
        out.push_str(&view.row_values(row).join("\t"));
        out.push('\n');
    }
    out
}

pub fn render_options_text(options: &DropdownOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Columns: {}", options.columns.join(", "));
    let _ = writeln!(out, "Hugo symbols: {}", options.genes.join(", "));
    let _ = writeln!(
        out,
        "Variant classifications: {}",
        options.classifications.join(", ")
    );
    let _ = writeln!(out, "Cluster assignments: {}", options.clusters.join(", "));
    out
}

/// Selected manifest metadata for one sample; all metadata when `columns`
/// is empty. Absent columns are skipped.
pub fn render_summary_text(sample: &SampleRecord, columns: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Data Summary", sample.id);
    let entries: Vec<(&str, &str)> = if columns.is_empty() {
        sample
            .metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    } else {
        columns
            .iter()
            .filter_map(|c| sample.metadata_value(c).map(|v| (c.as_str(), v)))
            .collect()
    };
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in entries {
        let _ = writeln!(out, "  {key:<width$}  {value}");
    }
    if let Some(path) = &sample.maf_path {
        let _ = writeln!(out, "  mutations: {}", path.display());
    }
    if let Some(path) = &sample.segment_path {
        let _ = writeln!(out, "  segments: {}", path.display());
    }
    out
}

pub fn render_fields_text(store: &AnnotationStore) -> String {
    let mut out = String::new();
    for field in store.fields() {
        let detail = match &field.kind {
            FieldKind::Number { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("{} <= x <= {}", format_f64(*lo), format_f64(*hi)),
                (Some(lo), None) => format!("x >= {}", format_f64(*lo)),
                (None, Some(hi)) => format!("x <= {}", format_f64(*hi)),
                (None, None) => "any number".to_string(),
            },
            FieldKind::Categorical { options } => format!("one of [{}]", options.join(", ")),
            FieldKind::Text => "free text".to_string(),
            FieldKind::List { options } if options.is_empty() => "comma-separated list".to_string(),
            FieldKind::List { options } => format!("list of [{}]", options.join(", ")),
        };
        let _ = writeln!(out, "{} ({}): {}", field.name, field.kind.label(), detail);
    }
    out
}

/// Annotations for one sample, or for every annotated sample.
pub fn render_annotations_text(store: &AnnotationStore, sample_id: Option<&str>) -> String {
    let mut out = String::new();
    let ids: Vec<&str> = match sample_id {
        Some(id) => vec![id],
        None => store.sample_ids().collect(),
    };
    if ids.is_empty() {
        out.push_str("No annotations recorded\n");
        return out;
    }
    for id in ids {
        match store.get(id) {
            Some(record) if !record.is_empty() => {
                let _ = writeln!(out, "{id}");
                for field in store.fields() {
                    if let Some(value) = record.get(&field.name) {
                        let _ = writeln!(out, "  {}: {}", field.name, value);
                    }
                }
                for (name, value) in record.iter() {
                    if store.field(name).is_none() {
                        let _ = writeln!(out, "  {name}: {value} (unregistered)");
                    }
                }
                for (name, raw) in record.passthrough() {
                    let _ = writeln!(out, "  {name}: {raw} (unparsed)");
                }
            }
            _ => {
                let _ = writeln!(out, "{id}: not annotated");
            }
        }
    }
    out
}

pub fn render_pending_text(pending: &PendingEdit) -> String {
    let mut out = String::new();
    if pending.is_empty() {
        out.push_str("No pending edits\n");
        return out;
    }
    out.push_str("Pending edits:\n");
    for (field, value) in pending.values() {
        let _ = writeln!(out, "  {field} = {value}");
    }
    out
}

pub fn render_allele_fraction_tsv(points: &[AlleleFractionPoint]) -> String {
    let mut out = String::from("row\tgene\tchromosome\tposition\tgenome_position\ttumor_f\tcluster\n");
    for p in points {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            p.row,
            p.gene,
            p.chromosome,
            p.position,
            p.genome_position,
            format_f64(p.tumor_f),
            p.cluster.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn render_profile_tsv(segments: &[ProfileSegment]) -> String {
    let mut out = String::from(
        "chromosome\tgenome_start\tgenome_end\tmu_major\tmu_minor\tsigma_major\tsigma_minor\n",
    );
    let opt = |v: Option<f64>| v.map(format_f64).unwrap_or_default();
    for s in segments {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.chromosome,
            s.genome_start,
            s.genome_end,
            format_f64(s.mu_major),
            format_f64(s.mu_minor),
            opt(s.sigma_major),
            opt(s.sigma_minor)
        );
    }
    out
}

pub fn render_histogram_tsv(bins: &[HistogramBin]) -> String {
    let mut out = String::from("mu_bin\tlength\n");
    for b in bins {
        let _ = writeln!(out, "{}\t{}", format_f64(b.mu_bin), b.length);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
