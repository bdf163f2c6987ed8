use super::*;
use crate::input::maf::MutationTable;
use crate::input::table::Table;
use crate::model::fields::FieldDef;
use crate::pipeline::plots::HistogramBin;
use crate::pipeline::project::{FilterSelection, dropdown_options, project};
use crate::report::style::style_rules;
use serde_json::Value;
use std::path::Path;

fn maf() -> MutationTable {
    let header = ["Hugo_Symbol", "Variant_Classification", "oncogenic"];
    let rows = [
        ["TP53", "Missense_Mutation", "Likely Oncogenic"],
        ["KRAS", "Silent", "Unknown"],
        ["EGFR", "Missense_Mutation", "Likely Oncogenic"],
    ];
    let table = Table::new(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    );
    MutationTable::from_table(Path::new("json.maf"), table)
}

#[test]
fn test_view_document_shape() {
    let maf = maf();
    let mut selection = FilterSelection::default();
    selection.columns = vec!["oncogenic".to_string()];
    selection.classifications.insert("Missense_Mutation".to_string());
    let defaults = vec!["Hugo_Symbol".to_string()];
    let view = project(&maf, &defaults, &selection);
    let page = view.page(0, 1);
    let options = dropdown_options(&maf);
    let styles = style_rules(&view, &[]);
    let doc = build_view_document("S1", &view, &page, &options, &styles);
    let json: Value = serde_json::from_str(&render_view_json(&doc).unwrap()).unwrap();

    assert_eq!(json["sample_id"], "S1");
    assert_eq!(json["columns"], serde_json::json!(["Hugo_Symbol", "oncogenic"]));
    assert_eq!(
        json["rows"],
        serde_json::json!([["TP53", "Likely Oncogenic"]])
    );
    assert_eq!(json["table_rows"], 3);
    assert_eq!(json["matching_rows"], 2);
    assert_eq!(json["n_pages"], 2);
    assert_eq!(json["page_size"], 1);
    assert_eq!(json["options"]["genes"], serde_json::json!(["TP53", "KRAS", "EGFR"]));
    assert_eq!(json["styles"][0]["background"], "DarkOliveGreen");
}

#[test]
fn test_annotations_json() {
    let mut store = AnnotationStore::new(
        Path::new("unused.json"),
        vec![FieldDef::number("purity", Some(0.0), Some(1.0))],
    )
    .unwrap();
    store.set("S1", "purity", AnnotationValue::Number(0.3)).unwrap();

    let all: Value = serde_json::from_str(&render_annotations_json(&store, None).unwrap()).unwrap();
    assert_eq!(
        all,
        serde_json::json!([{"sample_id": "S1", "annotations": {"purity": 0.3}}])
    );

    let missing: Value =
        serde_json::from_str(&render_annotations_json(&store, Some("S9")).unwrap()).unwrap();
    assert_eq!(
        missing,
        serde_json::json!([{"sample_id": "S9", "annotations": {}}])
    );
}

#[test]
fn test_plot_json_wraps_data() {
    let bins = vec![HistogramBin {
        mu_bin: 0.5,
        length: 10,
    }];
    let json: Value =
        serde_json::from_str(&render_plot_json("histogram", "S1", &bins).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"kind": "histogram", "sample_id": "S1", "data": [{"mu_bin": 0.5, "length": 10}]})
    );
}

#[test]
fn test_view_rows_keep_column_order_and_duplicates() {
    let table = Table::new(
        vec!["zeta".to_string(), "alpha".to_string(), "zeta".to_string()],
        vec![vec!["1".to_string(), "2".to_string(), "3".to_string()]],
    );
    let maf = MutationTable::from_table(Path::new("dup.maf"), table);
    let view = crate::pipeline::project::ProjectedView {
        table: &maf,
        columns: vec![0, 1, 2],
        rows: vec![0],
    };
    let page = view.page(0, 10);
    let options = dropdown_options(&maf);
    let doc = build_view_document("S1", &view, &page, &options, &[]);
    let json: Value = serde_json::from_str(&render_view_json(&doc).unwrap()).unwrap();
    assert_eq!(json["columns"], serde_json::json!(["zeta", "alpha", "zeta"]));
    assert_eq!(json["rows"], serde_json::json!([["1", "2", "3"]]));
}
