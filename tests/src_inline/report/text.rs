use super::*;
use crate::input::maf::{DEFAULT_COLUMNS, MutationTable};
use crate::input::segments::Segment;
use crate::input::table::Table;
use crate::model::fields::{AnnotationValue, FieldDef};
use crate::pipeline::plots::{copy_number_histogram, copy_number_profile};
use crate::pipeline::project::{FilterSelection, dropdown_options, project};
use std::path::{Path, PathBuf};

fn maf() -> MutationTable {
    let header = ["Hugo_Symbol", "Variant_Classification", "Cluster_Assignment", "note"];
    let long = "x".repeat(60);
    let rows = vec![
        vec!["TP53", "Missense_Mutation", "1", "short"],
        vec!["KRAS", "Silent", "2", long.as_str()],
        vec!["EGFR", "Missense_Mutation", "1", ""],
    ];
    let table = Table::new(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    );
    MutationTable::from_table(Path::new("text.maf"), table)
}

fn defaults() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_view_text_page_and_footer() {
    let maf = maf();
    let view = project(&maf, &defaults(), &FilterSelection::default());
    let page = view.page(0, 2);
    let text = render_view_text("S1", &view, &page);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Sample: S1");
    assert!(lines[1].starts_with("Hugo_Symbol  Variant_Classification"));
    assert!(lines[2].starts_with("-----------  "));
    assert!(lines[3].starts_with("TP53 "));
    assert!(lines[4].starts_with("KRAS "));
    assert_eq!(lines[5], "Rows 1-2 of 3 (page 1/2); 3 mutations in table");
}

#[test]
fn test_view_text_clips_long_cells() {
    let maf = maf();
    let mut selection = FilterSelection::default();
    selection.columns = vec!["note".to_string()];
    let view = project(&maf, &defaults(), &selection);
    let page = view.page(0, 10);
    let text = render_view_text("S1", &view, &page);
    assert!(text.contains(&format!("{}...", "x".repeat(37))));
    assert!(!text.contains(&"x".repeat(38)));
}

#[test]
fn test_footer_for_empty_page() {
    let maf = maf();
    let mut selection = FilterSelection::default();
    selection.genes.insert("BRAF".to_string());
    let view = project(&maf, &defaults(), &selection);
    let page = view.page(0, 10);
    assert_eq!(
        page_footer(&view, &page),
        "No rows on page 1 (0 of 3 mutations match)"
    );
}

#[test]
fn test_view_tsv_ignores_paging() {
    let maf = maf();
    let mut selection = FilterSelection::default();
    selection.classifications.insert("Missense_Mutation".to_string());
    let view = project(&maf, &defaults(), &selection);
    let tsv = render_view_tsv(&view);
    assert_eq!(
        tsv,
        "Hugo_Symbol\tVariant_Classification\nTP53\tMissense_Mutation\nEGFR\tMissense_Mutation\n"
    );
}

#[test]
fn test_options_text() {
    let text = render_options_text(&dropdown_options(&maf()));
    assert!(text.contains("Hugo symbols: TP53, KRAS, EGFR\n"));
    assert!(text.contains("Cluster assignments: 1, 2\n"));
}

#[test]
fn test_summary_selects_metadata() {
    let sample = SampleRecord {
        id: "S1".to_string(),
        maf_path: Some(PathBuf::from("/data/S1.maf")),
        segment_path: None,
        metadata: vec![
            ("purity".to_string(), "0.6".to_string()),
            ("wgd".to_string(), "True".to_string()),
        ],
    };
    let text = render_summary_text(&sample, &["wgd".to_string(), "absent".to_string()]);
    assert_eq!(text, "S1 Data Summary\n  wgd  True\n  mutations: /data/S1.maf\n");
    let all = render_summary_text(&sample, &[]);
    assert!(all.contains("  purity  0.6\n"));
    assert!(all.contains("  wgd     True\n"));
}

#[test]
fn test_fields_and_annotations_text() {
    let mut store = AnnotationStore::new(
        Path::new("unused.json"),
        vec![
            FieldDef::number("purity", Some(0.0), Some(1.0)),
            FieldDef::categorical("call", &["ok", "fail"]),
        ],
    )
    .unwrap();
    let fields = render_fields_text(&store);
    assert_eq!(
        fields,
        "purity (number): 0 <= x <= 1\ncall (categorical): one of [ok, fail]\n"
    );

    assert_eq!(render_annotations_text(&store, None), "No annotations recorded\n");
    assert_eq!(render_annotations_text(&store, Some("S2")), "S2: not annotated\n");

    store.set("S1", "call", AnnotationValue::Text("ok".to_string())).unwrap();
    store.set("S1", "purity", AnnotationValue::Number(0.42)).unwrap();
    assert_eq!(
        render_annotations_text(&store, Some("S1")),
        "S1\n  purity: 0.42\n  call: ok\n"
    );
}

#[test]
fn test_pending_text() {
    assert_eq!(render_pending_text(&PendingEdit::default()), "No pending edits\n");
    let pending = PendingEdit::default()
        .with("purity", AnnotationValue::Number(0.5))
        .with("notes", AnnotationValue::Text("subclonal".to_string()));
    assert_eq!(
        render_pending_text(&pending),
        "Pending edits:\n  purity = 0.5\n  notes = subclonal\n"
    );
}

#[test]
fn test_plot_tsv_headers() {
    let segs = vec![Segment {
        chromosome: "1".to_string(),
        start: 1,
        end: 100,
        length: 100,
        mu_major: 1.0,
        mu_minor: 0.5,
        sigma_major: Some(0.01),
        sigma_minor: None,
    }];
    let profile = render_profile_tsv(&copy_number_profile(&segs));
    assert_eq!(
        profile.lines().nth(1),
        Some("1\t1\t100\t1\t0.5\t0.01\t")
    );
    let hist = render_histogram_tsv(&copy_number_histogram(&segs, 1.0, 0.5));
    assert_eq!(hist, "mu_bin\tlength\n0\t0\n0.5\t100\n1\t100\n");
    assert_eq!(
        render_allele_fraction_tsv(&[]),
        "row\tgene\tchromosome\tposition\tgenome_position\ttumor_f\tcluster\n"
    );
}
