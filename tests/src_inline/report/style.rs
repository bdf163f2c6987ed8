use super::*;
use crate::input::maf::MutationTable;
use crate::input::table::Table;
use crate::pipeline::project::{FilterSelection, project};
use std::path::Path;

fn table() -> MutationTable {
    let header = [
        "Hugo_Symbol",
        "Variant_Classification",
        "Cluster_Assignment",
        "functional_effect",
        "oncogenic",
    ];
    let rows = [
        ["TP53", "Missense_Mutation", "1", "Likely Loss-of-function", "Likely Oncogenic"],
        ["KRAS", "Missense_Mutation", "2", "Likely Gain-of-function", "Unknown"],
        ["PIK3CA", "Silent", "1", "", ""],
        ["EGFR", "Silent", "12", "", ""],
    ];
    let table = Table::new(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    );
    MutationTable::from_table(Path::new("style.maf"), table)
}

fn defaults() -> Vec<String> {
    vec!["Hugo_Symbol".to_string()]
}

#[test]
fn test_rules_only_for_visible_columns() {
    let maf = table();
    let view = project(&maf, &defaults(), &FilterSelection::default());
    assert!(style_rules(&view, &[]).is_empty());

    let mut selection = FilterSelection::default();
    selection.columns = vec!["oncogenic".to_string()];
    let view = project(&maf, &defaults(), &selection);
    let rules = style_rules(&view, &[]);
    assert_eq!(
        rules,
        vec![StyleRule::background("oncogenic", "Likely Oncogenic", "DarkOliveGreen")]
    );
}

#[test]
fn test_cluster_rules_follow_visible_rows() {
    let maf = table();
    let mut selection = FilterSelection::default();
    selection.columns = vec!["Cluster_Assignment".to_string()];
    selection.classifications.insert("Silent".to_string());
    let view = project(&maf, &defaults(), &selection);
    let rules = style_rules(&view, &[]);
    let values: Vec<&str> = rules.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["1", "12"]);
    assert_eq!(rules[0].color, cluster_color("1"));
    assert_eq!(rules[1].color, cluster_color("2"));
}

#[test]
fn test_cluster_color() {
    assert_eq!(cluster_color("0"), "Blue");
    assert_eq!(cluster_color("3"), "Purple");
    assert_eq!(cluster_color("13"), "Purple");
    assert_eq!(cluster_color("clonal"), "Black");
}

#[test]
fn test_custom_rules_override_builtin() {
    let maf = table();
    let mut selection = FilterSelection::default();
    selection.columns = vec!["functional_effect".to_string()];
    let view = project(&maf, &defaults(), &selection);
    let custom = vec![StyleRule::text(
        "functional_effect",
        "Likely Loss-of-function",
        "Gold",
    )];
    let rules = style_rules(&view, &custom);
    assert_eq!(rules.len(), 3);
    let rule = rule_for(&rules, "functional_effect", "Likely Loss-of-function").unwrap();
    assert_eq!(rule.color, "Gold");
    let rule = rule_for(&rules, "functional_effect", "Likely Gain-of-function").unwrap();
    assert_eq!(rule.background, "DarkSeaGreen");
    assert!(rule_for(&rules, "functional_effect", "").is_none());
}

#[test]
fn test_style_rule_defaults_from_json() {
    let rule: StyleRule =
        serde_json::from_str(r#"{"column":"oncogenic","value":"Oncogenic"}"#).unwrap();
    assert_eq!(rule.color, "Black");
    assert_eq!(rule.background, "White");
    assert!(rule.bold);
}
