use serde::{Deserialize, Serialize};

use crate::input::maf::{CLUSTER_ASSIGNMENT, MafField};
use crate::pipeline::project::ProjectedView;

const CLUSTER_PALETTE: [&str; 10] = [
    "Blue",
    "Red",
    "Green",
    "Purple",
    "DarkOrange",
    "Teal",
    "SaddleBrown",
    "DeepPink",
    "Olive",
    "SlateGray",
];

/// Cell style applied where `column` holds exactly `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub column: String,
    pub value: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_bold")]
    pub bold: bool,
}

fn default_color() -> String {
    "Black".to_string()
}

fn default_background() -> String {
    "White".to_string()
}

fn default_bold() -> bool {
    true
}

impl StyleRule {
    pub fn new(column: &str, value: &str, color: &str, background: &str) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
            color: color.to_string(),
            background: background.to_string(),
            bold: true,
        }
    }

    pub fn text(column: &str, value: &str, color: &str) -> Self {
        Self::new(column, value, color, "White")
    }

    pub fn background(column: &str, value: &str, background: &str) -> Self {
        Self::new(column, value, "Black", background)
    }

    pub fn matches(&self, column: &str, value: &str) -> bool {
        self.column == column && self.value == value
    }
}

pub fn cluster_color(cluster: &str) -> &'static str {
    match cluster.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => {
            CLUSTER_PALETTE[(n as usize) % CLUSTER_PALETTE.len()]
        }
        _ => "Black",
    }
}

/// Builds the conditional styling for the visible columns of a view, then
/// appends the configured custom rules.
pub fn style_rules(view: &ProjectedView<'_>, custom: &[StyleRule]) -> Vec<StyleRule> {
    let visible = view.column_names();
    let shown = |name: &str| visible.contains(&name);
    let mut rules = Vec::new();

    if shown(CLUSTER_ASSIGNMENT) {
        let mut seen: Vec<&str> = Vec::new();
        for &row in &view.rows {
            if let Some(cluster) = view.table.attribute(row, MafField::Cluster) {
                if !cluster.is_empty() && !seen.contains(&cluster) {
                    seen.push(cluster);
                    rules.push(StyleRule::text(
                        CLUSTER_ASSIGNMENT,
                        cluster,
                        cluster_color(cluster),
                    ));
                }
            }
        }
    }

    if shown("functional_effect") {
        rules.push(StyleRule::background(
            "functional_effect",
            "Likely Loss-of-function",
            "DarkOliveGreen",
        ));
        rules.push(StyleRule::background(
            "functional_effect",
            "Likely Gain-of-function",
            "DarkSeaGreen",
        ));
    }

    if shown("oncogenic") {
        rules.push(StyleRule::background(
            "oncogenic",
            "Likely Oncogenic",
            "DarkOliveGreen",
        ));
    }

    if shown("dbNSFP_Polyphen2_HDIV_ann") {
        rules.push(StyleRule::background(
            "dbNSFP_Polyphen2_HDIV_ann",
            "D",
            "FireBrick",
        ));
    }

    rules.extend(custom.iter().cloned());
    rules
}

/// Rule applied to a cell; later rules override earlier ones.
pub fn rule_for<'r>(rules: &'r [StyleRule], column: &str, value: &str) -> Option<&'r StyleRule> {
    rules.iter().rev().find(|r| r.matches(column, value))
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/style.rs"]
mod tests;
