use std::fmt::Write;

use crate::pipeline::project::{Page, ProjectedView};
use crate::report::style::{StyleRule, rule_for};
use crate::report::text::page_footer;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn cell_style(rule: &StyleRule) -> String {
    let mut style = format!(
        "color:{};background-color:{}",
        escape_html(&rule.color),
        escape_html(&rule.background)
    );
    if rule.bold {
        style.push_str(";font-weight:bold");
    }
    style
}

/// Standalone HTML page with the current page of the view; styled cells
/// carry their rule as an inline style.
pub fn render_view_html(
    sample_id: &str,
    view: &ProjectedView<'_>,
    page: &Page<'_>,
    rules: &[StyleRule],
) -> String {
    let columns = view.column_names();
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>Mutations: {}</title>", escape_html(sample_id));
    out.push_str(
        "<style>table{border-collapse:collapse;font-family:sans-serif;font-size:13px}\
         th,td{border:1px solid #ccc;padding:4px 8px}th{background:#f3f3f3}</style>\n",
    );
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(sample_id));
    out.push_str("<table id=\"mutation-table\">\n<thead><tr>");
    for name in &columns {
        let _ = write!(out, "<th>{}</th>", escape_html(name));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for &row in page.rows {
        out.push_str("<tr>");
        for (name, value) in columns.iter().zip(view.row_values(row)) {
            match rule_for(rules, name, value) {
                Some(rule) => {
                    let _ = write!(
                        out,
                        "<td style=\"{}\">{}</td>",
                        cell_style(rule),
                        escape_html(value)
                    );
                }
                None => {
                    let _ = write!(out, "<td>{}</td>", escape_html(value));
                }
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    let _ = writeln!(out, "<p>{}</p>", escape_html(&page_footer(view, page)));
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/html.rs"]
mod tests;
