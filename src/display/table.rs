//! Generic table and detail formatting
//!
//! Column widths are computed from the content, the way every list in the
//! tool is printed.

use crate::api::Pagination;
use crate::config::Locale;
use crate::models::Resource;

/// How an entity is shown in lists and detail views
pub trait Tabular: Resource {
    /// Column headers after the ID column
    fn headers() -> &'static [&'static str];

    /// One cell per header
    fn row(&self, locale: Locale) -> Vec<String>;

    /// Labelled fields for the detail view
    fn details(&self, locale: Locale) -> Vec<(&'static str, String)>;
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

/// Render headers and rows with aligned columns
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(width(cell));
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        let last = cells.len().saturating_sub(1);
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == last {
                    cell.clone()
                } else {
                    pad(cell, widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut output = String::new();
    output.push_str(&line(headers.iter().map(|h| h.to_string()).collect()));
    output.push('\n');
    output.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    output.push('\n');
    for row in rows {
        output.push_str(line(row.clone()).trim_end());
        output.push('\n');
    }
    output
}

/// A list page as a table with an ID column
pub fn format_table<R: Tabular>(items: &[R], locale: Locale) -> String {
    if items.is_empty() {
        return locale.nothing_found().to_string();
    }

    let mut headers = vec!["ID"];
    headers.extend_from_slice(R::headers());

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let mut row = vec![item.id().to_string()];
            row.extend(item.row(locale));
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// A single entity's detail view
pub fn format_details<R: Tabular>(item: &R, locale: Locale) -> String {
    let fields = item.details(locale);
    let label_width = fields
        .iter()
        .map(|(label, _)| width(label))
        .max()
        .unwrap_or(2)
        .max(2);

    let mut output = format!("{}: {}\n", R::LABEL, item.display_name());
    output.push_str(&format!(
        "  {}  {}\n",
        pad("ID", label_width + 1),
        item.id()
    ));
    for (label, value) in fields {
        output.push_str(&format!(
            "  {}  {}\n",
            pad(&format!("{}:", label), label_width + 1),
            value
        ));
    }
    output
}

/// `Page 2 of 5 (43 total)`
pub fn format_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} total)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
}

/// Render an optional value, `-` when absent
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
