//! Terminal rendering for datasets and derived charts
//!
//! Datasets print as bordered tables with the configured free-text columns
//! hidden; chart specs print as textual summaries with scaled value bars.
//! Everything here is presentation only, session state is never touched.

use crate::charts::ChartSpec;
use crate::config::DisplayConfig;
use crate::dataset::{cell_text, RawDataset};
use colored::Colorize;
use prettytable::{format, Table};

/// Longest cell text before truncation
const MAX_CELL_WIDTH: usize = 40;

/// Width of the scaled value bar in chart summaries
const BAR_WIDTH: usize = 30;

/// Build a printable table for a dataset
///
/// Returns `None` for an empty dataset or when every column is excluded.
pub fn dataset_table(dataset: &RawDataset, display: &DisplayConfig) -> Option<Table> {
    let columns = dataset.display_columns(&display.excluded_columns);
    if columns.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    let mut header = prettytable::Row::empty();
    for column in &columns {
        header.add_cell(prettytable::Cell::new(&column.bold().to_string()));
    }
    table.add_row(header);

    for row in dataset.rows() {
        let mut table_row = prettytable::Row::empty();
        for column in &columns {
            let text = cell_text(row, column).unwrap_or_default();
            table_row.add_cell(prettytable::Cell::new(&truncate(&text)));
        }
        table.add_row(table_row);
    }

    Some(table)
}

/// Print a dataset, with a row count footer
pub fn print_dataset(dataset: &RawDataset, display: &DisplayConfig) {
    match dataset_table(dataset, display) {
        Some(table) => {
            table.printstd();
            println!("{}", format!("{} rows", dataset.len()).dimmed());
        }
        None => println!("{}", "No rows returned.".yellow()),
    }
}

/// Format a chart spec as summary lines
///
/// One line per label with its value and a bar scaled against the largest
/// value in the first series. Bars carry the same per-category colors a
/// rendering surface would resolve, so a bar that is red in a browser is
/// red in the terminal.
pub fn chart_summary(spec: &ChartSpec) -> Vec<String> {
    let mut lines = vec![format!("{} [{}]", spec.title, spec.kind)
        .cyan()
        .bold()
        .to_string()];

    let series = match spec.series.first() {
        Some(series) => series,
        None => return lines,
    };

    let max = series.values.iter().cloned().fold(0.0_f64, f64::max);
    let label_width = spec.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let colors = spec.category_colors();

    for (i, (label, value)) in spec.labels.iter().zip(&series.values).enumerate() {
        let bar = value_bar(*value, max);
        let bar = match colors.get(i) {
            Some((fill, _)) => {
                let (r, g, b) = fill.to_rgb();
                bar.truecolor(r, g, b).to_string()
            }
            None => bar,
        };
        lines.push(format!(
            "  {:<label_width$}  {:>10.2}  {}",
            label, value, bar,
        ));
    }
    lines
}

/// Print every rendered chart in a collection, up to the configured cap
pub fn print_charts(specs: &[ChartSpec]) {
    for spec in specs {
        println!();
        for line in chart_summary(spec) {
            println!("{}", line);
        }
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_CELL_WIDTH {
        let head: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn value_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value < 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, Series};
    use serde_json::json;

    fn dataset(value: serde_json::Value) -> RawDataset {
        let rows = match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::Object(m) => m,
                    _ => panic!("expected object row"),
                })
                .collect(),
            _ => panic!("expected array"),
        };
        RawDataset::new(rows)
    }

    #[test]
    fn test_dataset_table_hides_excluded_columns() {
        let dataset = dataset(json!([
            {"region": "A", "sales": 10, "notes": "long free text"}
        ]));
        let display = DisplayConfig::default();

        let table = dataset_table(&dataset, &display).unwrap();
        let rendered = table.to_string();
        assert!(rendered.contains("region"));
        assert!(!rendered.contains("long free text"));
    }

    #[test]
    fn test_dataset_table_empty_is_none() {
        let display = DisplayConfig::default();
        assert!(dataset_table(&RawDataset::default(), &display).is_none());
    }

    #[test]
    fn test_truncate_long_cells() {
        let long = "x".repeat(60);
        let truncated = truncate(&long);
        assert_eq!(truncated.chars().count(), MAX_CELL_WIDTH);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_chart_summary_lines() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            title: "Sales by Region".to_string(),
            labels: vec!["A".to_string(), "B".to_string()],
            series: vec![Series {
                name: "sales".to_string(),
                values: vec![10.0, 20.0],
                color_index: 0,
            }],
        };

        let lines = chart_summary(&spec);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Sales by Region"));
        assert!(lines[0].contains("bar"));
        assert!(lines[1].contains("10.00"));
        // The largest value fills the whole bar
        assert!(lines[2].contains(&"#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_value_bar_scaling() {
        assert_eq!(value_bar(0.0, 10.0), "");
        assert_eq!(value_bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(value_bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(value_bar(1.0, 0.0), "");
    }
}
