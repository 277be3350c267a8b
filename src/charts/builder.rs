//! Pure derivation of renderable chart specs from rows and descriptors
//!
//! `build_chart` is a pure function of `(rows, descriptor)`: no shared
//! state, same input always produces the same spec. Each descriptor variant
//! has its own mapping function; all converge on `ChartSpec`.
//!
//! A descriptor referencing a column absent from any row yields `None` and
//! the chart is omitted; other charts are unaffected.

use super::descriptor::ChartDescriptor;
use super::histogram::HistogramBinner;
use super::spec::{ChartKind, ChartSpec, Series};
use crate::dataset::{cell_date, cell_number, cell_text, Row};

/// Derive a renderable spec from rows and a typed descriptor
///
/// Returns `None` when the rows cannot satisfy the descriptor (missing
/// column, unparsable dates). Absence means "nothing to render", never an
/// error.
pub fn build_chart(rows: &[Row], descriptor: &ChartDescriptor) -> Option<ChartSpec> {
    match descriptor {
        ChartDescriptor::Bar {
            title,
            x_column,
            y_column,
        } => category_spec(rows, ChartKind::Bar, title, x_column, y_column),
        ChartDescriptor::Line {
            title,
            x_column,
            y_column,
        } => category_spec(rows, ChartKind::Line, title, x_column, y_column),
        ChartDescriptor::Histogram {
            title,
            x_column,
            bins,
        } => histogram_spec(rows, title, x_column, *bins),
        ChartDescriptor::Pie {
            title,
            label_column,
            value_column,
        } => category_spec(rows, ChartKind::Pie, title, label_column, value_column),
    }
}

/// One label and one value per row; shared by bar, line, and pie
///
/// Bar uses a fixed two-tone fill/stroke and line is non-filled, but both
/// distinctions live in the renderer via the palette module; the spec shape
/// is identical.
fn category_spec(
    rows: &[Row],
    kind: ChartKind,
    title: &str,
    label_column: &str,
    value_column: &str,
) -> Option<ChartSpec> {
    let labels: Vec<String> = rows
        .iter()
        .map(|row| cell_text(row, label_column))
        .collect::<Option<_>>()?;
    let values: Vec<f64> = rows
        .iter()
        .map(|row| cell_number(row, value_column))
        .collect::<Option<_>>()?;

    Some(ChartSpec {
        kind,
        title: title.to_string(),
        labels,
        series: vec![Series {
            name: value_column.to_string(),
            values,
            color_index: 0,
        }],
    })
}

fn histogram_spec(rows: &[Row], title: &str, x_column: &str, bins: usize) -> Option<ChartSpec> {
    let dates: Vec<chrono::NaiveDateTime> = rows
        .iter()
        .map(|row| cell_date(row, x_column))
        .collect::<Option<_>>()?;

    let buckets = HistogramBinner::new(bins).bin(&dates);
    let (labels, values) = buckets
        .into_iter()
        .map(|b| (b.label, b.count as f64))
        .unzip();

    Some(ChartSpec {
        kind: ChartKind::Histogram,
        title: title.to_string(),
        labels,
        series: vec![Series {
            name: x_column.to_string(),
            values,
            color_index: 0,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::Object(map) => map,
                    _ => panic!("expected object row"),
                })
                .collect(),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn test_bar_spec_from_rows() {
        let data = rows(json!([
            {"region": "A", "sales": 10},
            {"region": "B", "sales": 20}
        ]));
        let descriptor = ChartDescriptor::Bar {
            title: "Sales by Region".to_string(),
            x_column: "region".to_string(),
            y_column: "sales".to_string(),
        };

        let spec = build_chart(&data, &descriptor).unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.labels, vec!["A", "B"]);
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].values, vec![10.0, 20.0]);
        assert_eq!(spec.series[0].name, "sales");
    }

    #[test]
    fn test_missing_column_omits_chart() {
        let data = rows(json!([
            {"region": "A", "sales": 10},
            {"region": "B"}
        ]));
        let descriptor = ChartDescriptor::Bar {
            title: "t".to_string(),
            x_column: "region".to_string(),
            y_column: "sales".to_string(),
        };
        assert!(build_chart(&data, &descriptor).is_none());
    }

    #[test]
    fn test_line_spec_numeric_strings() {
        let data = rows(json!([
            {"month": "Jan", "revenue": "100.5"},
            {"month": "Feb", "revenue": "200"}
        ]));
        let descriptor = ChartDescriptor::Line {
            title: "Revenue".to_string(),
            x_column: "month".to_string(),
            y_column: "revenue".to_string(),
        };

        let spec = build_chart(&data, &descriptor).unwrap();
        assert_eq!(spec.kind, ChartKind::Line);
        assert_eq!(spec.series[0].values, vec![100.5, 200.0]);
    }

    #[test]
    fn test_pie_spec() {
        let data = rows(json!([
            {"category": "Food", "share": 40},
            {"category": "Rent", "share": 60}
        ]));
        let descriptor = ChartDescriptor::Pie {
            title: "Spending".to_string(),
            label_column: "category".to_string(),
            value_column: "share".to_string(),
        };

        let spec = build_chart(&data, &descriptor).unwrap();
        assert_eq!(spec.kind, ChartKind::Pie);
        assert_eq!(spec.labels, vec!["Food", "Rent"]);
        assert_eq!(spec.series[0].values, vec![40.0, 60.0]);
    }

    #[test]
    fn test_histogram_spec_boundary_row_dropped() {
        let data = rows(json!([
            {"sale_date": "2024-01-01"},
            {"sale_date": "2024-01-01"},
            {"sale_date": "2024-06-01"}
        ]));
        let descriptor = ChartDescriptor::Histogram {
            title: "Sales over time".to_string(),
            x_column: "sale_date".to_string(),
            bins: 2,
        };

        let spec = build_chart(&data, &descriptor).unwrap();
        assert_eq!(spec.kind, ChartKind::Histogram);
        assert_eq!(spec.labels.len(), 2);
        // The 2024-06-01 row sits exactly on the maximum boundary and is
        // dropped by policy; it does not overflow into a third bucket.
        assert_eq!(spec.series[0].values, vec![2.0, 0.0]);
    }

    #[test]
    fn test_histogram_unparsable_dates_omit_chart() {
        let data = rows(json!([
            {"sale_date": "2024-01-01"},
            {"sale_date": "not a date"}
        ]));
        let descriptor = ChartDescriptor::Histogram {
            title: "t".to_string(),
            x_column: "sale_date".to_string(),
            bins: 2,
        };
        assert!(build_chart(&data, &descriptor).is_none());
    }

    #[test]
    fn test_empty_rows_bar_is_empty_spec() {
        let descriptor = ChartDescriptor::Bar {
            title: "t".to_string(),
            x_column: "x".to_string(),
            y_column: "y".to_string(),
        };
        let spec = build_chart(&[], &descriptor).unwrap();
        assert!(spec.labels.is_empty());
        assert!(spec.series[0].values.is_empty());
    }

    #[test]
    fn test_determinism() {
        let data = rows(json!([
            {"region": "A", "sales": 1},
            {"region": "B", "sales": 2}
        ]));
        let descriptor = ChartDescriptor::Bar {
            title: "t".to_string(),
            x_column: "region".to_string(),
            y_column: "sales".to_string(),
        };
        assert_eq!(
            build_chart(&data, &descriptor),
            build_chart(&data, &descriptor)
        );
    }
}
