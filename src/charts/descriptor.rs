//! Typed chart descriptors parsed from the backend wire shape
//!
//! The backend describes each chart with a loose `{type, visualization}`
//! pair; this module narrows that into a closed enum with exactly the
//! fields each kind needs. Descriptors that name an unknown kind or omit a
//! required field parse to `None` and the chart is silently skipped.

use super::ChartKind;
use serde::{Deserialize, Serialize};

/// Visualization descriptor as it appears on the wire
///
/// Only the fields relevant to the chart kind are populated; the rest are
/// ignored if present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualizationInfo {
    /// Display title
    #[serde(default)]
    pub chart_title: Option<String>,
    /// X-axis column (bar, line, histogram)
    #[serde(default)]
    pub x_column: Option<String>,
    /// Y-axis column (bar, line)
    #[serde(default)]
    pub y_column: Option<String>,
    /// Y-axis columns; the first entry wins for line charts
    #[serde(default)]
    pub y_columns: Option<Vec<String>>,
    /// Value column (pie)
    #[serde(default)]
    pub value_column: Option<String>,
    /// Label column (pie)
    #[serde(default)]
    pub label_column: Option<String>,
    /// Bucket count (histogram)
    #[serde(default)]
    pub bins: Option<usize>,
}

/// A fully-resolved chart descriptor, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartDescriptor {
    /// Bar chart over a label column and a value column
    Bar {
        /// Display title
        title: String,
        /// Column supplying category labels
        x_column: String,
        /// Column supplying bar heights
        y_column: String,
    },
    /// Line chart over a label column and a value column
    Line {
        /// Display title
        title: String,
        /// Column supplying point labels
        x_column: String,
        /// Column supplying point values
        y_column: String,
    },
    /// Histogram over a date column
    Histogram {
        /// Display title
        title: String,
        /// Column supplying dates to bin
        x_column: String,
        /// Bucket count
        bins: usize,
    },
    /// Pie chart over a label column and a value column
    Pie {
        /// Display title
        title: String,
        /// Column supplying slice labels
        label_column: String,
        /// Column supplying slice sizes
        value_column: String,
    },
}

impl ChartDescriptor {
    /// The kind this descriptor produces
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar { .. } => ChartKind::Bar,
            Self::Line { .. } => ChartKind::Line,
            Self::Histogram { .. } => ChartKind::Histogram,
            Self::Pie { .. } => ChartKind::Pie,
        }
    }

    /// The display title
    pub fn title(&self) -> &str {
        match self {
            Self::Bar { title, .. }
            | Self::Line { title, .. }
            | Self::Histogram { title, .. }
            | Self::Pie { title, .. } => title,
        }
    }

    /// Parse a wire descriptor into a typed one
    ///
    /// # Arguments
    ///
    /// * `kind` - The wire `type` tag
    /// * `viz` - The wire visualization block
    /// * `default_bins` - Bucket count used when a histogram omits `bins`
    /// * `excluded` - Column names barred from every derivation path
    ///
    /// # Returns
    ///
    /// `None` for unknown kinds, descriptors missing a required column, or
    /// descriptors referencing an excluded column; the caller treats
    /// absence as "nothing to render", not failure.
    pub fn from_wire(
        kind: &str,
        viz: &VisualizationInfo,
        default_bins: usize,
        excluded: &[String],
    ) -> Option<Self> {
        let kind = ChartKind::parse(kind)?;
        let title = viz
            .chart_title
            .clone()
            .unwrap_or_else(|| "Data Visualization".to_string());
        let column = |name: &Option<String>| -> Option<String> {
            let name = name.as_ref()?;
            if excluded.iter().any(|e| e == name) {
                return None;
            }
            Some(name.clone())
        };

        match kind {
            ChartKind::Bar => Some(Self::Bar {
                title,
                x_column: column(&viz.x_column)?,
                y_column: column(&viz.y_column)?,
            }),
            ChartKind::Line => {
                // y_columns[0] wins when an array is given
                let y_column = match &viz.y_columns {
                    Some(columns) => column(&columns.first().cloned())?,
                    None => column(&viz.y_column)?,
                };
                Some(Self::Line {
                    title,
                    x_column: column(&viz.x_column)?,
                    y_column,
                })
            }
            ChartKind::Histogram => Some(Self::Histogram {
                title,
                x_column: column(&viz.x_column)?,
                bins: viz.bins.unwrap_or(default_bins),
            }),
            ChartKind::Pie => Some(Self::Pie {
                title,
                label_column: column(&viz.label_column)?,
                value_column: column(&viz.value_column)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viz() -> VisualizationInfo {
        VisualizationInfo {
            chart_title: Some("Sales by Region".to_string()),
            x_column: Some("region".to_string()),
            y_column: Some("sales".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_bar_from_wire() {
        let descriptor = ChartDescriptor::from_wire("bar", &viz(), 10, &[]).unwrap();
        assert_eq!(descriptor.kind(), ChartKind::Bar);
        assert_eq!(descriptor.title(), "Sales by Region");
    }

    #[test]
    fn test_unknown_kind_is_none() {
        assert!(ChartDescriptor::from_wire("scatter", &viz(), 10, &[]).is_none());
    }

    #[test]
    fn test_missing_required_column_is_none() {
        let mut v = viz();
        v.y_column = None;
        assert!(ChartDescriptor::from_wire("bar", &v, 10, &[]).is_none());
    }

    #[test]
    fn test_line_prefers_y_columns_array() {
        let mut v = viz();
        v.y_columns = Some(vec!["revenue".to_string(), "cost".to_string()]);
        let descriptor = ChartDescriptor::from_wire("line", &v, 10, &[]).unwrap();
        assert_eq!(
            descriptor,
            ChartDescriptor::Line {
                title: "Sales by Region".to_string(),
                x_column: "region".to_string(),
                y_column: "revenue".to_string(),
            }
        );
    }

    #[test]
    fn test_line_falls_back_to_y_column() {
        let descriptor = ChartDescriptor::from_wire("line", &viz(), 10, &[]).unwrap();
        assert!(matches!(
            descriptor,
            ChartDescriptor::Line { y_column, .. } if y_column == "sales"
        ));
    }

    #[test]
    fn test_histogram_default_bins() {
        let mut v = viz();
        v.bins = None;
        let descriptor = ChartDescriptor::from_wire("histogram", &v, 12, &[]).unwrap();
        assert!(matches!(
            descriptor,
            ChartDescriptor::Histogram { bins: 12, .. }
        ));
    }

    #[test]
    fn test_missing_title_gets_default() {
        let mut v = viz();
        v.chart_title = None;
        let descriptor = ChartDescriptor::from_wire("bar", &v, 10, &[]).unwrap();
        assert_eq!(descriptor.title(), "Data Visualization");
    }

    #[test]
    fn test_pie_requires_label_and_value() {
        let v = VisualizationInfo {
            label_column: Some("category".to_string()),
            value_column: Some("share".to_string()),
            ..Default::default()
        };
        assert!(ChartDescriptor::from_wire("pie", &v, 10, &[]).is_some());

        let missing = VisualizationInfo {
            label_column: Some("category".to_string()),
            ..Default::default()
        };
        assert!(ChartDescriptor::from_wire("pie", &missing, 10, &[]).is_none());
    }

    #[test]
    fn test_excluded_column_reference_is_none() {
        let excluded = vec!["description".to_string()];

        let mut v = viz();
        v.y_column = Some("description".to_string());
        assert!(ChartDescriptor::from_wire("bar", &v, 10, &excluded).is_none());

        let mut v = viz();
        v.x_column = Some("description".to_string());
        assert!(ChartDescriptor::from_wire("histogram", &v, 10, &excluded).is_none());

        let mut v = viz();
        v.y_columns = Some(vec!["description".to_string(), "sales".to_string()]);
        assert!(ChartDescriptor::from_wire("line", &v, 10, &excluded).is_none());

        // Unrelated columns still parse
        assert!(ChartDescriptor::from_wire("bar", &viz(), 10, &excluded).is_some());
    }

    #[test]
    fn test_irrelevant_fields_ignored() {
        let mut v = viz();
        v.bins = Some(99);
        v.label_column = Some("ignored".to_string());
        let descriptor = ChartDescriptor::from_wire("bar", &v, 10, &[]).unwrap();
        assert_eq!(descriptor.kind(), ChartKind::Bar);
    }
}
