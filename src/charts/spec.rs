//! Kind-agnostic renderable chart shape
//!
//! `ChartSpec` is the only shape a rendering surface consumes. Builders for
//! each chart kind all converge on it.

use super::palette::{self, Hsla};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Vertical bars, one per label
    Bar,
    /// Connected points, non-filled
    Line,
    /// Date-binned counts
    Histogram,
    /// Proportional slices
    Pie,
}

impl ChartKind {
    /// Parse a wire kind tag
    ///
    /// Unknown tags yield `None`; callers treat that as "nothing to
    /// render", not as a failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use datachat::charts::ChartKind;
    ///
    /// assert_eq!(ChartKind::parse("bar"), Some(ChartKind::Bar));
    /// assert_eq!(ChartKind::parse("sparkline"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "histogram" => Some(Self::Histogram),
            "pie" => Some(Self::Pie),
            _ => None,
        }
    }

    /// The wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Histogram => "histogram",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One named value sequence within a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend name, usually the source column
    pub name: String,
    /// One value per label, in label order
    pub values: Vec<f64>,
    /// Palette index; renderers map this to a color deterministically
    pub color_index: usize,
}

/// A renderable chart specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Chart kind
    pub kind: ChartKind,
    /// Display title
    pub title: String,
    /// Ordered category labels
    pub labels: Vec<String>,
    /// Ordered series; most kinds produce exactly one
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Resolve the `(fill, stroke)` color for each label
    ///
    /// Pie slices draw from the fixed cyclic palette; every other kind gets
    /// evenly spaced hues across the label count. Same spec, same colors.
    pub fn category_colors(&self) -> Vec<(Hsla, Hsla)> {
        let count = self.labels.len();
        (0..count)
            .map(|i| match self.kind {
                ChartKind::Pie => {
                    let mut stroke = palette::pie_fill(i);
                    stroke.a = palette::STROKE_ALPHA;
                    (palette::pie_fill(i), stroke)
                }
                _ => (palette::fill(i, count), palette::stroke(i, count)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_round_trip() {
        for kind in [
            ChartKind::Bar,
            ChartKind::Line,
            ChartKind::Histogram,
            ChartKind::Pie,
        ] {
            assert_eq!(ChartKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_unknown() {
        assert_eq!(ChartKind::parse("scatter"), None);
        assert_eq!(ChartKind::parse(""), None);
        // Parsing is case-sensitive; the wire tag is lowercase
        assert_eq!(ChartKind::parse("Bar"), None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ChartKind::Histogram.to_string(), "histogram");
    }

    #[test]
    fn test_category_colors_evenly_spaced_for_bar() {
        let spec = ChartSpec {
            kind: ChartKind::Bar,
            title: "t".to_string(),
            labels: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            series: vec![],
        };
        let colors = spec.category_colors();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[1].0.h, 120.0);
        // Fills are translucent, strokes are opaque
        assert!((colors[0].0.a - 0.5).abs() < f64::EPSILON);
        assert!((colors[0].1.a - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_colors_pie_uses_fixed_palette() {
        let labels: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let spec = ChartSpec {
            kind: ChartKind::Pie,
            title: "t".to_string(),
            labels,
            series: vec![],
        };
        let colors = spec.category_colors();
        // The palette cycles past its length
        assert_eq!(colors[8].0.h, colors[0].0.h);
        assert_eq!(colors[9].0.h, colors[1].0.h);
    }

    #[test]
    fn test_spec_serializes_with_lowercase_kind() {
        let spec = ChartSpec {
            kind: ChartKind::Pie,
            title: "Share".to_string(),
            labels: vec!["a".to_string()],
            series: vec![Series {
                name: "value".to_string(),
                values: vec![1.0],
                color_index: 0,
            }],
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"kind\":\"pie\""));
    }
}
