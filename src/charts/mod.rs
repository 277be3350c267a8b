//! Chart derivation: descriptors, binning, palettes, and the keyed store
//!
//! The flow is: the backend's loose wire descriptors parse into the closed
//! [`ChartDescriptor`] enum; [`build_chart`] turns `(rows, descriptor)`
//! into a renderable [`ChartSpec`]; [`ChartCollection`] keeps the latest
//! chart per kind and derives specs lazily.

pub mod builder;
pub mod collection;
pub mod descriptor;
pub mod histogram;
pub mod palette;
pub mod spec;

pub use builder::build_chart;
pub use collection::{ChartCollection, ChartEntry, DEFAULT_MAX_RENDERED};
pub use descriptor::{ChartDescriptor, VisualizationInfo};
pub use histogram::{Bucket, HistogramBinner};
pub use palette::Hsla;
pub use spec::{ChartKind, ChartSpec, Series};
