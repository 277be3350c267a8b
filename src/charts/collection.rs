//! Keyed store of the most recent chart per kind
//!
//! Charts are keyed exactly by kind: a new bar chart always replaces the
//! previous bar chart and leaves other kinds alone. Insertion order is
//! preserved and deterministic; a replaced kind keeps its original
//! position. Renderable specs are derived lazily from the stored
//! `(rows, descriptor)` pairs, and rendering is capped to a fixed maximum.

use super::builder::build_chart;
use super::descriptor::ChartDescriptor;
use super::spec::{ChartKind, ChartSpec};
use crate::dataset::Row;

/// Default render cap when more kinds are present than fit the layout
pub const DEFAULT_MAX_RENDERED: usize = 4;

/// The stored source of one chart: its rows and typed descriptor
#[derive(Debug, Clone)]
pub struct ChartEntry {
    /// Rows this chart derives from (may differ from the session dataset)
    pub rows: Vec<Row>,
    /// Typed descriptor controlling derivation
    pub descriptor: ChartDescriptor,
}

impl ChartEntry {
    /// Create an entry from rows and a descriptor
    pub fn new(rows: Vec<Row>, descriptor: ChartDescriptor) -> Self {
        Self { rows, descriptor }
    }

    /// The kind this entry is keyed by
    pub fn kind(&self) -> ChartKind {
        self.descriptor.kind()
    }

    /// Lazily derive the renderable spec
    ///
    /// `None` when the stored rows cannot satisfy the descriptor; such
    /// entries are skipped at render time.
    pub fn spec(&self) -> Option<ChartSpec> {
        build_chart(&self.rows, &self.descriptor)
    }
}

/// The latest chart per kind, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ChartCollection {
    entries: Vec<ChartEntry>,
}

impl ChartCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chart, replacing any existing chart of the same kind
    ///
    /// A replaced kind keeps its original position; a new kind is appended.
    pub fn insert(&mut self, entry: ChartEntry) {
        let kind = entry.kind();
        match self.entries.iter_mut().find(|e| e.kind() == kind) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Replace the entire collection
    ///
    /// Later entries of a duplicated kind win, matching the merge policy.
    pub fn replace_all(&mut self, entries: Vec<ChartEntry>) {
        self.entries.clear();
        for entry in entries {
            self.insert(entry);
        }
    }

    /// The stored entry for a kind, if present
    pub fn get(&self, kind: ChartKind) -> Option<&ChartEntry> {
        self.entries.iter().find(|e| e.kind() == kind)
    }

    /// Number of stored charts (at most one per kind)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no charts are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds currently stored, in insertion order
    pub fn kinds(&self) -> Vec<ChartKind> {
        self.entries.iter().map(|e| e.kind()).collect()
    }

    /// Derive renderable specs, capped at `max` entries
    ///
    /// Entries beyond the cap and entries whose rows no longer satisfy
    /// their descriptor are skipped.
    pub fn rendered_specs(&self, max: usize) -> Vec<ChartSpec> {
        self.entries
            .iter()
            .take(max)
            .filter_map(|entry| entry.spec())
            .collect()
    }
}
