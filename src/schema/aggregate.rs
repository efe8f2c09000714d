//! Streaming aggregation of per-path type statistics.
//!
//! An [`AggregateState`] is built by folding one [`DocumentProfile`] per sampled
//! document into it. Folding is additive, so shards of a corpus can be
//! aggregated independently and combined with [`AggregateState::absorb`] in any
//! order.

use std::collections::{BTreeMap, BTreeSet};

use mongodb::bson::Document;
use serde::Serialize;

use super::flatten::{PathTypes, classify_paths, flatten_document};
use super::structure::{Shape, project_document};
use crate::bson::TypeTag;

/// Occurrence counts for one path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerPathStat {
    /// Number of documents in which the path held each type.
    pub types: BTreeMap<TypeTag, u64>,
    /// Number of documents containing the path.
    pub total_occurrences: u64,
}

impl PerPathStat {
    fn observe<'a>(&mut self, tags: impl IntoIterator<Item = &'a TypeTag>) {
        for tag in tags {
            *self.types.entry(*tag).or_insert(0) += 1;
        }
        self.total_occurrences += 1;
    }

    fn absorb(&mut self, other: &PerPathStat) {
        for (tag, count) in &other.types {
            *self.types.entry(*tag).or_insert(0) += count;
        }
        self.total_occurrences += other.total_occurrences;
    }

    /// The only type ever observed for this path, if there is exactly one.
    pub fn sole_type(&self) -> Option<TypeTag> {
        if self.types.len() == 1 { self.types.keys().next().copied() } else { None }
    }

    pub fn is_universal(&self, document_count: u64) -> bool {
        self.total_occurrences == document_count
    }
}

/// Both classified views of a single document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentProfile {
    /// Normalized dotted path → types seen in this document.
    pub paths: PathTypes,
    /// Top-level structural shape.
    pub shape: Shape,
}

impl DocumentProfile {
    pub fn from_document(doc: &Document, max_depth: usize) -> Self {
        Self {
            paths: classify_paths(&flatten_document(doc, max_depth)),
            shape: project_document(doc, max_depth),
        }
    }
}

/// Cumulative statistics over every document folded in so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateState {
    documents: u64,
    paths: BTreeMap<String, PerPathStat>,
    fields: BTreeMap<String, PerPathStat>,
    shapes: BTreeMap<String, Shape>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's profile into the running totals.
    pub fn merge(&mut self, profile: &DocumentProfile) {
        self.documents += 1;

        for (path, tags) in &profile.paths {
            self.paths.entry(path.clone()).or_default().observe(tags);
        }

        for (name, field) in &profile.shape.fields {
            let tags: BTreeSet<TypeTag> = field.types.keys().copied().collect();
            self.fields.entry(name.clone()).or_default().observe(&tags);

            if let Some(child) = field.types.get(&TypeTag::Object) {
                let shape = self.shapes.entry(name.clone()).or_default();
                if let Some(child) = child {
                    shape.merge(child);
                }
            }
        }
    }

    /// Fold another independently built state into this one.
    pub fn absorb(&mut self, other: AggregateState) {
        self.documents += other.documents;
        for (path, stat) in other.paths {
            self.paths.entry(path).or_default().absorb(&stat);
        }
        for (name, stat) in other.fields {
            self.fields.entry(name).or_default().absorb(&stat);
        }
        for (name, shape) in other.shapes {
            self.shapes.entry(name).or_default().merge(&shape);
        }
    }

    /// Number of documents folded in.
    pub fn documents(&self) -> u64 {
        self.documents
    }

    /// Statistics for every normalized dotted path.
    pub fn paths(&self) -> &BTreeMap<String, PerPathStat> {
        &self.paths
    }

    /// Statistics for every top-level field.
    pub fn fields(&self) -> &BTreeMap<String, PerPathStat> {
        &self.fields
    }

    /// Union of the object shapes observed for a top-level field.
    pub fn shape(&self, field: &str) -> Option<&Shape> {
        self.shapes.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }
}
