//! End-to-end schema analysis over a stream of documents.

use std::borrow::Borrow;

use mongodb::bson::Document;

use super::aggregate::{AggregateState, DocumentProfile};
use super::compile::compile_schema;
use super::index::{RawIndex, translate_indexes};
use super::report::{SchemaReport, key_frequencies};
use crate::error::{Error, Result};

/// Reject depth budgets that would produce empty output.
pub fn validate_max_depth(max_depth: usize) -> Result<()> {
    if max_depth < 1 {
        return Err(Error::InvalidConfiguration(format!(
            "maxDepth must be at least 1, got {max_depth}"
        )));
    }
    Ok(())
}

/// Single-pass reducer: observe documents one at a time, then finish into a report.
#[derive(Debug)]
pub struct SchemaAnalyzer {
    max_depth: usize,
    state: AggregateState,
}

impl SchemaAnalyzer {
    pub fn new(max_depth: usize) -> Result<Self> {
        validate_max_depth(max_depth)?;
        Ok(Self { max_depth, state: AggregateState::new() })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Classify one document and fold it into the running state.
    pub fn observe(&mut self, doc: &Document) {
        let profile = DocumentProfile::from_document(doc, self.max_depth);
        log::debug!(
            "Observed document {} ({} paths)",
            self.state.documents() + 1,
            profile.paths.len()
        );
        self.state.merge(&profile);
    }

    /// Fold in a state built elsewhere, e.g. by [`profile_shards`].
    pub fn absorb(&mut self, other: AggregateState) {
        self.state.absorb(other);
    }

    pub fn state(&self) -> &AggregateState {
        &self.state
    }

    pub fn into_state(self) -> AggregateState {
        self.state
    }

    /// Compile the observed corpus.
    ///
    /// `declared_count` must match the number of documents observed, otherwise
    /// universal fields would be misclassified.
    pub fn finish(self, declared_count: u64, raw_indexes: &[RawIndex]) -> Result<SchemaReport> {
        let observed = self.state.documents();
        if observed != declared_count {
            log::warn!("Declared {declared_count} documents but observed {observed}");
            return Err(Error::InvalidSample { declared: declared_count, observed });
        }

        let compiled = compile_schema(&self.state, declared_count);
        let report = SchemaReport {
            row_schema: compiled.row_schema(),
            table_index: translate_indexes(raw_indexes),
            nested_schema_set: compiled.variants,
            key_frequencies: key_frequencies(&self.state, declared_count),
            documents: observed,
        };

        log::info!(
            "Analyzed {} documents: {} paths, {} columns, {} variants",
            observed,
            self.state.paths().len(),
            report.row_schema.columns.len(),
            report.nested_schema_set.len()
        );
        Ok(report)
    }
}

/// Analyze an in-memory or streamed corpus in one call.
pub fn analyze<I>(
    documents: I,
    declared_count: u64,
    raw_indexes: &[RawIndex],
    max_depth: usize,
) -> Result<SchemaReport>
where
    I: IntoIterator,
    I::Item: Borrow<Document>,
{
    let mut analyzer = SchemaAnalyzer::new(max_depth)?;
    for doc in documents {
        analyzer.observe(doc.borrow());
    }
    analyzer.finish(declared_count, raw_indexes)
}

/// Aggregate disjoint shards on scoped threads and fold the results.
pub fn profile_shards(shards: &[Vec<Document>], max_depth: usize) -> Result<AggregateState> {
    validate_max_depth(max_depth)?;

    let states: Vec<AggregateState> = std::thread::scope(|scope| {
        let handles: Vec<_> = shards
            .iter()
            .map(|shard| {
                scope.spawn(move || {
                    let mut state = AggregateState::new();
                    for doc in shard {
                        state.merge(&DocumentProfile::from_document(doc, max_depth));
                    }
                    state
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let mut total = AggregateState::new();
    for state in states {
        total.absorb(state);
    }
    Ok(total)
}
