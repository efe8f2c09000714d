//! Schema inference: flatten, project, aggregate, compile.

pub mod aggregate;
pub mod analyzer;
pub mod compile;
pub mod flatten;
pub mod index;
pub mod report;
pub mod structure;

pub use aggregate::{AggregateState, DocumentProfile, PerPathStat};
pub use analyzer::{SchemaAnalyzer, analyze, profile_shards, validate_max_depth};
pub use compile::{
    CATCH_ALL_COLUMN, CatchAllColumn, CompiledColumn, CompiledSchema, RowSchema, VariantSchemaEntry,
    compile_schema, compile_shape,
};
pub use flatten::{PathTypes, classify_paths, flatten_document};
pub use index::{IndexDescriptor, PRIMARY_KEY_INDEX, RawIndex, translate_index, translate_indexes};
pub use report::{KeyFrequency, SchemaReport, key_frequencies, render_ascii_table};
pub use structure::{Shape, ShapeField, project_document};
