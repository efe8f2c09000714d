//! Compilation of aggregated statistics into a row schema and a variant catalog.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::aggregate::{AggregateState, PerPathStat};
use super::structure::{Shape, ShapeField};
use crate::bson::{StorageTag, TypeTag};

/// Name of the catch-all column.
pub const CATCH_ALL_COLUMN: &str = "$$";

/// Byte length of an ObjectId.
pub const OBJECT_ID_LENGTH: u32 = 12;

/// One compiled column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledColumn {
    pub storage_type: StorageTag,
    /// Absent for polymorphic columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union_type_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<BTreeMap<String, CompiledColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl CompiledColumn {
    /// Plain storage-tag / union-code pair for a monomorphic value.
    pub fn scalar(tag: TypeTag) -> Self {
        Self {
            storage_type: tag.storage_tag(),
            union_type_code: Some(tag.union_code()),
            nested: None,
            length: None,
        }
    }

    /// Column for a value that took several types.
    pub fn polymorphic() -> Self {
        Self { storage_type: StorageTag::CarBin, union_type_code: None, nested: None, length: None }
    }

    fn object(shape: Option<&Shape>) -> Self {
        Self {
            nested: Some(shape.map(compile_shape).unwrap_or_default()),
            ..Self::scalar(TypeTag::Object)
        }
    }
}

/// The `$$` column: a raw byte carrier for everything without its own column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchAllColumn {
    pub storage_type: StorageTag,
    /// Names of non-universal fields. Only the top-level row schema lists them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeSet<String>>,
}

impl CatchAllColumn {
    pub fn with_fields(fields: BTreeSet<String>) -> Self {
        Self { storage_type: StorageTag::CarBin, fields: Some(fields) }
    }

    pub fn marker() -> Self {
        Self { storage_type: StorageTag::CarBin, fields: None }
    }
}

/// Named columns plus the catch-all column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowSchema {
    #[serde(flatten)]
    pub columns: BTreeMap<String, CompiledColumn>,
    #[serde(rename = "$$")]
    pub catch_all: CatchAllColumn,
}

impl RowSchema {
    pub fn column(&self, name: &str) -> Option<&CompiledColumn> {
        self.columns.get(name)
    }

    /// Field names recorded in the catch-all column.
    pub fn catch_all_fields(&self) -> impl Iterator<Item = &str> {
        self.catch_all.fields.iter().flatten().map(String::as_str)
    }
}

/// Nested schema compiled for a partially present object field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariantSchemaEntry {
    /// Top-level field the shape was observed under.
    pub field: String,
    pub columns: RowSchema,
}

/// Output of [`compile_schema`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledSchema {
    pub columns: BTreeMap<String, CompiledColumn>,
    pub catch_all: BTreeSet<String>,
    /// Keyed 1, 2, 3, ... in compilation order.
    pub variants: BTreeMap<u32, VariantSchemaEntry>,
}

impl CompiledSchema {
    pub fn row_schema(&self) -> RowSchema {
        RowSchema {
            columns: self.columns.clone(),
            catch_all: CatchAllColumn::with_fields(self.catch_all.clone()),
        }
    }
}

/// Compile top-level field statistics.
///
/// Every field lands in exactly one place: a column when it occurs in all
/// `document_count` documents, a variant entry when it is a partially present
/// object, and the catch-all set otherwise. A field named `$$` always goes to
/// the catch-all set. Variants are not de-duplicated.
pub fn compile_schema(state: &AggregateState, document_count: u64) -> CompiledSchema {
    let mut compiled = CompiledSchema::default();
    let mut next_variant = 1u32;

    for (name, stat) in state.fields() {
        if name == CATCH_ALL_COLUMN {
            compiled.catch_all.insert(name.clone());
        } else if stat.is_universal(document_count) {
            compiled.columns.insert(name.clone(), compile_field(stat, state.shape(name)));
        } else if stat.sole_type() == Some(TypeTag::Object) {
            let nested = state.shape(name).map(compile_shape).unwrap_or_default();
            compiled.variants.insert(
                next_variant,
                VariantSchemaEntry { field: name.clone(), columns: variant_row_schema(nested) },
            );
            next_variant += 1;
        } else {
            compiled.catch_all.insert(name.clone());
        }
    }

    compiled
}

/// A member literally named `$$` cannot share the catch-all key, so it is listed
/// in the catch-all column instead.
fn variant_row_schema(mut columns: BTreeMap<String, CompiledColumn>) -> RowSchema {
    let catch_all = match columns.remove(CATCH_ALL_COLUMN) {
        Some(_) => CatchAllColumn::with_fields(BTreeSet::from([CATCH_ALL_COLUMN.to_string()])),
        None => CatchAllColumn::marker(),
    };
    RowSchema { columns, catch_all }
}

fn compile_field(stat: &PerPathStat, shape: Option<&Shape>) -> CompiledColumn {
    match stat.sole_type() {
        Some(TypeTag::ObjectId) => CompiledColumn {
            length: Some(OBJECT_ID_LENGTH),
            ..CompiledColumn::scalar(TypeTag::ObjectId)
        },
        Some(TypeTag::Object) => CompiledColumn::object(shape),
        Some(tag) => CompiledColumn::scalar(tag),
        None => CompiledColumn::polymorphic(),
    }
}

/// Compile a structural shape into nested columns.
pub fn compile_shape(shape: &Shape) -> BTreeMap<String, CompiledColumn> {
    shape.fields.iter().map(|(name, field)| (name.clone(), compile_member(field))).collect()
}

fn compile_member(field: &ShapeField) -> CompiledColumn {
    match field.sole_type() {
        Some((TypeTag::Object, child)) => CompiledColumn::object(child),
        Some((tag, _)) => CompiledColumn::scalar(tag),
        None => CompiledColumn::polymorphic(),
    }
}
