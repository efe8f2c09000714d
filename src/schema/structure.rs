//! Structural projection: a depth-bounded field → type tree.
//!
//! Unlike [`flatten_document`](super::flatten_document), the projection keeps one
//! nesting level per step so that nested column trees can be rebuilt later.
//! Only `Object` values are descended into; arrays stay opaque.

use std::collections::BTreeMap;

use mongodb::bson::{Bson, Document};

use crate::bson::{TypeTag, normalize_path};

/// Field name → observed types, one nesting level per shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    pub fields: BTreeMap<String, ShapeField>,
}

/// Types observed for one field. `Object` types carry their sub-shape when the
/// depth budget allowed descending into them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShapeField {
    pub types: BTreeMap<TypeTag, Option<Shape>>,
}

impl Shape {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Union another shape into this one.
    pub fn merge(&mut self, other: &Shape) {
        for (name, field) in &other.fields {
            self.fields.entry(name.clone()).or_default().merge(field);
        }
    }

    fn observe(&mut self, name: String, value: &Bson, depth: usize) {
        let tag = TypeTag::classify(value);
        let child = match value {
            Bson::Document(nested) if depth > 1 => Some(project_document(nested, depth - 1)),
            _ => None,
        };
        let mut field = ShapeField::default();
        field.types.insert(tag, child);
        self.fields.entry(name).or_default().merge(&field);
    }
}

impl ShapeField {
    pub fn merge(&mut self, other: &ShapeField) {
        for (tag, child) in &other.types {
            let slot = self.types.entry(*tag).or_insert(None);
            if let Some(incoming) = child {
                match slot {
                    Some(existing) => existing.merge(incoming),
                    None => *slot = Some(incoming.clone()),
                }
            }
        }
    }

    /// The single observed type, if the field is monomorphic.
    pub fn sole_type(&self) -> Option<(TypeTag, Option<&Shape>)> {
        if self.types.len() != 1 {
            return None;
        }
        self.types.iter().next().map(|(tag, child)| (*tag, child.as_ref()))
    }
}

/// Project a document into its structural shape.
///
/// Top-level keys are index-normalized the same way flattened paths are, so
/// both views key identically.
pub fn project_document(doc: &Document, max_depth: usize) -> Shape {
    let mut shape = Shape::default();
    for (key, value) in doc {
        shape.observe(normalize_path(key).into_owned(), value, max_depth);
    }
    shape
}
