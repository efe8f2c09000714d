//! Depth-bounded flattening of documents into dotted paths.

use std::collections::{BTreeMap, BTreeSet};

use mongodb::bson::{Bson, Document};

use crate::bson::{TypeTag, join_path, normalize_path};

/// Observed type tags per normalized path for a single document.
pub type PathTypes = BTreeMap<String, BTreeSet<TypeTag>>;

/// Flatten a document into dotted paths, keeping every level.
///
/// Each field is recorded at its own path, and nested documents and arrays are
/// also descended into while more than one level of depth remains. A parent and
/// its children therefore all appear in the output. Array elements are keyed by
/// their index (`tags.0`). Driver wrapper values are leaves.
pub fn flatten_document(doc: &Document, max_depth: usize) -> BTreeMap<String, &Bson> {
    let mut result = BTreeMap::new();
    flatten_document_ref(doc, "", max_depth, &mut result);
    result
}

fn flatten_document_ref<'a>(
    doc: &'a Document,
    prefix: &str,
    depth: usize,
    result: &mut BTreeMap<String, &'a Bson>,
) {
    for (key, value) in doc {
        let path = join_path(prefix, key);
        flatten_value_ref(value, &path, depth, result);
    }
}

fn flatten_value_ref<'a>(
    value: &'a Bson,
    path: &str,
    depth: usize,
    result: &mut BTreeMap<String, &'a Bson>,
) {
    result.insert(path.to_string(), value);
    if depth <= 1 {
        return;
    }

    match value {
        Bson::Document(nested) => flatten_document_ref(nested, path, depth - 1, result),
        Bson::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value_ref(item, &format!("{path}.{index}"), depth - 1, result);
            }
        }
        _ => {}
    }
}

/// Classify a flattened document, merging array-index paths under `XX`.
pub fn classify_paths(flat: &BTreeMap<String, &Bson>) -> PathTypes {
    let mut result = PathTypes::new();
    for (path, value) in flat {
        result
            .entry(normalize_path(path).into_owned())
            .or_default()
            .insert(TypeTag::classify(value));
    }
    result
}
