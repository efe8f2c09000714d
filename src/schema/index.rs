//! Translation of collection indexes into compact descriptors.

use mongodb::IndexModel;
use mongodb::bson::{Bson, Document};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Name of the index the server builds on `_id`.
pub const PRIMARY_KEY_INDEX: &str = "_id_";

const HASHED: &str = "hashed";

/// Index definition as reported by `listIndexes`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawIndex {
    pub name: String,
    /// Key fields in declaration order, mapped to a direction or index kind.
    pub key: Document,
    pub unique: Option<Bson>,
}

impl RawIndex {
    /// Read a raw `listIndexes` entry.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let name = doc
            .get_str("name")
            .map_err(|_| Error::Parse("index entry has no string `name`".to_string()))?;
        let key = doc
            .get_document("key")
            .map_err(|_| Error::Parse(format!("index `{name}` has no `key` document")))?;
        Ok(Self { name: name.to_string(), key: key.clone(), unique: doc.get("unique").cloned() })
    }
}

impl From<&IndexModel> for RawIndex {
    fn from(model: &IndexModel) -> Self {
        let options = model.options.as_ref();
        let name = options
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| default_index_name(&model.keys));
        let unique = options.and_then(|o| o.unique).map(Bson::Boolean);
        Self { name, key: model.keys.clone(), unique }
    }
}

/// Server-style generated name, e.g. `a_1_b_-1`.
fn default_index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(field, direction)| match direction {
            Bson::String(kind) => format!("{field}_{kind}"),
            Bson::Int32(n) => format!("{field}_{n}"),
            Bson::Int64(n) => format!("{field}_{n}"),
            Bson::Double(n) => format!("{field}_{n}"),
            other => format!("{field}_{other}"),
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Compact description of one secondary index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexDescriptor {
    /// `+name` ascending, `-name` descending, bare `name` for hashed and
    /// other unordered kinds.
    #[serde(serialize_with = "serialize_fields")]
    pub fields: Vec<String>,
    pub ordered: bool,
    pub unique: bool,
}

impl IndexDescriptor {
    pub fn fields_joined(&self) -> String {
        self.fields.join(",")
    }
}

fn serialize_fields<S: Serializer>(fields: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&fields.join(","))
}

enum KeyDirection {
    Ascending,
    Descending,
    Unordered,
}

fn key_direction(value: &Bson) -> KeyDirection {
    let negative = match value {
        Bson::Int32(n) => *n < 0,
        Bson::Int64(n) => *n < 0,
        Bson::Double(n) => *n < 0.0,
        Bson::String(_) => return KeyDirection::Unordered,
        _ => false,
    };
    if negative { KeyDirection::Descending } else { KeyDirection::Ascending }
}

/// Translate one raw index.
pub fn translate_index(raw: &RawIndex) -> IndexDescriptor {
    let mut fields = Vec::with_capacity(raw.key.len());
    let mut ordered = true;

    for (field, direction) in &raw.key {
        match key_direction(direction) {
            KeyDirection::Ascending => fields.push(format!("+{field}")),
            KeyDirection::Descending => fields.push(format!("-{field}")),
            KeyDirection::Unordered => {
                if direction.as_str() != Some(HASHED) {
                    log::debug!("Index `{}` field `{field}` has kind {direction}", raw.name);
                }
                fields.push(field.clone());
                ordered = false;
            }
        }
    }

    let unique = matches!(raw.unique, Some(Bson::Boolean(true)));
    IndexDescriptor { fields, ordered, unique }
}

/// Translate every index except the primary-key index.
pub fn translate_indexes<'a>(raw: impl IntoIterator<Item = &'a RawIndex>) -> Vec<IndexDescriptor> {
    raw.into_iter()
        .filter(|index| {
            let primary = index.name == PRIMARY_KEY_INDEX;
            if primary {
                log::debug!("Skipping primary-key index");
            }
            !primary
        })
        .map(translate_index)
        .collect()
}
