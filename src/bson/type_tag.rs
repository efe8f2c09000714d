//! Canonical type tags for BSON values and their storage encodings.

use std::fmt;

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

/// Closed classification of a BSON value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Double,
    String,
    Object,
    Array,
    BinData,
    Undefined,
    ObjectId,
    Boolean,
    Date,
    Null,
    Regex,
    #[serde(rename = "DBPointer")]
    DbPointer,
    JavaScript,
    Symbol,
    #[serde(rename = "JSWithScope")]
    JsWithScope,
    Number,
    Timestamp,
    NumberLong,
    MinKey,
    MaxKey,
}

/// Physical encoding hint derived from a [`TypeTag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageTag {
    Float64,
    /// Variable-length zero-terminated string.
    StrZero,
    Nested,
    /// Raw byte carrier.
    CarBin,
    Fixed,
    Uint08,
    Sint32,
    Sint64,
    #[serde(rename = "")]
    Empty,
}

impl TypeTag {
    /// Every tag, in wire type-code order.
    pub const ALL: [TypeTag; 20] = [
        TypeTag::Double,
        TypeTag::String,
        TypeTag::Object,
        TypeTag::Array,
        TypeTag::BinData,
        TypeTag::Undefined,
        TypeTag::ObjectId,
        TypeTag::Boolean,
        TypeTag::Date,
        TypeTag::Null,
        TypeTag::Regex,
        TypeTag::DbPointer,
        TypeTag::JavaScript,
        TypeTag::Symbol,
        TypeTag::JsWithScope,
        TypeTag::Number,
        TypeTag::Timestamp,
        TypeTag::NumberLong,
        TypeTag::MinKey,
        TypeTag::MaxKey,
    ];

    /// Classify a BSON value.
    ///
    /// Arrays are matched before documents, and the driver wrapper types (date,
    /// object id, binary, 64-bit integer, timestamp) before the generic object
    /// fallback.
    pub fn classify(value: &Bson) -> TypeTag {
        match value {
            Bson::Array(_) => TypeTag::Array,
            Bson::Null => TypeTag::Null,
            Bson::Undefined => TypeTag::Undefined,
            Bson::Timestamp(_) => TypeTag::Timestamp,
            Bson::Int64(_) => TypeTag::NumberLong,
            Bson::DateTime(_) => TypeTag::Date,
            Bson::ObjectId(_) => TypeTag::ObjectId,
            Bson::Binary(_) => TypeTag::BinData,
            Bson::Boolean(_) => TypeTag::Boolean,
            Bson::Int32(_) => TypeTag::Number,
            Bson::Double(_) | Bson::Decimal128(_) => TypeTag::Double,
            Bson::String(_) => TypeTag::String,
            Bson::RegularExpression(_) => TypeTag::Regex,
            Bson::JavaScriptCode(_) => TypeTag::JavaScript,
            Bson::JavaScriptCodeWithScope(_) => TypeTag::JsWithScope,
            Bson::Symbol(_) => TypeTag::Symbol,
            Bson::DbPointer(_) => TypeTag::DbPointer,
            Bson::MinKey => TypeTag::MinKey,
            Bson::MaxKey => TypeTag::MaxKey,
            Bson::Document(_) => TypeTag::Object,
            #[allow(unreachable_patterns)]
            _ => TypeTag::Object,
        }
    }

    /// Numeric union code, mirroring the BSON wire type codes.
    pub fn union_code(self) -> i32 {
        match self {
            TypeTag::Double => 1,
            TypeTag::String => 2,
            TypeTag::Object => 3,
            TypeTag::Array => 4,
            TypeTag::BinData => 5,
            TypeTag::Undefined => 6,
            TypeTag::ObjectId => 7,
            TypeTag::Boolean => 8,
            TypeTag::Date => 9,
            TypeTag::Null => 10,
            TypeTag::Regex => 11,
            TypeTag::DbPointer => 12,
            TypeTag::JavaScript => 13,
            TypeTag::Symbol => 14,
            TypeTag::JsWithScope => 15,
            TypeTag::Number => 16,
            TypeTag::Timestamp => 17,
            TypeTag::NumberLong => 18,
            TypeTag::MinKey => -1,
            TypeTag::MaxKey => 127,
        }
    }

    pub fn storage_tag(self) -> StorageTag {
        match self {
            TypeTag::Double => StorageTag::Float64,
            TypeTag::String | TypeTag::Symbol => StorageTag::StrZero,
            TypeTag::Object | TypeTag::Array => StorageTag::Nested,
            TypeTag::BinData | TypeTag::JsWithScope => StorageTag::CarBin,
            TypeTag::ObjectId => StorageTag::Fixed,
            TypeTag::Boolean => StorageTag::Uint08,
            TypeTag::Number => StorageTag::Sint32,
            TypeTag::Date | TypeTag::Timestamp | TypeTag::NumberLong => StorageTag::Sint64,
            TypeTag::Null
            | TypeTag::Undefined
            | TypeTag::Regex
            | TypeTag::DbPointer
            | TypeTag::JavaScript
            | TypeTag::MinKey
            | TypeTag::MaxKey => StorageTag::Empty,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TypeTag::Double => "Double",
            TypeTag::String => "String",
            TypeTag::Object => "Object",
            TypeTag::Array => "Array",
            TypeTag::BinData => "BinData",
            TypeTag::Undefined => "Undefined",
            TypeTag::ObjectId => "ObjectId",
            TypeTag::Boolean => "Boolean",
            TypeTag::Date => "Date",
            TypeTag::Null => "Null",
            TypeTag::Regex => "Regex",
            TypeTag::DbPointer => "DBPointer",
            TypeTag::JavaScript => "JavaScript",
            TypeTag::Symbol => "Symbol",
            TypeTag::JsWithScope => "JSWithScope",
            TypeTag::Number => "Number",
            TypeTag::Timestamp => "Timestamp",
            TypeTag::NumberLong => "NumberLong",
            TypeTag::MinKey => "MinKey",
            TypeTag::MaxKey => "MaxKey",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl StorageTag {
    pub fn label(self) -> &'static str {
        match self {
            StorageTag::Float64 => "Float64",
            StorageTag::StrZero => "StrZero",
            StorageTag::Nested => "Nested",
            StorageTag::CarBin => "CarBin",
            StorageTag::Fixed => "Fixed",
            StorageTag::Uint08 => "Uint08",
            StorageTag::Sint32 => "Sint32",
            StorageTag::Sint64 => "Sint64",
            StorageTag::Empty => "",
        }
    }
}

impl fmt::Display for StorageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
