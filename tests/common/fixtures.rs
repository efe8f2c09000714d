//! Test fixtures for integration tests.

#![allow(dead_code)]

use mongodb::bson::{
    Binary, Bson, DateTime, Document, JavaScriptCodeWithScope, Regex, Timestamp, doc,
    oid::ObjectId, spec::BinarySubtype,
};

/// The two-document corpus used throughout: `age` is present in one document only.
pub fn people() -> Vec<Document> {
    vec![doc! { "_id": 1, "name": "a" }, doc! { "_id": 2, "name": "b", "age": 5 }]
}

/// Generate a batch of uniform documents with a nested object and an array.
pub fn generate_test_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "_id": ObjectId::new(),
                "index": i as i32,
                "name": format!("Document {}", i),
                "category": if i % 2 == 0 { "even" } else { "odd" },
                "nested": {
                    "field": format!("nested_{}", i),
                    "number": i as i32,
                },
                "tags": ["a", "b"],
            }
        })
        .collect()
}

/// Orders with optional, partially present sub-documents and a polymorphic field.
pub fn orders() -> Vec<Document> {
    vec![
        doc! {
            "_id": 1,
            "total": 9.5,
            "status": "open",
            "shipping": { "city": "Oslo", "zip": "0150" },
            "items": [{ "sku": "x", "qty": 1 }, { "sku": "y", "qty": 2 }],
        },
        doc! {
            "_id": 2,
            "total": 12.0,
            "status": 3,
            "billing": { "card": "visa" },
            "items": [],
        },
        doc! {
            "_id": 3,
            "total": 4.25,
            "status": null,
            "shipping": { "city": "Bergen" },
            "items": [{ "sku": "z", "qty": 5 }],
        },
    ]
}

/// A document with one value of every classified type.
pub fn document_with_all_types() -> Document {
    doc! {
        "double": 1.5,
        "string": "hello world",
        "object": { "k": "v" },
        "array": [1, 2],
        "binary": Binary { subtype: BinarySubtype::Generic, bytes: vec![1, 2, 3] },
        "undefined": Bson::Undefined,
        "oid": ObjectId::new(),
        "boolean": true,
        "date": DateTime::now(),
        "null": null,
        "regex": Regex { pattern: "^a".to_string(), options: "i".to_string() },
        "code": Bson::JavaScriptCode("function() {}".to_string()),
        "symbol": Bson::Symbol("sym".to_string()),
        "scoped": Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
            code: "function() { return x; }".to_string(),
            scope: doc! { "x": 1 },
        }),
        "int32": 42_i32,
        "timestamp": Timestamp { time: 1, increment: 1 },
        "int64": 9_000_000_000_000_i64,
        "min": Bson::MinKey,
        "max": Bson::MaxKey,
    }
}
