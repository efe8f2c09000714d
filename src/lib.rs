//! Sampling schema analyzer for MongoDB collections.

pub mod bson;
pub mod config;
pub mod connection;
pub mod error;
pub mod hooks;
pub mod schema;

pub use error::{Error, Result};
