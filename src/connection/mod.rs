//! MongoDB connection management and sampling operations.
//!
//! - `ConnectionManager`: owns the Tokio runtime and the blocking entry points
//! - `ops`: collection sampling and index listing

pub mod manager;
pub mod ops;

pub use manager::ConnectionManager;
