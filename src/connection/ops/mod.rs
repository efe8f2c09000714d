//! Database operations split into focused modules.

pub mod indexes;
pub mod schema;
