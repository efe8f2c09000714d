//! BSON utilities for value classification and path handling.

mod path;
mod type_tag;

pub use path::*;
pub use type_tag::*;
