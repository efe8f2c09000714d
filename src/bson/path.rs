//! Dotted field paths and array-index normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Placeholder that replaces numeric path segments.
pub const INDEX_WILDCARD: &str = "XX";

static INDEX_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d+").expect("index segment pattern is valid"));

/// Join a parent path and a key with a dot. An empty prefix yields the key.
pub fn join_path<'a>(prefix: &str, key: &'a str) -> Cow<'a, str> {
    if prefix.is_empty() { Cow::Borrowed(key) } else { Cow::Owned(format!("{prefix}.{key}")) }
}

/// Replace every `.digits` run with `.XX` so sibling array elements share a path.
///
/// Numeric-named object keys are merged the same way.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    INDEX_SEGMENT.replace_all(path, ".XX")
}

/// True when the last path segment is the array-index wildcard.
pub fn ends_with_wildcard(path: &str) -> bool {
    path.strip_suffix(INDEX_WILDCARD).is_some_and(|rest| rest.ends_with('.'))
}
