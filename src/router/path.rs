//! Path normalization shared by registration and lookup.
//!
//! Both [`Tree::insert`](super::Tree::insert) and
//! [`Tree::search`](super::Tree::search) run their input through
//! [`clean_path`] and then [`split_segments`], so a route registered as
//! `/foo/` is reachable as `/foo` and `/foo/`, and `//foo/./bar/../` lands on
//! the same node as `/foo/`.

use std::borrow::Cow;

const DELIMITER: char = '/';

/// Canonicalize a request path.
///
/// - An empty path becomes `/`; a missing leading `/` is added
/// - Runs of `/` collapse to one
/// - `.` segments are dropped, `..` removes the previous segment (never above root)
/// - A trailing `/` survives when the input had one and the result is not `/`
///
/// Paths that are already canonical are returned borrowed.
#[must_use]
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if is_clean(path) {
        return Cow::Borrowed(path);
    }

    let mut stack: Vec<&str> = Vec::with_capacity(path.len() / 2 + 1);
    for segment in path.split(DELIMITER) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &stack {
        cleaned.push(DELIMITER);
        cleaned.push_str(segment);
    }
    if stack.is_empty() || path.ends_with(DELIMITER) {
        cleaned.push(DELIMITER);
    }

    Cow::Owned(cleaned)
}

/// Whether `path` is already in the form [`clean_path`] would produce.
fn is_clean(path: &str) -> bool {
    if !path.starts_with(DELIMITER) {
        return false;
    }
    if path == "/" {
        return true;
    }
    let body = path.strip_suffix(DELIMITER).unwrap_or(path);
    body[1..]
        .split(DELIMITER)
        .all(|s| !s.is_empty() && s != "." && s != "..")
}

/// Iterate over the non-empty `/`-delimited segments of `path`.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(DELIMITER).filter(|s| !s.is_empty())
}
