//! Parameter constraint patterns and the compiled-regex cache.
//!
//! A parameter segment is written `:name` or `:name[pattern]`. The pattern is
//! compiled lazily, the first time a request reaches the node, and memoized
//! by its source text. Patterns come from route registration so the cache is
//! a small, bounded set; entries are never evicted.
//!
//! ## Thread Safety
//!
//! The cache is backed by a [`DashMap`], so concurrent lookups on the request
//! path only take a shard read lock. A miss compiles outside any lock and
//! then inserts with a double-check, so two threads racing on the same
//! pattern end up sharing one compiled matcher. Matchers are handed out as
//! `Arc<Regex>`: a cloned `Regex` would start with an empty scratch pool and
//! allocate a fresh one on its first match.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marks a segment as a named parameter
pub const PARAM_SIGIL: char = ':';
const PATTERN_OPEN: char = '[';
const PATTERN_CLOSE: char = ']';

static GLOBAL_CACHE: Lazy<Arc<PatternCache>> = Lazy::new(|| Arc::new(PatternCache::new()));

/// A constraint pattern that failed to compile
#[derive(Debug, Clone)]
pub struct PatternError {
    /// The pattern text as written between `[` and `]`
    pub source_pattern: String,
    /// The error reported by the regex compiler
    pub error: regex::Error,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid parameter pattern '{}': {}",
            self.source_pattern, self.error
        )
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Thread-safe memo of compiled parameter constraints, keyed by source text.
///
/// Failed compiles are remembered too, so a malformed constraint is compiled
/// and reported once rather than on every request that reaches it.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: DashMap<String, Result<Arc<Regex>, PatternError>>,
}

impl PatternCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by every [`Tree`](super::Tree) built
    /// with [`Tree::new`](super::Tree::new)
    #[must_use]
    pub fn global() -> Arc<PatternCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Return the compiled matcher for `source`, compiling it on first use.
    ///
    /// The matcher is anchored on both ends, so a segment only matches when
    /// the whole segment text matches `source`. Every caller shares the one
    /// compiled `Regex` (and its match-scratch pool) through the `Arc`.
    ///
    /// # Errors
    ///
    /// Returns the compile error for a malformed `source`. The error is
    /// cached and logged at `warn` only when first seen.
    pub fn resolve(&self, source: &str) -> Result<Arc<Regex>, PatternError> {
        if let Some(hit) = self.compiled.get(source) {
            return hit.value().clone();
        }

        let outcome = match Regex::new(&format!("^(?:{source})$")) {
            Ok(re) => {
                debug!(pattern = %source, "Compiled parameter pattern");
                Ok(Arc::new(re))
            }
            Err(error) => {
                warn!(
                    pattern = %source,
                    error = %error,
                    "Parameter pattern failed to compile; segments will not match"
                );
                Err(PatternError {
                    source_pattern: source.to_string(),
                    error,
                })
            }
        };

        // Another thread may have won the race while we compiled.
        self.compiled
            .entry(source.to_string())
            .or_insert(outcome)
            .value()
            .clone()
    }

    /// Whether `source` has compiled successfully
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.compiled
            .get(source)
            .is_some_and(|entry| entry.value().is_ok())
    }

    /// Whether `source` was tried and failed to compile
    #[must_use]
    pub fn is_rejected(&self, source: &str) -> bool {
        self.compiled
            .get(source)
            .is_some_and(|entry| entry.value().is_err())
    }

    /// Number of successfully compiled patterns held
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled
            .iter()
            .filter(|entry| entry.value().is_ok())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the constraint pattern from a parameter label.
///
/// `:id[^\d+$]` → `Some("^\d+$")`, `:id` → `None`. A label without both
/// brackets, or with `]` before `[`, carries no constraint.
#[must_use]
pub fn pattern_of(label: &str) -> Option<&str> {
    let open = label.find(PATTERN_OPEN)?;
    let close = label.find(PATTERN_CLOSE)?;
    if close < open {
        return None;
    }
    Some(&label[open + 1..close])
}

/// Extract the parameter name from a parameter label.
///
/// The name runs from just after the sigil up to the first `[`, or to the
/// end of the label: `:id[^\d+$]` → `id`, `:id]` → `id]`.
#[must_use]
pub fn param_name_of(label: &str) -> &str {
    let start = label.find(PARAM_SIGIL).map_or(0, |i| i + PARAM_SIGIL.len_utf8());
    let end = label[start..]
        .find(PATTERN_OPEN)
        .map_or(label.len(), |i| start + i);
    &label[start..end]
}

/// Whether a segment label declares a parameter
#[inline]
#[must_use]
pub fn is_param(label: &str) -> bool {
    label.starts_with(PARAM_SIGIL)
}
