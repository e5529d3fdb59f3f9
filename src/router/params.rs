//! Extracted path parameters and request-side access to them.
//!
//! The trie fills a pooled `Vec<Param>` while it walks the path. Before the
//! handler runs, the router moves those into an owned [`Params`] value and
//! stores it in the request's [`http::Extensions`]; handlers read them back
//! with [`get_param`].

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path parameters stored inline before spilling to the heap.
/// Most routes declare four or fewer (e.g. `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// One extracted path parameter.
///
/// `key` is shared with the trie node that declared it, so building a `Param`
/// only allocates for the value taken from the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name without sigil or constraint (`:id[^\d+$]` → `id`)
    pub key: Arc<str>,
    /// The path segment that matched
    pub value: String,
}

impl Param {
    #[must_use]
    pub fn new(key: impl Into<Arc<str>>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Inline-allocated parameter list
pub type ParamVec = SmallVec<[Param; MAX_INLINE_PARAMS]>;

/// Parameters extracted for one request, in declaration order.
///
/// Stored as a request extension by [`Router::serve`](super::Router::serve).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter value by name.
    ///
    /// If the same name is declared at several depths, the first one wins.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key.as_ref() == name)
            .map(|p| p.value.as_str())
    }

    pub fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Param] {
        &self.0
    }
}

impl From<&[Param]> for Params {
    fn from(params: &[Param]) -> Self {
        Self(params.iter().cloned().collect())
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Read a path parameter from a routed request.
///
/// Returns `""` when the parameter is absent or when the request carries no
/// parameters at all.
#[must_use]
pub fn get_param<'a, B>(req: &'a http::Request<B>, name: &str) -> &'a str {
    req.extensions()
        .get::<Params>()
        .and_then(|params| params.get(name))
        .unwrap_or("")
}
