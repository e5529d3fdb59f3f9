//! Segment trie for HTTP route matching
//!
//! Each node of the tree is one `/`-delimited path segment. Lookup walks one
//! node per request segment, so matching cost grows with path depth rather
//! than with the number of registered routes.
//!
//! ## Node kinds
//!
//! - **Static** (`users`): matched by exact text
//! - **Parameter** (`:id`): matches any single non-empty segment
//! - **Constrained parameter** (`:id[^\d+$]`): matches when the whole segment
//!   matches the pattern
//!
//! Actions are stored on the terminal node, one per HTTP method.
//!
//! ## Priority
//!
//! At every depth a static child whose label equals the segment wins. If none
//! does, the parameter children are tried in registration order and the FIRST
//! one decides: if its constraint rejects the segment the search fails without
//! looking at later parameter siblings. Registering
//!
//! ```text
//! /:id[^\d+$]
//! /:id[^\D+$]
//! ```
//!
//! means `/42` matches the first route and `/abc` matches nothing.
//! Children keep explicit insertion order so this is deterministic.

use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::params::Param;
use super::path::{clean_path, split_segments};
use super::pattern::{is_param, param_name_of, pattern_of, PatternCache};
use super::pool::{ParamPool, PooledParams};
use crate::handler::SharedHandler;
use crate::middleware::SharedMiddleware;

/// Default number of idle parameter buffers a tree's pool retains
pub const DEFAULT_POOL_MAX_IDLE: usize = 1024;

/// Errors from registering or looking up a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No node, or no action for any method, exists for the path
    NotFound,
    /// The path resolves to a node with actions, but none for this method
    MethodNotAllowed,
    /// A route was registered without any methods
    NoMethods {
        /// The pattern being registered
        pattern: String,
    },
    /// A parameter segment declares no name (`:` or `:[...]`)
    InvalidParam {
        /// The pattern being registered
        pattern: String,
        /// The offending segment
        segment: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NotFound => write!(f, "no matching route was found"),
            RouteError::MethodNotAllowed => write!(f, "method is not allowed"),
            RouteError::NoMethods { pattern } => {
                write!(f, "route '{}' was registered without any methods", pattern)
            }
            RouteError::InvalidParam { pattern, segment } => write!(
                f,
                "route '{}' has a parameter segment '{}' without a name",
                pattern, segment
            ),
        }
    }
}

impl std::error::Error for RouteError {}

/// Handler and middleware registered for one method on one node
#[derive(Clone)]
pub struct Action {
    /// Terminal handler
    pub handler: SharedHandler,
    /// Route middleware, outermost first
    pub middlewares: Vec<SharedMiddleware>,
    /// The pattern this action was registered under
    pub pattern: Arc<str>,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("pattern", &self.pattern)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

/// A successful lookup: the action plus the parameters extracted on the way
#[derive(Debug)]
pub struct RouteMatch<'t> {
    /// The action registered for the requested method
    pub action: &'t Action,
    /// Parameters in declaration order; the buffer returns to the pool on drop
    pub params: PooledParams<'t>,
}

impl RouteMatch<'_> {
    /// Look up an extracted parameter by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key.as_ref() == name)
            .map(|p| p.value.as_str())
    }
}

#[derive(Debug)]
enum NodeKind {
    Static,
    Param {
        name: Arc<str>,
        pattern: Option<Box<str>>,
    },
}

/// One path segment in the tree
#[derive(Debug)]
struct Node {
    label: Box<str>,
    kind: NodeKind,
    actions: HashMap<Method, Action>,
    /// Children in registration order
    children: Vec<Node>,
    /// Label → position in `children`
    index: HashMap<Box<str>, usize>,
}

impl Node {
    fn new(label: &str) -> Self {
        let kind = if is_param(label) {
            NodeKind::Param {
                name: Arc::from(param_name_of(label)),
                pattern: pattern_of(label).map(Box::from),
            }
        } else {
            NodeKind::Static
        };
        Self {
            label: Box::from(label),
            kind,
            actions: HashMap::new(),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn root() -> Self {
        Self::new("/")
    }

    /// Return the child with exactly `label`, creating it if absent
    fn child_mut(&mut self, label: &str) -> &mut Node {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = self.children.len();
                self.children.push(Node::new(label));
                self.index.insert(Box::from(label), idx);
                idx
            }
        };
        &mut self.children[idx]
    }

    fn static_child(&self, segment: &str) -> Option<&Node> {
        self.index.get(segment).map(|&idx| &self.children[idx])
    }

    /// The first parameter child in registration order
    fn first_param_child(&self) -> Option<&Node> {
        self.children
            .iter()
            .find(|c| matches!(c.kind, NodeKind::Param { .. }))
    }
}

/// Routing trie keyed by path segment
pub struct Tree {
    root: Node,
    patterns: Arc<PatternCache>,
    pool: Option<ParamPool>,
    max_params: usize,
    pool_max_idle: usize,
    routes: usize,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("routes", &self.routes)
            .field("max_params", &self.max_params)
            .field("pooled", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree that shares the process-wide pattern cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(PatternCache::global(), DEFAULT_POOL_MAX_IDLE)
    }

    /// Create an empty tree with its own pattern cache and pool bound
    #[must_use]
    pub fn with_cache(patterns: Arc<PatternCache>, pool_max_idle: usize) -> Self {
        Self {
            root: Node::root(),
            patterns,
            pool: None,
            max_params: 0,
            pool_max_idle,
            routes: 0,
        }
    }

    /// Register `handler` and `middlewares` for every method in `methods` at `pattern`.
    ///
    /// An existing action for the same method and node is replaced: the last
    /// registration for an exact pattern wins. Replacing does not move the
    /// node, so its position in the parameter scan order is unchanged.
    pub fn insert(
        &mut self,
        methods: &[Method],
        pattern: &str,
        handler: SharedHandler,
        middlewares: Vec<SharedMiddleware>,
    ) -> Result<(), RouteError> {
        if methods.is_empty() {
            return Err(RouteError::NoMethods {
                pattern: pattern.to_string(),
            });
        }

        let cleaned = clean_path(pattern);
        let mut param_count = 0;
        for segment in split_segments(&cleaned) {
            if is_param(segment) {
                if param_name_of(segment).is_empty() {
                    return Err(RouteError::InvalidParam {
                        pattern: pattern.to_string(),
                        segment: segment.to_string(),
                    });
                }
                param_count += 1;
            }
        }

        let mut node = &mut self.root;
        for segment in split_segments(&cleaned) {
            node = node.child_mut(segment);
        }

        let action = Action {
            handler,
            middlewares,
            pattern: Arc::from(pattern),
        };
        for method in methods {
            if let Some(previous) = node.actions.insert(method.clone(), action.clone()) {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    previous_pattern = %previous.pattern,
                    "Route already registered; replacing its action"
                );
            }
        }

        if param_count > self.max_params {
            self.max_params = param_count;
            self.pool = Some(ParamPool::new(param_count, self.pool_max_idle));
            debug!(
                max_params = param_count,
                "Resized parameter pool for new maximum"
            );
        }
        self.routes += 1;

        info!(
            methods = ?methods,
            pattern = %pattern,
            param_count = param_count,
            "Route registered"
        );
        Ok(())
    }

    /// Find the action for `method` at `path` and extract its parameters.
    ///
    /// # Errors
    ///
    /// - [`RouteError::NotFound`] when no node matches the path, when a
    ///   parameter constraint rejects a segment, or when the node carries no
    ///   actions at all
    /// - [`RouteError::MethodNotAllowed`] when the node has actions but not
    ///   one for `method`
    pub fn search(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        let cleaned = clean_path(path);
        let mut params = match &self.pool {
            Some(pool) => pool.acquire(),
            None => PooledParams::unpooled(),
        };

        let mut node = &self.root;
        for segment in split_segments(&cleaned) {
            if let Some(child) = node.static_child(segment) {
                node = child;
                continue;
            }

            let Some(candidate) = node.first_param_child() else {
                return Err(RouteError::NotFound);
            };
            let NodeKind::Param { name, pattern } = &candidate.kind else {
                return Err(RouteError::NotFound);
            };
            if let Some(source) = pattern {
                match self.patterns.resolve(source) {
                    Ok(re) if re.is_match(segment) => {}
                    Ok(_) => return Err(RouteError::NotFound),
                    Err(err) => {
                        debug!(
                            label = %candidate.label,
                            error = %err,
                            "Parameter pattern is invalid; treating as no match"
                        );
                        return Err(RouteError::NotFound);
                    }
                }
            }
            params.push(Param {
                key: Arc::clone(name),
                value: segment.to_string(),
            });
            node = candidate;
        }

        if node.actions.is_empty() {
            return Err(RouteError::NotFound);
        }
        match node.actions.get(method) {
            Some(action) => Ok(RouteMatch { action, params }),
            None => Err(RouteError::MethodNotAllowed),
        }
    }

    /// Methods registered at `path`, or an empty list when nothing matches
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let cleaned = clean_path(path);
        let mut node = &self.root;
        for segment in split_segments(&cleaned) {
            if let Some(child) = node.static_child(segment) {
                node = child;
                continue;
            }
            let Some(candidate) = node.first_param_child() else {
                return Vec::new();
            };
            if let NodeKind::Param {
                pattern: Some(source),
                ..
            } = &candidate.kind
            {
                if !matches!(self.patterns.resolve(source), Ok(re) if re.is_match(segment)) {
                    return Vec::new();
                }
            }
            node = candidate;
        }
        node.actions.keys().cloned().collect()
    }

    /// Largest number of parameters declared by any registered pattern
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of successful [`insert`](Self::insert) calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// The parameter pool, once any parameterized route has been registered
    #[must_use]
    pub fn pool(&self) -> Option<&ParamPool> {
        self.pool.as_ref()
    }
}
