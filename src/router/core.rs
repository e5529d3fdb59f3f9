//! Router facade - registration API and request dispatch.
//!
//! The [`Router`] owns the [`Tree`], the fallback handlers and the global
//! middleware list. Registration happens through `&mut Router` before the
//! router is shared; dispatch ([`Router::serve`]) only needs `&Router`, so a
//! built router can sit behind an `Arc` and serve from many threads.

use http::{Method, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::pattern::PatternCache;
use super::trie::{RouteError, RouteMatch, Tree};
use crate::handler::{status_handler, status_response, Request, Response, SharedHandler};
use crate::middleware::{compose, SharedMiddleware};
use crate::runtime_config::RouterConfig;

/// One registration as recorded for route dumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Method names in registration order
    pub methods: Vec<String>,
    /// The pattern as written at registration
    pub pattern: String,
}

/// HTTP request router backed by a segment trie
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Method, Request, Response};
/// use trierouter::{get_param, Router};
///
/// let mut router = Router::new();
/// router
///     .methods(&[Method::GET])
///     .handler("/users/:id[^\\d+$]", |req: trierouter::Request| {
///         Response::new(Bytes::from(get_param(&req, "id").to_string()))
///     })
///     .unwrap();
///
/// let resp = router.serve(Request::get("/users/42").body(Bytes::new()).unwrap());
/// assert_eq!(resp.body(), "42");
/// ```
pub struct Router {
    tree: Tree,
    config: RouterConfig,
    global: Vec<SharedMiddleware>,
    not_found: SharedHandler,
    method_not_allowed: SharedHandler,
    default_options: Option<SharedHandler>,
    routes: Vec<RouteInfo>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("global_middlewares", &self.global.len())
            .field("default_options", &self.default_options.is_some())
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with [`RouterConfig::default`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create a router with an explicit configuration
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            tree: Tree::with_cache(PatternCache::global(), config.param_pool_max_idle),
            config,
            global: Vec::new(),
            not_found: status_handler(StatusCode::NOT_FOUND),
            method_not_allowed: status_handler(StatusCode::METHOD_NOT_ALLOWED),
            default_options: None,
            routes: Vec::new(),
        }
    }

    /// The configuration this router was built with
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Replace the global middleware list.
    ///
    /// Global middleware wraps every matched route, outside the route's own
    /// middleware. Fallback and OPTIONS handlers are not wrapped.
    pub fn use_global<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.global = middlewares.into_iter().collect();
        debug!(count = self.global.len(), "Global middleware set");
    }

    /// Handler for requests that match no route (default: empty 404)
    pub fn set_not_found(&mut self, handler: SharedHandler) {
        self.not_found = handler;
    }

    /// Handler for a known path requested with an unregistered method
    /// (default: empty 405)
    pub fn set_method_not_allowed(&mut self, handler: SharedHandler) {
        self.method_not_allowed = handler;
    }

    /// Handler that answers every OPTIONS request before any route lookup
    pub fn set_default_options(&mut self, handler: SharedHandler) {
        self.default_options = Some(handler);
    }

    /// Start a registration for `methods`
    pub fn methods(&mut self, methods: &[Method]) -> RouteBuilder<'_> {
        RouteBuilder {
            router: self,
            methods: methods.to_vec(),
            middlewares: Vec::new(),
        }
    }

    /// Register `handler` for `methods` at `pattern` with route middleware
    pub fn insert(
        &mut self,
        methods: &[Method],
        pattern: &str,
        handler: SharedHandler,
        middlewares: Vec<SharedMiddleware>,
    ) -> Result<(), RouteError> {
        self.tree.insert(methods, pattern, handler, middlewares)?;
        self.routes.push(RouteInfo {
            methods: methods.iter().map(|m| m.as_str().to_string()).collect(),
            pattern: pattern.to_string(),
        });
        Ok(())
    }

    /// Look up `path` for `method` without invoking anything
    pub fn search(&self, method: &Method, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        let match_start = Instant::now();
        let result = self.tree.search(method, path);
        let match_duration = match_start.elapsed();

        match &result {
            Ok(m) => {
                if match_duration > self.config.slow_match_threshold() {
                    warn!(
                        method = %method,
                        path = %path,
                        route_pattern = %m.action.pattern,
                        params = ?&*m.params,
                        duration_us = match_duration.as_micros() as u64,
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        method = %method,
                        path = %path,
                        route_pattern = %m.action.pattern,
                        params = ?&*m.params,
                        duration_us = match_duration.as_micros() as u64,
                        "Route matched"
                    );
                }
            }
            Err(err) => {
                debug!(
                    method = %method,
                    path = %path,
                    error = %err,
                    duration_us = match_duration.as_micros() as u64,
                    "No route matched"
                );
            }
        }
        result
    }

    /// Dispatch `req` and return the response.
    ///
    /// OPTIONS requests go to the default OPTIONS handler when one is set. A
    /// matched route runs inside `global ++ route` middleware with its
    /// parameters available through [`get_param`](super::get_param).
    pub fn serve(&self, mut req: Request) -> Response {
        if req.method() == Method::OPTIONS {
            if let Some(options) = &self.default_options {
                return options.call(req);
            }
        }

        let found = self.search(req.method(), req.uri().path());
        let handler = match found {
            Ok(mut m) => {
                if !m.params.is_empty() {
                    req.extensions_mut().insert(m.params.take_into_params());
                }
                self.chain(&m)
            }
            Err(RouteError::NotFound) => return self.not_found.call(req),
            Err(RouteError::MethodNotAllowed) => return self.method_not_allowed.call(req),
            Err(err) => {
                warn!(error = %err, "Unexpected routing error");
                return status_response(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };
        handler.call(req)
    }

    fn chain(&self, m: &RouteMatch<'_>) -> SharedHandler {
        if self.global.is_empty() && m.action.middlewares.is_empty() {
            return Arc::clone(&m.action.handler);
        }
        let mut middlewares = Vec::with_capacity(self.global.len() + m.action.middlewares.len());
        middlewares.extend(self.global.iter().cloned());
        middlewares.extend(m.action.middlewares.iter().cloned());
        compose(&middlewares, Arc::clone(&m.action.handler))
    }

    /// Every successful registration, in order
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// [`routes`](Self::routes) as a JSON array
    pub fn routes_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.routes)
    }

    /// Log all registered routes at `info`
    pub fn dump_routes(&self) {
        info!(
            count = self.routes.len(),
            max_params = self.tree.max_params(),
            "Registered routes"
        );
        for route in &self.routes {
            info!(
                methods = ?route.methods,
                pattern = %route.pattern,
                "Route"
            );
        }
    }

    /// Methods registered at `path`
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.tree.allowed_methods(path)
    }

    /// Number of successful registrations
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The underlying trie
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

/// A pending registration created by [`Router::methods`]
///
/// The builder only collects methods and middleware; nothing reaches the
/// router until [`handler`](Self::handler) consumes it.
#[must_use = "a route is only registered once `handler` is called"]
pub struct RouteBuilder<'r> {
    router: &'r mut Router,
    methods: Vec<Method>,
    middlewares: Vec<SharedMiddleware>,
}

impl fmt::Debug for RouteBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("methods", &self.methods)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl RouteBuilder<'_> {
    /// Add more methods
    pub fn methods(mut self, methods: &[Method]) -> Self {
        self.methods.extend_from_slice(methods);
        self
    }

    /// Append one route middleware
    pub fn with(mut self, middleware: SharedMiddleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Append several route middlewares, keeping their order
    pub fn with_all<I>(mut self, middlewares: I) -> Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Register `handler` at `pattern` and finish the builder
    pub fn handler<H>(self, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        H: crate::handler::Handler,
    {
        let RouteBuilder {
            router,
            methods,
            middlewares,
        } = self;
        router.insert(&methods, pattern, Arc::new(handler), middlewares)
    }
}
