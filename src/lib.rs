//! # trierouter
//!
//! **trierouter** is an embeddable HTTP request router built on a segment trie.
//! It resolves a method and path to a registered handler, extracts named path
//! parameters (optionally constrained by regular expressions), and runs the
//! handler inside a composed middleware chain. It is not a server: the host
//! brings its own listener and calls [`Router::serve`] with an
//! [`http::Request`].
//!
//! ## Architecture
//!
//! - **[`router`]** - The segment trie, pattern cache, parameter pool and the
//!   [`Router`] facade
//! - **[`middleware`]** - The [`Middleware`](middleware::Middleware) trait,
//!   [`compose`](middleware::compose), and tracing/metrics middleware
//! - **[`handler`]** - Request/response types and the [`Handler`] trait
//! - **[`runtime_config`]** - Environment-driven router tuning
//! - **[`logging`]** - Optional `tracing-subscriber` setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host server
//!     participant Router as Router::serve
//!     participant Tree as Tree::search
//!     participant Cache as PatternCache
//!     participant Pool as ParamPool
//!     participant Chain as Middleware chain
//!     participant Handler
//!
//!     Host->>Router: Request (GET /users/42)
//!     alt OPTIONS and default handler set
//!         Router-->>Host: default OPTIONS response
//!     end
//!     Router->>Tree: search(method, path)
//!     Tree->>Pool: acquire buffer
//!     loop every segment
//!         Tree->>Tree: static child?
//!         Tree->>Cache: resolve(first param constraint)
//!         Cache-->>Tree: compiled matcher
//!     end
//!     alt no match
//!         Tree-->>Router: NotFound / MethodNotAllowed
//!         Router-->>Host: fallback response
//!     end
//!     Tree-->>Router: Action + params
//!     Router->>Router: Params into request extensions
//!     Router->>Pool: release buffer (drop)
//!     Router->>Chain: compose(global ++ route, handler)
//!     Chain->>Handler: call(request)
//!     Handler-->>Host: Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Method, StatusCode};
//! use std::sync::Arc;
//! use trierouter::middleware::{SharedMiddleware, TracingMiddleware};
//! use trierouter::{get_param, Request, Response, Router};
//!
//! let mut router = Router::new();
//! let tracing_mw: SharedMiddleware = Arc::new(TracingMiddleware);
//! router.use_global(vec![tracing_mw]);
//!
//! router
//!     .methods(&[Method::GET])
//!     .handler("/pets/:id[^\\d+$]", |req: Request| {
//!         Response::new(Bytes::from(format!("pet {}", get_param(&req, "id"))))
//!     })
//!     .unwrap();
//!
//! let router = Arc::new(router);
//! let resp = router.serve(
//!     http::Request::get("/pets/7").body(Bytes::new()).unwrap(),
//! );
//! assert_eq!(resp.body(), "pet 7");
//!
//! let resp = router.serve(
//!     http::Request::get("/pets/rex").body(Bytes::new()).unwrap(),
//! );
//! assert_eq!(resp.status(), StatusCode::NOT_FOUND);
//! ```
//!
//! ## Matching Rules
//!
//! - Static segments beat parameters at the same depth.
//! - Among parameter siblings the first registered one decides; if its
//!   constraint rejects the segment the request is not found.
//! - A constraint must match the whole segment.
//! - Paths are cleaned before lookup, so `/a/./b/`, `//a/b` and `/a/b/` all
//!   reach the route registered as `/a/b`.
//!
//! ## Logging
//!
//! Everything is reported through `tracing`. Registration logs at `info`,
//! route matches at `debug`, and slow matches, overwritten routes and broken
//! constraints at `warn`. See [`logging`] for a ready-made subscriber.

pub mod handler;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;

pub use handler::{handler_fn, Handler, Request, Response, SharedHandler};
pub use router::{get_param, Params, RouteError, Router};
pub use runtime_config::RouterConfig;
