//! # Router Module
//!
//! Path matching and dispatch. Routes are registered as `/`-delimited
//! patterns whose segments are either static text or named parameters,
//! optionally constrained by a regular expression:
//!
//! ```text
//! /users                 static
//! /users/:id             any single segment, extracted as "id"
//! /users/:id[^\d+$]      only segments that are all digits
//! ```
//!
//! ## Architecture
//!
//! - [`Tree`]: the segment trie. One node per segment, per-method actions on
//!   terminal nodes, static children before parameter children.
//! - [`PatternCache`]: compiled parameter constraints, shared process-wide.
//! - [`ParamPool`]: reusable parameter buffers for searches.
//! - [`Router`]: the facade. Registration builder, fallbacks, global
//!   middleware and [`Router::serve`].
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::{Method, Request};
//! use trierouter::router::{RouteError, Router};
//!
//! let mut router = Router::new();
//! router
//!     .methods(&[Method::GET])
//!     .handler("/foo/bar/:id", |_req: trierouter::Request| {
//!         http::Response::new(Bytes::new())
//!     })
//!     .unwrap();
//!
//! let m = router.search(&Method::GET, "/foo/bar/123").unwrap();
//! assert_eq!(m.param("id"), Some("123"));
//! assert_eq!(
//!     router.search(&Method::POST, "/foo/bar/123").unwrap_err(),
//!     RouteError::MethodNotAllowed
//! );
//! ```
//!
//! ## Performance
//!
//! Lookup is O(depth): one hash lookup per static segment, and at most one
//! cached regex match per parameter segment. Parameter buffers come from a
//! pool sized to the deepest registered parameter count.

mod core;
mod params;
mod path;
mod pattern;
mod pool;
mod trie;

pub use core::{RouteBuilder, RouteInfo, Router};
pub use params::{get_param, Param, ParamVec, Params, MAX_INLINE_PARAMS};
pub use path::{clean_path, split_segments};
pub use pattern::{is_param, param_name_of, pattern_of, PatternCache, PatternError, PARAM_SIGIL};
pub use pool::{ParamPool, PooledParams};
pub use trie::{Action, RouteError, RouteMatch, Tree, DEFAULT_POOL_MAX_IDLE};
