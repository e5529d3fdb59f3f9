//! # Middleware Module
//!
//! Middleware wraps a handler in cross-cutting behavior. A middleware is
//! anything implementing [`Middleware`], including plain closures of type
//! `Fn(SharedHandler) -> SharedHandler`.
//!
//! The router composes global middleware first, then the route's own list,
//! around the matched handler with [`compose`]:
//!
//! ```text
//! global [G1, G2] + route [R1]  →  G1(G2(R1(handler)))
//! ```
//!
//! Provided middleware:
//! - [`TracingMiddleware`]: a `request` span per call with status and latency
//! - [`MetricsMiddleware`]: request count, 5xx count and average latency

mod core;
mod metrics;
mod tracing;

pub use core::{compose, Middleware, SharedMiddleware};
pub use metrics::MetricsMiddleware;
pub use tracing::{TracingMiddleware, REQUEST_ID_HEADER};
