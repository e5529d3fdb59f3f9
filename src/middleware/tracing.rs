use std::sync::Arc;
use std::time::Instant;

use tracing::{field, info_span};

use super::Middleware;
use crate::handler::{Request, SharedHandler};
use crate::ids::RequestId;

/// Header consulted for an incoming request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Opens a `request` span around every routed request.
///
/// The span carries the method, path and a request id (taken from
/// `x-request-id` when it holds a valid ULID, generated otherwise), and
/// records the response status and latency once the handler returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        Arc::new(move |req: Request| {
            let request_id = RequestId::from_header_or_new(
                req.headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok()),
            );
            let span = info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                request_id = %request_id,
                status = field::Empty,
                latency_us = field::Empty,
            );
            let _entered = span.enter();

            let start = Instant::now();
            let resp = next.call(req);

            span.record("status", resp.status().as_u16());
            span.record("latency_us", start.elapsed().as_micros() as u64);
            resp
        })
    }
}
