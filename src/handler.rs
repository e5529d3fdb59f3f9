//! Handler types at the boundary with the host server.
//!
//! The router never looks inside a handler. It only needs something it can
//! call with a request and get a response back, so the host framework's
//! request/response types are the `http` crate's, with a [`Bytes`] body.

use bytes::Bytes;
use http::StatusCode;
use std::sync::Arc;

/// Request type handed to handlers
pub type Request = http::Request<Bytes>;
/// Response type produced by handlers
pub type Response = http::Response<Bytes>;

/// Something that turns a request into a response
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(Request) -> Response + Send + Sync + 'static,
{
    #[inline]
    fn call(&self, req: Request) -> Response {
        self(req)
    }
}

/// Reference-counted handler, cheap to clone into actions and middleware chains
pub type SharedHandler = Arc<dyn Handler>;

/// Wrap a closure as a [`SharedHandler`]
pub fn handler_fn<F>(f: F) -> SharedHandler
where
    F: Fn(Request) -> Response + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Build an empty-bodied response with the given status
#[must_use]
pub fn status_response(status: StatusCode) -> Response {
    let mut resp = Response::new(Bytes::new());
    *resp.status_mut() = status;
    resp
}

/// A handler that always answers with `status` and an empty body.
///
/// Used for the default 404 / 405 / 500 fallbacks.
#[must_use]
pub fn status_handler(status: StatusCode) -> SharedHandler {
    Arc::new(move |_req: Request| status_response(status))
}
