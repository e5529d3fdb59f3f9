#![allow(dead_code)]

use bytes::Bytes;
use http::Method;
use trierouter::{handler_fn, Request, Response, SharedHandler};

/// Build a request with an empty body
pub fn request(method: Method, path: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

/// A closure that answers with `name` as its body
pub fn reply(name: &'static str) -> impl Fn(Request) -> Response + Send + Sync + 'static {
    move |_req: Request| Response::new(Bytes::from_static(name.as_bytes()))
}

/// [`reply`] as a shared handler
pub fn named(name: &'static str) -> SharedHandler {
    handler_fn(reply(name))
}

/// Response body as UTF-8
pub fn body_str(resp: &Response) -> &str {
    std::str::from_utf8(resp.body()).unwrap()
}
