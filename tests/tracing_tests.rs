use bytes::Bytes;
use http::Method;
use std::sync::Arc;
use trierouter::ids::RequestId;
use trierouter::middleware::{SharedMiddleware, TracingMiddleware, REQUEST_ID_HEADER};
use trierouter::{Request, Response, Router};

mod common;
use common::request;
use tracing_util::TestTracing;

#[test]
fn test_tracing_middleware_emits_spans() {
    let tracing = TestTracing::init();

    let mut router = Router::new();
    let mw: SharedMiddleware = Arc::new(TracingMiddleware);
    router.use_global(vec![mw]);
    router
        .methods(&[Method::GET])
        .handler("/pets/:id", |_req: Request| Response::new(Bytes::new()))
        .unwrap();

    let id = RequestId::new();
    let mut req = request(Method::GET, "/pets/12345");
    req.headers_mut()
        .insert(REQUEST_ID_HEADER, id.to_string().parse().unwrap());
    let resp = router.serve(req);
    assert_eq!(resp.status(), 200);

    let spans = tracing.spans();
    let span = spans
        .iter()
        .find(|s| s.name == "request")
        .expect("request span");
    assert_eq!(span.field("method"), Some("GET"));
    assert_eq!(span.field("path"), Some("/pets/12345"));
    assert_eq!(span.field("request_id"), Some(id.to_string().as_str()));
    assert_eq!(span.field("status"), Some("200"));
    assert!(span.field("latency_us").is_some());

    let events = tracing.events();
    assert!(events.iter().any(|e| e == "Route registered"));
    assert!(events
        .iter()
        .any(|e| e == "Route matched" || e == "Slow route matching detected"));
}

#[test]
fn test_invalid_pattern_warns_once() {
    let tracing = TestTracing::init();

    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/broken/:id[(once]", |_req: Request| {
            Response::new(Bytes::new())
        })
        .unwrap();

    for _ in 0..3 {
        let resp = router.serve(request(Method::GET, "/broken/1"));
        assert_eq!(resp.status(), 404);
    }

    let warnings = tracing
        .events()
        .into_iter()
        .filter(|e| e.starts_with("Parameter pattern failed to compile"))
        .count();
    assert_eq!(warnings, 1);
}
