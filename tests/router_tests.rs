use bytes::Bytes;
use http::{Method, StatusCode};
use trierouter::router::RouteError;
use trierouter::runtime_config::RouterConfig;
use trierouter::{get_param, handler_fn, Params, Request, Response, Router};

mod common;
use common::{body_str, reply, request};

fn echo_params() -> impl Fn(Request) -> Response + Send + Sync + 'static {
    |req: Request| {
        let rendered = req
            .extensions()
            .get::<Params>()
            .map(|params| {
                params
                    .iter()
                    .map(|p| format!("{}={}", p.key, p.value))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default();
        Response::new(Bytes::from(rendered))
    }
}

fn scenario_router() -> Router {
    let mut router = Router::new();
    for pattern in ["/", "/foo", "/foo/bar", "/foo/bar/:id", r"/foo/:id[^\d+$]"] {
        router
            .methods(&[Method::GET])
            .handler(pattern, echo_params())
            .unwrap();
    }
    router
}

#[test]
fn test_scenario_dispatch() {
    let router = scenario_router();

    let resp = router.serve(request(Method::GET, "/foo/42"));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_str(&resp), "id=42");

    let resp = router.serve(request(Method::GET, "/foo/bar/42"));
    assert_eq!(body_str(&resp), "id=42");
    let m = router.search(&Method::GET, "/foo/bar/42").unwrap();
    assert_eq!(&*m.action.pattern, "/foo/bar/:id");

    assert_eq!(
        router.serve(request(Method::GET, "/foo/abc")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        router.serve(request(Method::POST, "/foo")).status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[test]
fn test_ordered_extraction() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/foo/bar/:id/:name", echo_params())
        .unwrap();

    let resp = router.serve(request(Method::GET, "/foo/bar/123/john"));
    assert_eq!(body_str(&resp), "id=123,name=john");
}

#[test]
fn test_first_registered_constraint_wins() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler(r"/:id[^\d+$]", reply("digits"))
        .unwrap();
    router
        .methods(&[Method::GET])
        .handler(r"/:id[^\D+$]", reply("letters"))
        .unwrap();

    assert_eq!(body_str(&router.serve(request(Method::GET, "/123"))), "digits");
    assert_eq!(
        router.serve(request(Method::GET, "/abc")).status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_second_registration_wins() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/", reply("first"))
        .unwrap();
    router
        .methods(&[Method::GET])
        .handler("/", reply("second"))
        .unwrap();

    assert_eq!(body_str(&router.serve(request(Method::GET, "/"))), "second");
    // Both registrations are recorded even though one action replaced the other.
    assert_eq!(router.routes().len(), 2);
}

#[test]
fn test_trailing_slash_equivalence() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/foo/", reply("foo"))
        .unwrap();

    assert_eq!(body_str(&router.serve(request(Method::GET, "/foo"))), "foo");
    assert_eq!(body_str(&router.serve(request(Method::GET, "/foo/"))), "foo");
    assert_eq!(body_str(&router.serve(request(Method::GET, "/foo//"))), "foo");
}

#[test]
fn test_no_stale_params_across_requests() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/a/:x/:y/:z", echo_params())
        .unwrap();
    router
        .methods(&[Method::GET])
        .handler("/b/:x", echo_params())
        .unwrap();

    assert_eq!(
        body_str(&router.serve(request(Method::GET, "/a/1/2/3"))),
        "x=1,y=2,z=3"
    );
    assert_eq!(body_str(&router.serve(request(Method::GET, "/b/9"))), "x=9");
    assert_eq!(
        router.serve(request(Method::GET, "/a/1/2")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(body_str(&router.serve(request(Method::GET, "/b/8"))), "x=8");
}

#[test]
fn test_get_param_outside_router() {
    let req = request(Method::GET, "/");
    assert_eq!(get_param(&req, "id"), "");

    let mut req = request(Method::GET, "/");
    req.extensions_mut()
        .insert(Params::from_iter([trierouter::router::Param::new("id", "7")]));
    assert_eq!(get_param(&req, "id"), "7");
    assert_eq!(get_param(&req, "other"), "");
}

#[test]
fn test_custom_fallbacks_receive_request() {
    let mut router = Router::new();
    router
        .methods(&[Method::GET])
        .handler("/only-get", reply("ok"))
        .unwrap();
    router.set_not_found(handler_fn(|req: Request| {
        let mut resp = Response::new(Bytes::from(format!("missing {}", req.uri().path())));
        *resp.status_mut() = StatusCode::NOT_FOUND;
        resp
    }));
    router.set_method_not_allowed(handler_fn(|req: Request| {
        let mut resp = Response::new(Bytes::from(format!("no {}", req.method())));
        *resp.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
        resp
    }));

    let resp = router.serve(request(Method::GET, "/nowhere"));
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_str(&resp), "missing /nowhere");

    let resp = router.serve(request(Method::PATCH, "/only-get"));
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_str(&resp), "no PATCH");
}

#[test]
fn test_options_handler() {
    let mut router = scenario_router();
    router.set_default_options(handler_fn(|_req: Request| {
        let mut resp = Response::new(Bytes::new());
        *resp.status_mut() = StatusCode::NO_CONTENT;
        resp.headers_mut()
            .insert(http::header::ALLOW, "GET, OPTIONS".parse().unwrap());
        resp
    }));

    let resp = router.serve(request(Method::OPTIONS, "/foo/abc"));
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()[http::header::ALLOW], "GET, OPTIONS");
}

#[test]
fn test_registration_errors() {
    let mut router = Router::new();
    let err = router
        .methods(&[])
        .handler("/x", reply("x"))
        .unwrap_err();
    assert_eq!(err.to_string(), "route '/x' was registered without any methods");

    let err = router
        .methods(&[Method::GET])
        .handler("/x/:[\\d+]", reply("x"))
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidParam { ref segment, .. } if segment == ":[\\d+]"));
    assert!(router.is_empty());
}

#[test]
fn test_with_config() {
    let config = RouterConfig {
        param_pool_max_idle: 1,
        slow_match_us: 0,
    };
    let mut router = Router::with_config(config);
    assert_eq!(router.config(), &config);
    router
        .methods(&[Method::GET])
        .handler("/p/:id", echo_params())
        .unwrap();

    // A zero threshold logs every match as slow but still routes normally.
    assert_eq!(body_str(&router.serve(request(Method::GET, "/p/1"))), "id=1");

    let a = router.search(&Method::GET, "/p/1").unwrap();
    let b = router.search(&Method::GET, "/p/2").unwrap();
    drop(a);
    drop(b);
    assert_eq!(router.tree().pool().unwrap().idle(), 1);
}

#[test]
fn test_routes_json_dump() {
    let router = scenario_router();
    let json: serde_json::Value = serde_json::from_str(&router.routes_json().unwrap()).unwrap();
    let patterns: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["pattern"].as_str().unwrap())
        .collect();
    assert_eq!(
        patterns,
        vec!["/", "/foo", "/foo/bar", "/foo/bar/:id", r"/foo/:id[^\d+$]"]
    );
    assert_eq!(json[0]["methods"], serde_json::json!(["GET"]));
}
