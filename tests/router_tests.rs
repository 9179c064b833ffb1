//! Tests for the exact-path router: registration semantics, dispatch
//! outcomes and the sink capability hand-over.

use http::Method;
use jsongate::server::BufferedResponse;
use jsongate::{Dispatch, JsonRequest, Responder, ResponseSink, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing_util::TestTracing;

struct Fixed {
    body: &'static str,
    status: u16,
}

impl Fixed {
    fn new(body: &'static str, status: u16) -> Arc<Self> {
        Arc::new(Fixed { body, status })
    }
}

impl Responder for Fixed {
    fn answer(&self, _req: &JsonRequest) -> Option<String> {
        Some(self.body.to_string())
    }

    fn status(&self, _req: &JsonRequest) -> u16 {
        self.status
    }
}

/// Path matched, but nothing to say.
struct Silent {
    status: u16,
}

impl Responder for Silent {
    fn answer(&self, _req: &JsonRequest) -> Option<String> {
        None
    }

    fn status(&self, _req: &JsonRequest) -> u16 {
        self.status
    }
}

struct Counting {
    hits: AtomicUsize,
    body: &'static str,
}

impl Counting {
    fn new(body: &'static str) -> Arc<Self> {
        Arc::new(Counting {
            hits: AtomicUsize::new(0),
            body,
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Responder for Counting {
    fn answer(&self, _req: &JsonRequest) -> Option<String> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Some(self.body.to_string())
    }
}

/// Responder that declares the sink capability and adds its own header.
struct RawHeaders;

impl Responder for RawHeaders {
    fn answer(&self, _req: &JsonRequest) -> Option<String> {
        Some("{}".to_string())
    }

    fn wants_sink(&self) -> bool {
        true
    }

    fn answer_raw(&self, req: &JsonRequest, sink: &mut dyn ResponseSink) -> Option<String> {
        sink.add_header("X-Raw", "yes");
        self.answer(req)
    }
}

fn dispatch(router: &Router, method: Method, path: &str) -> (Dispatch, BufferedResponse) {
    let req = JsonRequest::new(method, path);
    let mut sink = BufferedResponse::new();
    let dispatch = router.dispatch(&req, &mut sink);
    (dispatch, sink)
}

#[test]
fn test_exact_match_returns_body_and_status() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/sales", Fixed::new(r#"{"v":1}"#, 201));

    let (dispatch, _) = dispatch_get(&router, "/sales");
    assert_eq!(dispatch.status, 201);
    assert_eq!(dispatch.body.as_deref(), Some(r#"{"v":1}"#));
}

#[test]
fn test_unregistered_path_is_not_found() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/sales", Fixed::new("{}", 200));

    let (dispatch, _) = dispatch_get(&router, "/missing");
    assert_eq!(dispatch, Dispatch::not_found());
}

#[test]
fn test_match_is_exact_and_case_sensitive() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/Sales", Fixed::new("{}", 200));

    assert_eq!(dispatch_get(&router, "/sales").0, Dispatch::not_found());
    // No trailing-slash folding either.
    assert_eq!(dispatch_get(&router, "/Sales/").0, Dispatch::not_found());
    assert_eq!(dispatch_get(&router, "/Sales").0.status, 200);
}

#[test]
fn test_last_registration_wins() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/sales", Fixed::new(r#"{"old":1}"#, 200));
    router.register("/sales", Fixed::new(r#"{"new":1}"#, 202));

    assert_eq!(router.len(), 1);
    let (dispatch, _) = dispatch_get(&router, "/sales");
    assert_eq!(dispatch.status, 202);
    assert_eq!(dispatch.body.as_deref(), Some(r#"{"new":1}"#));
}

#[test]
fn test_absent_body_is_not_found_even_on_match() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    // Whatever status the responder claims, no content means 404.
    router.register("/empty", Arc::new(Silent { status: 201 }));

    let (dispatch, _) = dispatch_get(&router, "/empty");
    assert_eq!(dispatch, Dispatch::not_found());
}

#[test]
fn test_only_matched_responder_is_invoked() {
    let _tracing = TestTracing::init();
    let first = Counting::new(r#"{"r":1}"#);
    let second = Counting::new(r#"{"r":2}"#);
    let mut router = Router::new();
    router.register("/one", first.clone());
    router.register("/two", second.clone());

    let (dispatch, _) = dispatch_get(&router, "/one");
    assert_eq!(dispatch.body.as_deref(), Some(r#"{"r":1}"#));
    assert_eq!(first.hits(), 1);
    assert_eq!(second.hits(), 0);
}

#[test]
fn test_sink_capability_recorded_at_registration() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/raw", Arc::new(RawHeaders));
    router.register("/plain", Fixed::new("{}", 200));

    let (_, sink) = dispatch_get(&router, "/raw");
    assert_eq!(sink.header("x-raw"), Some("yes"));

    let (_, sink) = dispatch_get(&router, "/plain");
    assert_eq!(sink.header("x-raw"), None);
}

#[test]
fn test_reregistration_clears_sink_capability() {
    let _tracing = TestTracing::init();
    let mut router = Router::new();
    router.register("/r", Arc::new(RawHeaders));
    // Replacing with a plain responder must drop the recorded capability.
    router.register("/r", Fixed::new("{}", 200));

    let (dispatch, sink) = dispatch_get(&router, "/r");
    assert_eq!(dispatch.status, 200);
    assert_eq!(sink.header("x-raw"), None);
}

fn dispatch_get(router: &Router, path: &str) -> (Dispatch, BufferedResponse) {
    dispatch(router, Method::GET, path)
}
