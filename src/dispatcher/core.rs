//! Dispatcher core module - request lifecycle, policy checks, emission.

use crate::cors::CorsPolicy;
use crate::ids::RequestId;
use crate::responder::Responder;
use crate::router::{dispatch_one, Router};
use anyhow::Result;
use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Parsed inbound request handed to responders.
///
/// Produced by the host collaborator (see `server::parse_request`) and
/// consumed read-only. Header names are lowercased; parameters hold every
/// value seen for a name, query string first, then form-encoded body.
#[derive(Debug, Clone)]
pub struct JsonRequest {
    /// Correlation id, taken from an `X-Request-Id` header when present.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string. Matched exactly.
    pub path: String,
    /// HTTP headers with lowercased names.
    pub headers: HashMap<String, String>,
    /// Request parameters, each name mapped to all of its values.
    pub params: HashMap<String, Vec<String>>,
    /// Request body parsed as JSON, when the content type said so.
    pub body: Option<Value>,
}

impl JsonRequest {
    /// A bare request with the given method and path, no headers, no
    /// parameters and no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        JsonRequest {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            headers: HashMap::new(),
            params: HashMap::new(),
            body: None,
        }
    }

    /// Get a header by name, case-insensitively.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First value of a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a parameter by name.
    #[must_use]
    pub fn param_values(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The outbound response as consumed by this layer.
///
/// Status setter, repeatable header adder and a byte-body writer. The
/// dispatcher performs at most one `write_body` per request; CORS headers
/// are always added before the status is set.
pub trait ResponseSink {
    fn set_status(&mut self, status: u16);
    fn add_header(&mut self, name: &str, value: &str);
    fn write_body(&mut self, bytes: &[u8]);
}

/// What the dispatcher delegates matched requests to.
#[derive(Clone)]
pub enum RoutingTarget {
    /// An exact-path table of responders.
    Table(Router),
    /// A single responder answering every gated request itself.
    Single {
        responder: Arc<dyn Responder>,
        /// Capability declaration, resolved once at construction like a
        /// table registration would.
        sink_aware: bool,
    },
}

impl RoutingTarget {
    /// Delegate to a routing table.
    #[must_use]
    pub fn table(router: Router) -> Self {
        RoutingTarget::Table(router)
    }

    /// Delegate every request to one responder.
    #[must_use]
    pub fn single(responder: Arc<dyn Responder>) -> Self {
        let sink_aware = responder.wants_sink();
        RoutingTarget::Single {
            responder,
            sink_aware,
        }
    }
}

/// Startup contract supplied by the host application.
///
/// Replaces construction-by-name: the host hands the dispatcher a value
/// that knows how to build the routing target, instead of an identifier to
/// instantiate dynamically.
pub trait Application: Send + Sync {
    /// Build the routing target. Registration of responders happens here.
    ///
    /// # Errors
    ///
    /// An error leaves the dispatcher unconfigured: the failure is logged
    /// and every subsequent request resolves to 404 instead of crashing
    /// the process.
    fn init(&self) -> Result<RoutingTarget>;

    /// Responder consulted when no route matched. Defaults to none.
    fn not_found(&self) -> Option<Arc<dyn Responder>> {
        None
    }

    /// Invoked once when the dispatcher shuts down.
    fn on_shutdown(&self) {}
}

/// Terminal state of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `OPTIONS` request answered with 200 and no body.
    Preflight,
    /// Method outside the allow-list, answered with 400 and no body.
    MethodRejected,
    /// No routing target configured, answered with 404 and no body.
    Unconfigured,
    /// A responder produced a body; carries the emitted status.
    Matched(u16),
    /// Nothing matched (or the match had no content); answered with 404,
    /// body supplied by the fallback responder when one exists.
    NotFound,
}

/// Top-level request dispatcher.
///
/// Holds the CORS policy, the routing target and the optional fallback
/// responder, all immutable after construction and safe for concurrent
/// use. See the [module docs](crate::dispatcher) for the request flow.
pub struct Dispatcher {
    cors: CorsPolicy,
    target: Option<RoutingTarget>,
    not_found: Option<Arc<dyn Responder>>,
    application: Option<Arc<dyn Application>>,
}

impl Dispatcher {
    /// An unconfigured dispatcher: every gated request resolves to 404.
    #[must_use]
    pub fn new(cors: CorsPolicy) -> Self {
        Dispatcher {
            cors,
            target: None,
            not_found: None,
            application: None,
        }
    }

    /// A dispatcher delegating to the given routing target.
    #[must_use]
    pub fn with_target(cors: CorsPolicy, target: RoutingTarget) -> Self {
        Dispatcher {
            cors,
            target: Some(target),
            not_found: None,
            application: None,
        }
    }

    /// Build a dispatcher from a host [`Application`].
    ///
    /// A failing `init` is logged and degrades to the unconfigured state;
    /// the process keeps listening and answers 404.
    #[must_use]
    pub fn from_application(cors: CorsPolicy, application: Arc<dyn Application>) -> Self {
        let mut dispatcher = Dispatcher::new(cors);
        match application.init() {
            Ok(target) => {
                dispatcher.target = Some(target);
                dispatcher.not_found = application.not_found();
            }
            Err(err) => {
                error!(
                    error = %err,
                    "Application init failed, dispatcher left unconfigured"
                );
            }
        }
        dispatcher.application = Some(application);
        dispatcher
    }

    /// Set the responder consulted when no route matched.
    pub fn set_not_found(&mut self, responder: Arc<dyn Responder>) {
        self.not_found = Some(responder);
    }

    /// The configured CORS policy.
    #[must_use]
    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// True when a routing target is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    /// Run the application shutdown hook, when one was supplied.
    pub fn shutdown(&self) {
        if let Some(application) = &self.application {
            application.on_shutdown();
        }
    }

    /// Handle one request and write the response into `sink`.
    ///
    /// All per-request state lives in `req`, `sink` and the returned
    /// [`Outcome`]; the dispatcher itself is never mutated, so any number
    /// of requests may run through it concurrently.
    pub fn handle(&self, req: &JsonRequest, sink: &mut dyn ResponseSink) -> Outcome {
        // CORS headers go first: the transport may refuse header writes
        // once the status is committed.
        self.cors.apply(sink);

        if req.method == Method::OPTIONS {
            debug!(request_id = %req.request_id, path = %req.path, "Preflight answered");
            sink.set_status(200);
            return Outcome::Preflight;
        }

        if !self.cors.allows(&req.method) {
            warn!(
                request_id = %req.request_id,
                method = %req.method,
                path = %req.path,
                "Method not in allow-list"
            );
            sink.set_status(400);
            return Outcome::MethodRejected;
        }

        let Some(target) = &self.target else {
            warn!(
                request_id = %req.request_id,
                path = %req.path,
                "No routing target configured"
            );
            sink.set_status(404);
            return Outcome::Unconfigured;
        };

        let dispatch = match target {
            RoutingTarget::Table(router) => router.dispatch(req, sink),
            RoutingTarget::Single {
                responder,
                sink_aware,
            } => dispatch_one(responder.as_ref(), *sink_aware, req, sink),
        };

        match dispatch.body {
            Some(body) => {
                sink.set_status(dispatch.status);
                emit_json_body(sink, &body);
                Outcome::Matched(dispatch.status)
            }
            None => {
                sink.set_status(404);
                if let Some(fallback) = &self.not_found {
                    if let Some(body) = fallback.answer(req) {
                        emit_json_body(sink, &body);
                    }
                }
                Outcome::NotFound
            }
        }
    }
}

/// Write a JSON body with its content headers.
///
/// `Content-Length` counts the UTF-8 bytes of the body, not its characters.
/// Bodyless paths never reach this, so no-body responses carry no
/// `Content-Type` or `Content-Length` beyond what was already set.
fn emit_json_body(sink: &mut dyn ResponseSink, body: &str) {
    let bytes = body.as_bytes();
    sink.add_header("Content-Type", "application/json; charset=utf-8");
    sink.add_header("Content-Length", &bytes.len().to_string());
    sink.write_body(bytes);
}
