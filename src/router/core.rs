//! Router core module - exact-path table and per-request dispatch outcome.

use crate::dispatcher::{JsonRequest, ResponseSink};
use crate::responder::Responder;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a single dispatch call.
///
/// Carries the HTTP status to emit and the body produced by the matched
/// responder, if any. This value is created fresh for every call; it is the
/// request-scoped replacement for status bookkeeping on the shared router
/// instance, which would race under concurrent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// HTTP status to emit. 404 until a responder produced a body.
    pub status: u16,
    /// JSON body from the matched responder, absent when nothing matched
    /// or the matched responder had no content.
    pub body: Option<String>,
}

impl Dispatch {
    /// Outcome for a request no responder answered.
    #[must_use]
    pub fn not_found() -> Self {
        Dispatch {
            status: 404,
            body: None,
        }
    }
}

/// Invoke a single responder and fold its body and status into a [`Dispatch`].
///
/// `give_sink` reflects the registration-time capability declaration: only
/// responders that asked for the sink receive it, as a call parameter.
///
/// An absent body always yields 404 here, regardless of the responder's own
/// `status()`. A responder with no content for a request is a miss even
/// though its path matched.
pub(crate) fn dispatch_one(
    responder: &dyn Responder,
    give_sink: bool,
    req: &JsonRequest,
    sink: &mut dyn ResponseSink,
) -> Dispatch {
    let body = if give_sink {
        responder.answer_raw(req, sink)
    } else {
        responder.answer(req)
    };
    match body {
        Some(body) => Dispatch {
            status: responder.status(req),
            body: Some(body),
        },
        None => Dispatch::not_found(),
    }
}

/// Exact-match URI table over responder instances.
///
/// Built once at startup via repeated [`Router::register`] calls and
/// immutable afterwards. Paths are matched exactly and case-sensitively
/// against the incoming request path.
///
/// The table and the set of sink-aware paths are safe for concurrent reads
/// without locking; registered responders are shared across concurrent
/// invocations.
#[derive(Clone, Default)]
pub struct Router {
    entries: HashMap<String, Arc<dyn Responder>>,
    /// Paths whose responder declared the response-sink capability at
    /// registration time.
    sink_routes: HashSet<String>,
}

impl Router {
    /// Create an empty routing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a responder for an absolute URI path.
    ///
    /// Inserts or overwrites the table entry; the last registration for a
    /// given path wins. The responder's sink capability declaration is
    /// inspected here, once, and recorded for dispatch.
    pub fn register(&mut self, path: impl Into<String>, responder: Arc<dyn Responder>) {
        let path = path.into();
        if responder.wants_sink() {
            self.sink_routes.insert(path.clone());
        } else {
            self.sink_routes.remove(&path);
        }
        let replaced = self.entries.insert(path.clone(), responder).is_some();
        info!(
            path = %path,
            replaced,
            total_routes = self.entries.len(),
            "Route registered"
        );
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no path has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Look up the request path and invoke the matching responder.
    ///
    /// Returns a request-scoped [`Dispatch`]: 404 with no body when the
    /// path is absent from the table or the matched responder produced no
    /// content, otherwise the responder's status and body. A responder that
    /// declared the sink capability receives `sink` for the duration of the
    /// call; no other responder is invoked.
    pub fn dispatch(&self, req: &JsonRequest, sink: &mut dyn ResponseSink) -> Dispatch {
        debug!(path = %req.path, "Route match attempt");
        let Some(responder) = self.entries.get(&req.path) else {
            debug!(path = %req.path, "No route matched");
            return Dispatch::not_found();
        };
        let give_sink = self.sink_routes.contains(&req.path);
        let dispatch = dispatch_one(responder.as_ref(), give_sink, req, sink);
        info!(
            request_id = %req.request_id,
            path = %req.path,
            status = dispatch.status,
            has_body = dispatch.body.is_some(),
            "Route dispatched"
        );
        dispatch
    }
}
