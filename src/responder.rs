//! The `Responder` contract implemented by every request handler.

use crate::dispatcher::{JsonRequest, ResponseSink};

/// A handler capability that converts a request into an optional JSON body
/// and an HTTP status code.
///
/// Implementations are registered with a [`crate::router::Router`] (or used
/// as a single top-level target) and invoked by the dispatcher once per
/// matching request. Returning `None` from [`Responder::answer`] means
/// "no content for this request" and is treated as not-found downstream.
///
/// # Concurrency
///
/// A registered responder instance is shared across concurrent requests.
/// The `Send + Sync` bounds are enforced here; internal thread-safety of
/// `answer` is the implementer's obligation.
///
/// # Example
///
/// ```rust,ignore
/// struct Created;
///
/// impl Responder for Created {
///     fn answer(&self, _req: &JsonRequest) -> Option<String> {
///         Some(r#"{"ok":true}"#.to_string())
///     }
///
///     fn status(&self, _req: &JsonRequest) -> u16 {
///         201
///     }
/// }
/// ```
pub trait Responder: Send + Sync {
    /// Answer a request with a JSON string body.
    ///
    /// `None` means the responder has no content for this request; the
    /// dispatcher then falls back to its not-found handling.
    fn answer(&self, req: &JsonRequest) -> Option<String>;

    /// HTTP status code for the answer just produced. Defaults to 200.
    ///
    /// The request is passed in so per-request status codes never require
    /// mutable state on the shared responder instance.
    fn status(&self, _req: &JsonRequest) -> u16 {
        200
    }

    /// Declare the need for direct access to the response sink.
    ///
    /// Responders that add headers of their own override this to return
    /// `true`. The need is recorded once at registration time; such
    /// responders are invoked through [`Responder::answer_raw`] instead of
    /// [`Responder::answer`].
    fn wants_sink(&self) -> bool {
        false
    }

    /// Answer a request with direct access to the response sink.
    ///
    /// Only invoked for responders whose [`Responder::wants_sink`] returned
    /// `true` at registration time. The sink is handed over as a call
    /// parameter scoped to the current request, never stored. The default
    /// implementation ignores the sink and delegates to `answer`.
    ///
    /// Header values added here should come from a bounded set: the
    /// `may_minihttp` transport interns each distinct header line for the
    /// lifetime of the process.
    fn answer_raw(&self, req: &JsonRequest, _sink: &mut dyn ResponseSink) -> Option<String> {
        self.answer(req)
    }
}
