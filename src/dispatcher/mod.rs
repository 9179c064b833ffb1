//! # Dispatcher Module
//!
//! The single entry point for every inbound request.
//!
//! The dispatcher applies the CORS policy, gates the HTTP method against the
//! configured allow-list, short-circuits preflight requests, delegates to
//! the routing target and writes the final response through a
//! [`ResponseSink`]. When nothing matched it falls back to the configured
//! not-found responder, keeping the 404 status.
//!
//! ## Request flow
//!
//! 1. CORS headers are applied unconditionally, before any status write
//! 2. `OPTIONS` requests complete immediately with 200 and no body
//! 3. Methods outside the allow-list complete with 400 and no body
//! 4. An unconfigured dispatcher completes with 404 and no body
//! 5. The routing target (table or single responder) answers; a body is
//!    emitted with the responder's status, `Content-Type` and a
//!    byte-accurate `Content-Length`; an absent body becomes 404, with the
//!    fallback responder consulted for an error payload
//!
//! Every terminal state is reported through [`Outcome`] for logging and
//! tests. Exactly one write reaches the underlying response sink per
//! request; short-circuit paths write headers and status only.

mod core;

pub use core::{Application, Dispatcher, JsonRequest, Outcome, ResponseSink, RoutingTarget};
