//! # jsongate
//!
//! **jsongate** is a minimal HTTP request-dispatch layer for JSON-producing
//! handlers, built on the `may` coroutine runtime and `may_minihttp`.
//!
//! It sits in front of a set of [`Responder`] implementations and mediates
//! exact-path URI routing, CORS/method policy enforcement and response
//! serialization. Transport parsing, handler business logic and process
//! lifecycle belong to the host application.
//!
//! ## Architecture
//!
//! - **[`responder`]** - the `Responder` contract every handler implements:
//!   answer a request with an optional JSON body and a status code
//! - **[`router`]** - exact-match URI table selecting one responder per
//!   request, returning a per-request [`router::Dispatch`] outcome
//! - **[`dispatcher`]** - the single entry point: CORS headers, method
//!   gating, preflight, fallback-to-not-found, response emission
//! - **[`cors`]** - the CORS policy value and its configuration rules
//! - **[`config`]** - startup configuration from name/value pairs or
//!   `JSONGATE_*` environment variables
//! - **[`params`]** - request-parameter accessors with repair of the known
//!   ISO-8859-1 mis-decoding of non-ASCII values
//! - **[`server`]** - `may_minihttp` integration: request parsing, the
//!   buffered response sink, the `HttpService` glue and the server handle
//!
//! ## Example
//!
//! ```rust,ignore
//! use jsongate::{CorsPolicy, Dispatcher, JsonRequest, Responder, Router, RoutingTarget};
//! use jsongate::server::{AppService, HttpServer};
//! use std::sync::Arc;
//!
//! struct Sales;
//!
//! impl Responder for Sales {
//!     fn answer(&self, _req: &JsonRequest) -> Option<String> {
//!         Some(r#"{"sales":[]}"#.to_string())
//!     }
//! }
//!
//! let mut router = Router::new();
//! router.register("/sales", Arc::new(Sales));
//!
//! let dispatcher = Dispatcher::with_target(
//!     CorsPolicy::default(),
//!     RoutingTarget::table(router),
//! );
//! let service = AppService::new(Arc::new(dispatcher));
//! let handle = HttpServer(service).start("0.0.0.0:8080")?;
//! handle.join().ok();
//! ```
//!
//! ## Concurrency
//!
//! One `Dispatcher` serves all connections concurrently. The routing table,
//! CORS policy and fallback responder are read-only after startup; all
//! per-request state (status, body, response sink) travels through call
//! arguments and return values, never through shared fields. Responder
//! implementations are `Send + Sync` and own the thread-safety of their own
//! `answer`.

pub mod config;
pub mod cors;
pub mod dispatcher;
pub mod ids;
pub mod params;
pub mod responder;
pub mod router;
pub mod server;

pub use config::GateConfig;
pub use cors::CorsPolicy;
pub use dispatcher::{Application, Dispatcher, JsonRequest, Outcome, ResponseSink, RoutingTarget};
pub use ids::RequestId;
pub use responder::Responder;
pub use router::{Dispatch, Router};
