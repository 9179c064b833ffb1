//! # Router Module
//!
//! Exact-path lookup and single-match dispatch with status propagation.
//!
//! The router holds an exact, case-sensitive URI table over shared
//! [`crate::responder::Responder`] instances. It performs no normalization:
//! `/sales` and `/sales/` are distinct keys, and there is no wildcard or
//! parameterized matching.
//!
//! Each call to [`Router::dispatch`] produces a request-scoped [`Dispatch`]
//! value carrying the HTTP status and optional body for exactly that call.
//! Nothing about an in-flight request is ever stored on the shared router,
//! so concurrent dispatches cannot observe each other's state.

mod core;

pub use core::{Dispatch, Router};

pub(crate) use core::dispatch_one;
