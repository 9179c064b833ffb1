//! The host-collaborator side of the gate: transport request parsing, the
//! buffered response sink, the `HttpService` glue and the server wrapper.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_params, parse_request};
pub use response::{BufferedResponse, HeaderVec, MAX_INLINE_HEADERS};
pub use service::AppService;
