use super::request::parse_request;
use super::response::BufferedResponse;
use crate::dispatcher::Dispatcher;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::info;

/// `may_minihttp` service gluing the transport to the dispatcher.
///
/// One service value is cloned per connection; they all share the same
/// immutable dispatcher.
#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        AppService { dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);
        let mut out = BufferedResponse::new();
        let outcome = self.dispatcher.handle(&parsed, &mut out);
        info!(
            request_id = %parsed.request_id,
            method = %parsed.method,
            path = %parsed.path,
            status = out.status(),
            outcome = ?outcome,
            "Request complete"
        );
        out.flush(res);
        Ok(())
    }
}
