use crate::dispatcher::ResponseSink;
use may_minihttp::Response;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maximum inline headers before heap allocation. A gated response carries
/// at most the CORS set plus content headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the response path.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Buffered response implementing the dispatcher's [`ResponseSink`].
///
/// Collects status, headers and body during dispatch and flushes them to
/// the transport in one shot, so the underlying response sees exactly one
/// write per request and headers may still be added after the status was
/// chosen.
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: u16,
    headers: HeaderVec,
    body: Option<Vec<u8>>,
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        BufferedResponse {
            status: 200,
            headers: HeaderVec::new(),
            body: None,
        }
    }

    /// The buffered status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// First value of a buffered header, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of a buffered header, in insertion order.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The buffered body bytes, when one was written.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The buffered body as UTF-8 text.
    #[must_use]
    pub fn body_utf8(&self) -> Option<&str> {
        self.body().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Flush the buffered response into the transport response.
    ///
    /// `Content-Length` is skipped: `may_minihttp` derives it from the body
    /// buffer, and writing it twice would duplicate the header on the wire.
    pub fn flush(self, res: &mut Response) {
        res.status_code(usize::from(self.status), status_reason(self.status));
        for (name, value) in &self.headers {
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            res.header(cached_header_line(name, value));
        }
        if let Some(body) = self.body {
            res.body_vec(body);
        }
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((Arc::from(name), value.to_string()));
    }

    fn write_body(&mut self, bytes: &[u8]) {
        self.body = Some(bytes.to_vec());
    }
}

/// `may_minihttp` takes `&'static str` header lines. Every header the gate
/// emits is config-constant, so each distinct line is leaked exactly once
/// and reused for the lifetime of the process.
fn cached_header_line(name: &str, value: &str) -> &'static str {
    static CACHE: Lazy<Mutex<HashMap<String, &'static str>>> =
        Lazy::new(|| Mutex::new(HashMap::new()));
    let line = format!("{name}: {value}");
    let mut cache = CACHE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(cached) = cache.get(&line) {
        return cached;
    }
    let leaked: &'static str = Box::leak(line.clone().into_boxed_str());
    cache.insert(line, leaked);
    leaked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
    }

    #[test]
    fn test_buffered_response_records_headers_and_body() {
        let mut res = BufferedResponse::new();
        res.set_status(201);
        res.add_header("Content-Type", "application/json; charset=utf-8");
        res.add_header("X-Extra", "1");
        res.add_header("X-Extra", "2");
        res.write_body(b"{}");
        assert_eq!(res.status(), 201);
        assert_eq!(res.header("content-type"), Some("application/json; charset=utf-8"));
        assert_eq!(res.header_values("x-extra"), vec!["1", "2"]);
        assert_eq!(res.body_utf8(), Some("{}"));
    }

    #[test]
    fn test_cached_header_line_is_stable() {
        let a = cached_header_line("X-Test", "v");
        let b = cached_header_line("X-Test", "v");
        assert!(std::ptr::eq(a, b));
    }
}
