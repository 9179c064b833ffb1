use crate::dispatcher::JsonRequest;
use crate::ids::RequestId;
use http::Method;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// Collect parameters from the query string and, for form posts, the body.
///
/// Every value seen for a name is kept, query string first. Names and
/// values are percent-decoded as UTF-8.
pub fn parse_params(query: Option<&str>, form_body: Option<&str>) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    for raw in [query, form_body].into_iter().flatten() {
        for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            params
                .entry(name.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }
    params
}

/// Parse an incoming HTTP request into a [`JsonRequest`].
///
/// Header names are lowercased. A JSON content type makes the body
/// available as a parsed value; a form content type folds the body into the
/// parameter map the way query parameters are.
pub fn parse_request(req: Request) -> JsonRequest {
    let method = Method::from_bytes(req.method().as_bytes()).unwrap_or(Method::GET);
    let raw_path = req.path().to_string();
    let path = raw_path
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();
    let query = raw_path.split_once('?').map(|(_, q)| q.to_string());

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();
    debug!(
        header_count = headers.len(),
        "Headers extracted"
    );

    let request_id = RequestId::from_header_or_new(headers.get("x-request-id").map(String::as_str));

    let mut body_str = String::new();
    let body_len = req.body().read_to_string(&mut body_str).unwrap_or(0);
    let content_type = headers
        .get("content-type")
        .map(String::as_str)
        .unwrap_or("");

    let form_body = (body_len > 0
        && content_type.starts_with("application/x-www-form-urlencoded"))
    .then_some(body_str.as_str());
    let params = parse_params(query.as_deref(), form_body);

    let body = if body_len > 0 && content_type.starts_with("application/json") {
        serde_json::from_str(&body_str).ok()
    } else {
        None
    };

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        param_count = params.len(),
        body_bytes = body_len,
        "HTTP request parsed"
    );

    JsonRequest {
        request_id,
        method,
        path,
        headers,
        params,
        body,
    }
}
