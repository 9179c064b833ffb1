//! CORS policy: allow-origin, allow-headers, allow-methods and the optional
//! credentials/expose extensions.
//!
//! The policy is resolved once at startup and applied to every response the
//! dispatcher writes, before any status or body. Preflight handling itself
//! lives in the dispatcher; this module only owns the policy value, its
//! parsing rules and its header rendering.

use crate::dispatcher::ResponseSink;
use http::Method;
use tracing::warn;

/// Default value for `Access-Control-Allow-Origin`.
pub const DEFAULT_ALLOW_ORIGIN: &str = "*";

/// Default value for `Access-Control-Allow-Headers`.
pub const DEFAULT_ALLOW_HEADERS: &str = "Content-Type";

fn default_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::OPTIONS]
}

/// CORS policy applied to every response.
///
/// `allow_methods` doubles as the dispatcher's method allow-list. The list
/// is never empty: configuration that yields nothing after trimming falls
/// back to `GET,POST,OPTIONS`.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: String,
    allow_headers: String,
    allow_methods: Vec<Method>,
    allow_credentials: Option<bool>,
    expose_headers: Option<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        CorsPolicy {
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_string(),
            allow_headers: DEFAULT_ALLOW_HEADERS.to_string(),
            allow_methods: default_methods(),
            allow_credentials: None,
            expose_headers: None,
        }
    }
}

impl CorsPolicy {
    /// Build a policy from its raw configuration values, applying the
    /// documented defaults for anything absent or blank.
    ///
    /// * `origin` - `Access-Control-Allow-Origin`, verbatim
    /// * `headers` - `Access-Control-Allow-Headers`, verbatim
    /// * `methods` - comma-separated method names, trimmed, uppercased and
    ///   de-duplicated in insertion order; empty result falls back to the
    ///   default set
    /// * `credentials` - `"true"` / `"false"`, case-insensitive; anything
    ///   else leaves the credentials header unset
    /// * `expose` - `Access-Control-Expose-Headers`, verbatim
    #[must_use]
    pub fn from_raw(
        origin: Option<&str>,
        headers: Option<&str>,
        methods: Option<&str>,
        credentials: Option<&str>,
        expose: Option<&str>,
    ) -> Self {
        let mut policy = CorsPolicy::default();
        if let Some(origin) = non_blank(origin) {
            policy.allow_origin = origin.to_string();
        }
        if let Some(headers) = non_blank(headers) {
            policy.allow_headers = headers.to_string();
        }
        if let Some(raw) = methods {
            let parsed = parse_methods(raw);
            if !parsed.is_empty() {
                policy.allow_methods = parsed;
            }
        }
        if let Some(raw) = credentials {
            policy.allow_credentials = parse_credentials(raw);
        }
        if let Some(expose) = non_blank(expose) {
            policy.expose_headers = Some(expose.to_string());
        }
        policy
    }

    /// Set the credentials flag explicitly.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = Some(allow);
        self
    }

    /// Set the exposed headers explicitly.
    #[must_use]
    pub fn expose_headers(mut self, headers: impl Into<String>) -> Self {
        self.expose_headers = Some(headers.into());
        self
    }

    /// The configured `Access-Control-Allow-Origin` value.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.allow_origin
    }

    /// The configured `Access-Control-Allow-Headers` value.
    #[must_use]
    pub fn headers(&self) -> &str {
        &self.allow_headers
    }

    /// The configured allow-list of methods.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.allow_methods
    }

    /// The credentials flag, when configured.
    #[must_use]
    pub fn credentials(&self) -> Option<bool> {
        self.allow_credentials
    }

    /// The exposed headers, when configured.
    #[must_use]
    pub fn exposed(&self) -> Option<&str> {
        self.expose_headers.as_deref()
    }

    /// Whether the method is in the configured allow-list.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.allow_methods.contains(method)
    }

    /// The comma-joined method list as sent in
    /// `Access-Control-Allow-Methods`.
    #[must_use]
    pub fn methods_header(&self) -> String {
        self.allow_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Write the Access-Control-* headers into the sink.
    ///
    /// Credentials and expose headers are only written when configured.
    pub fn apply(&self, sink: &mut dyn ResponseSink) {
        sink.add_header("Access-Control-Allow-Origin", &self.allow_origin);
        sink.add_header("Access-Control-Allow-Headers", &self.allow_headers);
        sink.add_header("Access-Control-Allow-Methods", &self.methods_header());
        if let Some(credentials) = self.allow_credentials {
            sink.add_header(
                "Access-Control-Allow-Credentials",
                if credentials { "true" } else { "false" },
            );
        }
        if let Some(expose) = &self.expose_headers {
            sink.add_header("Access-Control-Expose-Headers", expose);
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a comma-separated method list: trim, uppercase, de-duplicate in
/// insertion order. Unparseable tokens are skipped with a warning.
#[must_use]
pub fn parse_methods(raw: &str) -> Vec<Method> {
    let mut methods = Vec::new();
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match Method::from_bytes(token.to_ascii_uppercase().as_bytes()) {
            Ok(method) => {
                if !methods.contains(&method) {
                    methods.push(method);
                }
            }
            Err(_) => {
                warn!(token = %token, "Ignoring unparseable method in allowMethods");
            }
        }
    }
    methods
}

/// Parse the `allowCredentials` value: `"true"` / `"false"`,
/// case-insensitive; anything else counts as unconfigured.
#[must_use]
pub fn parse_credentials(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        if !raw.is_empty() {
            warn!(value = %raw, "Ignoring unparseable allowCredentials value");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_methods_dedup_order() {
        let methods = parse_methods(" get , post ,GET, put ");
        assert_eq!(methods, vec![Method::GET, Method::POST, Method::PUT]);
    }

    #[test]
    fn test_parse_credentials() {
        assert_eq!(parse_credentials("TRUE"), Some(true));
        assert_eq!(parse_credentials("False"), Some(false));
        assert_eq!(parse_credentials("banana"), None);
    }
}
