//! Startup configuration, resolved once from name/value pairs or from
//! prefixed environment variables.
//!
//! The pair names mirror the host's configuration surface:
//!
//! | pair name          | environment variable         | meaning                               |
//! |--------------------|------------------------------|---------------------------------------|
//! | `accessPath`       | `JSONGATE_ACCESS_PATH`       | `Access-Control-Allow-Origin`         |
//! | `customHeaders`    | `JSONGATE_CUSTOM_HEADERS`    | `Access-Control-Allow-Headers`        |
//! | `allowMethods`     | `JSONGATE_ALLOW_METHODS`     | method allow-list, comma-separated    |
//! | `allowCredentials` | `JSONGATE_ALLOW_CREDENTIALS` | `Access-Control-Allow-Credentials`    |
//! | `exposeHeaders`    | `JSONGATE_EXPOSE_HEADERS`    | `Access-Control-Expose-Headers`       |
//!
//! Unknown pair names are ignored with a debug log so hosts can keep
//! unrelated settings in the same map.

use crate::cors::CorsPolicy;
use std::env;
use tracing::debug;

/// Environment variable prefix for [`GateConfig::from_env`].
pub const ENV_PREFIX: &str = "JSONGATE_";

/// Resolved startup configuration. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    /// The CORS policy the dispatcher applies to every response.
    pub cors: CorsPolicy,
}

impl GateConfig {
    /// Resolve configuration from name/value pairs.
    ///
    /// Missing or blank values keep their defaults; see [`CorsPolicy`] for
    /// the parsing rules of each value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut origin = None;
        let mut headers = None;
        let mut methods = None;
        let mut credentials = None;
        let mut expose = None;

        for (name, value) in pairs {
            let value = value.as_ref().to_string();
            match name.as_ref() {
                "accessPath" => origin = Some(value),
                "customHeaders" => headers = Some(value),
                "allowMethods" => methods = Some(value),
                "allowCredentials" => credentials = Some(value),
                "exposeHeaders" => expose = Some(value),
                other => {
                    debug!(name = %other, "Ignoring unknown configuration pair");
                }
            }
        }

        GateConfig {
            cors: CorsPolicy::from_raw(
                origin.as_deref(),
                headers.as_deref(),
                methods.as_deref(),
                credentials.as_deref(),
                expose.as_deref(),
            ),
        }
    }

    /// Resolve configuration from `JSONGATE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let lookup = |suffix: &str| env::var(format!("{ENV_PREFIX}{suffix}")).ok();
        let pairs = [
            ("accessPath", lookup("ACCESS_PATH")),
            ("customHeaders", lookup("CUSTOM_HEADERS")),
            ("allowMethods", lookup("ALLOW_METHODS")),
            ("allowCredentials", lookup("ALLOW_CREDENTIALS")),
            ("exposeHeaders", lookup("EXPOSE_HEADERS")),
        ];
        Self::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        )
    }
}
