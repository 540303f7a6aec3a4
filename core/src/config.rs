//! Client configuration.
//!
//! Settings are fixed when the client is constructed. Changing the base URL
//! afterwards goes through `Fbx4vrmClient::set_base_url`, which needs
//! `&mut self` and so cannot race an in-flight request.

use std::time::Duration;

use crate::error::ConfigError;

/// Server used when neither the caller nor the environment names one.
pub const DEFAULT_SERVER_URL: &str = "https://localhost:8443";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection and logging settings for [`Fbx4vrmClient`](crate::Fbx4vrmClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base server URL. A trailing slash is trimmed by the client.
    pub base_url: String,
    /// Timeout applied to every request. Zero means no timeout.
    pub timeout: Duration,
    /// Log method, URL and bodies of every request and response.
    pub verbose_logging: bool,
    /// Accept any server certificate without validation.
    ///
    /// Insecure. Only meant for development servers with self-signed
    /// certificates.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            verbose_logging: false,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Configuration for development tooling: certificate validation is
    /// skipped so self-signed test servers are reachable.
    pub fn development(base_url: impl Into<String>) -> Self {
        Self {
            accept_invalid_certs: true,
            ..Self::new(base_url)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                  |
    /// |--------------------------------|--------------------------|
    /// | `FBX4VRM_SERVER_URL`           | `https://localhost:8443` |
    /// | `FBX4VRM_TIMEOUT_SECS`         | `30`                     |
    /// | `FBX4VRM_VERBOSE`              | `false`                  |
    /// | `FBX4VRM_ACCEPT_INVALID_CERTS` | `false`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("FBX4VRM_SERVER_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("FBX4VRM_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: "FBX4VRM_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("FBX4VRM_VERBOSE") {
            config.verbose_logging = parse_flag("FBX4VRM_VERBOSE", &raw)?;
        }

        if let Some(raw) = lookup("FBX4VRM_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = parse_flag("FBX4VRM_ACCEPT_INVALID_CERTS", &raw)?;
        }

        Ok(config)
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
    }
}
