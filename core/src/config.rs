//! Client configuration.
//!
//! Holds the prefix URL and the defaults applied to every call. Everything
//! else (redirects, connection reuse, TLS) stays with the wrapped client.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::Error;

pub const BASE_URL_ENV: &str = "TYPED_ROUTES_BASE_URL";
pub const TIMEOUT_ENV: &str = "TYPED_ROUTES_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Prefix every route path is joined onto.
    pub base_url: String,
    /// Headers sent with every call, before per-call headers.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Global timeout handed to the wrapped client. `None` leaves its default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            headers: Vec::new(),
            timeout_ms: None,
        }
    }

    /// Reads `TYPED_ROUTES_BASE_URL` and, if set, `TYPED_ROUTES_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| Error::Config(format!("{BASE_URL_ENV} is not set")))?;
        let timeout_ms = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("{TIMEOUT_ENV}={raw:?} is not a number: {e}"))
            })?),
            Err(_) => None,
        };
        let config = Self {
            base_url,
            headers: Vec::new(),
            timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// The prefix must parse as an absolute `http` or `https` URL.
    pub fn validate(&self) -> Result<(), Error> {
        validate_base_url(&self.base_url)
    }
}

pub(crate) fn validate_base_url(base_url: &str) -> Result<(), Error> {
    let invalid = |reason: String| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };
    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{other}`"))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("prefix must not carry a query or fragment".to_string()));
    }
    Ok(())
}
