//! Per-call options bag.

use std::fmt;

/// Options for a single dispatched call.
///
/// `B` and `Q` are the endpoint's declared body and query shapes. For an
/// endpoint that declares neither they are `Absent`, which has no values, so
/// nothing can be passed to `body` or `query` and those fields stay `None`.
pub struct Options<B, Q> {
    pub(crate) body: Option<B>,
    pub(crate) query: Option<Q>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) prefix_url: Option<String>,
}

impl<B, Q> Options<B, Q> {
    pub fn new() -> Self {
        Self {
            body: None,
            query: None,
            headers: Vec::new(),
            prefix_url: None,
        }
    }

    /// JSON request body.
    pub fn body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    /// Query parameters, form-encoded onto the URL.
    pub fn query(mut self, query: Q) -> Self {
        self.query = Some(query);
        self
    }

    /// Extra header for this call only. Sent after the client's defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Overrides the client's prefix URL for this call.
    pub fn prefix_url(mut self, prefix_url: impl Into<String>) -> Self {
        self.prefix_url = Some(prefix_url.into());
        self
    }
}

impl<B, Q> Default for Options<B, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B, Q> fmt::Debug for Options<B, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("has_body", &self.body.is_some())
            .field("has_query", &self.query.is_some())
            .field("headers", &self.headers)
            .field("prefix_url", &self.prefix_url)
            .finish()
    }
}
