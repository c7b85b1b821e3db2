//! The seam between typed dispatch and the wrapped HTTP client.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and returns the response as data.
//! Status codes are never turned into errors here; `TypedClient` interprets
//! them. `UreqTransport` is the default, and any closure with the right
//! signature works as a stand-in for tests or host-driven IO.

use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, Error>,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self(request)
    }
}

/// Forwards requests to a `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data rather than `Err`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout_duration())
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wraps an agent the caller already configured.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut response = match (method, body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(&url), &headers).call(),
            (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(&url), &headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(&url), &headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(&url), &headers)
                .force_send_body()
                .send(body.as_bytes()),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(&url), &headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => {
                with_headers(self.agent.patch(&url), &headers).send_empty()
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for &UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        (**self).send(request)
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
