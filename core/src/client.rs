//! Typed dispatcher over a wrapped HTTP client.
//!
//! # Design
//! `TypedClient` holds the prefix URL, default headers and a `Transport`.
//! Each call is split into `build_request` (typed route and options to an
//! `HttpRequest`) and `parse_response` (an `HttpResponse` to the route's
//! declared response type); the verb methods run both around one
//! `Transport::send`. Nothing is retried and nothing is cached.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{validate_base_url, ClientConfig};
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::Options;
use crate::route::Endpoint;
use crate::transport::{Transport, UreqTransport};
use crate::verb::{Delete, Get, Patch, Post, Put, Verb};

const JSON: &str = "application/json";

/// Dispatches typed route calls through a `Transport`.
#[derive(Debug, Clone)]
pub struct TypedClient<T = UreqTransport> {
    base_url: String,
    headers: Vec<(String, String)>,
    transport: T,
}

impl TypedClient<UreqTransport> {
    /// Client backed by a default `ureq` agent.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::from_config(ClientConfig::new(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> TypedClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: config.headers,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get<R: Endpoint<Get>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        self.request::<Get, R>(route, options)
    }

    pub fn post<R: Endpoint<Post>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        self.request::<Post, R>(route, options)
    }

    pub fn put<R: Endpoint<Put>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        self.request::<Put, R>(route, options)
    }

    pub fn patch<R: Endpoint<Patch>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        self.request::<Patch, R>(route, options)
    }

    pub fn delete<R: Endpoint<Delete>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        self.request::<Delete, R>(route, options)
    }

    /// Builds, sends and parses one call for verb `V`.
    pub fn request<V: Verb, R: Endpoint<V>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<R::Response, Error> {
        let request = self.build_request::<V, R>(route, options)?;
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, "received response");
        self.parse_response::<V, R>(response)
    }

    /// Renders the request for `route` without sending it.
    ///
    /// Headers are, in order: the configured defaults, `accept`, `content-type`
    /// when a body is present, then the per-call headers.
    pub fn build_request<V: Verb, R: Endpoint<V>>(
        &self,
        route: &R,
        options: Options<R::Body, R::Query>,
    ) -> Result<HttpRequest, Error> {
        let Options {
            body,
            query,
            headers: extra_headers,
            prefix_url,
        } = options;

        let prefix = match prefix_url.as_deref() {
            Some(prefix) => {
                validate_base_url(prefix)?;
                prefix.trim_end_matches('/')
            }
            None => self.base_url.as_str(),
        };

        let mut url = join_url(prefix, &route.path());
        if let Some(query) = query {
            let encoded = serde_urlencoded::to_string(&query)?;
            if !encoded.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encoded);
            }
        }

        let mut headers = self.headers.clone();
        headers.push(("accept".to_string(), JSON.to_string()));
        let body = match body {
            Some(body) => {
                headers.push(("content-type".to_string(), JSON.to_string()));
                Some(serde_json::to_string(&body).map_err(Error::Encode)?)
            }
            None => None,
        };
        headers.extend(extra_headers);

        Ok(HttpRequest {
            method: V::METHOD,
            url,
            headers,
            body,
        })
    }

    /// Interprets a response to a call for verb `V` on route `R`.
    ///
    /// Non-2xx statuses become `Error::Status`. A 204 or an empty body decodes
    /// as JSON `null`, which suits `()` and `Option<_>` responses.
    pub fn parse_response<V: Verb, R: Endpoint<V>>(
        &self,
        response: HttpResponse,
    ) -> Result<R::Response, Error> {
        if !response.is_success() {
            return Err(Error::Status {
                status: response.status,
                body: response.body,
            });
        }
        decode_json(&response)
    }
}

fn join_url(prefix: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{path}")
    }
}

fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, Error> {
    let body = response.body.trim();
    if response.status == 204 || body.is_empty() {
        return serde_json::from_str("null").map_err(Error::Decode);
    }
    serde_json::from_str(body).map_err(Error::Decode)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Mutex;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::http::HttpMethod;
    use crate::route::Route;

    #[derive(Debug, Serialize)]
    struct Search {
        #[serde(skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    }

    #[derive(Debug, Serialize)]
    struct Draft {
        title: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        id: u32,
        title: String,
    }

    struct Entries;
    struct EntryById(u32);
    struct Feed;

    impl Route for EntryById {
        fn path(&self) -> Cow<'_, str> {
            Cow::Owned(format!("/entries/{}", self.0))
        }
    }

    crate::routes! {
        Entries = "entries" {
            Get { query: Search, response: Vec<Entry> }
            Post { body: Draft, response: Entry }
        }
        EntryById {
            Get { response: Entry }
            Put { body: Draft, response: Entry }
            Patch { body: Draft, response: Entry }
            Delete { response: () }
        }
        Feed = "feed?format=json" {
            Get { query: Search, response: Vec<Entry> }
        }
    }

    fn respond(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn reply(status: u16, body: &str) -> Result<HttpResponse, Error> {
        Ok(respond(status, body))
    }

    fn client() -> TypedClient<impl Fn(HttpRequest) -> Result<HttpResponse, Error>> {
        TypedClient::with_transport(
            ClientConfig::new("http://localhost:3000/"),
            |_request: HttpRequest| reply(500, "unused"),
        )
        .unwrap()
    }

    #[test]
    fn prefix_trailing_slash_is_stripped() {
        assert_eq!(client().base_url(), "http://localhost:3000");
    }

    #[test]
    fn invalid_prefix_is_rejected_at_construction() {
        let err = TypedClient::new("localhost:3000/api").unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn build_get_with_query() {
        let options = Options::new().query(Search {
            tag: Some("rust".to_string()),
            limit: Some(2),
        });
        let req = client().build_request::<Get, _>(&Entries, options).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/entries?tag=rust&limit=2");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), None);
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_query_adds_no_separator() {
        let options = Options::new().query(Search {
            tag: None,
            limit: None,
        });
        let req = client().build_request::<Get, _>(&Entries, options).unwrap();
        assert_eq!(req.url, "http://localhost:3000/entries");
    }

    #[test]
    fn query_extends_an_existing_query_string() {
        let options = Options::new().query(Search {
            tag: Some("a b".to_string()),
            limit: None,
        });
        let req = client().build_request::<Get, _>(&Feed, options).unwrap();
        assert_eq!(req.url, "http://localhost:3000/feed?format=json&tag=a+b");
    }

    #[test]
    fn build_post_serializes_body() {
        let options = Options::new().body(Draft {
            title: "First".to_string(),
        });
        let req = client().build_request::<Post, _>(&Entries, options).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/entries");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "title": "First" }));
    }

    #[test]
    fn leading_slash_in_route_path_is_not_doubled() {
        let req = client()
            .build_request::<Delete, _>(&EntryById(9), Options::new())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/entries/9");
    }

    #[test]
    fn header_order_is_defaults_then_json_then_per_call() {
        let client = TypedClient::with_transport(
            ClientConfig::new("http://localhost:3000").header("authorization", "Bearer t"),
            |_request: HttpRequest| reply(200, ""),
        )
        .unwrap();
        let options = Options::new()
            .body(Draft {
                title: "x".to_string(),
            })
            .header("x-request-id", "42");
        let req = client
            .build_request::<Patch, _>(&EntryById(1), options)
            .unwrap();
        let names: Vec<&str> = req.headers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["authorization", "accept", "content-type", "x-request-id"]
        );
    }

    #[test]
    fn prefix_url_override_applies_to_one_call() {
        let c = client();
        let req = c
            .build_request::<Get, _>(
                &EntryById(3),
                Options::new().prefix_url("https://mirror.example.com/v2/"),
            )
            .unwrap();
        assert_eq!(req.url, "https://mirror.example.com/v2/entries/3");

        let req = c
            .build_request::<Get, _>(&EntryById(3), Options::new())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/entries/3");
    }

    #[test]
    fn invalid_prefix_url_override_is_rejected() {
        let err = client()
            .build_request::<Get, _>(&EntryById(3), Options::new().prefix_url("nowhere"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { .. }));
    }

    #[test]
    fn parse_success_decodes_declared_shape() {
        let entry = client()
            .parse_response::<Get, EntryById>(respond(200, r#"{"id":1,"title":"One"}"#))
            .unwrap();
        assert_eq!(
            entry,
            Entry {
                id: 1,
                title: "One".to_string()
            }
        );
    }

    #[test]
    fn parse_not_found_is_a_status_error() {
        let err = client()
            .parse_response::<Get, EntryById>(respond(404, "missing"))
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, Error::Status { status: 404, ref body } if body == "missing"));
    }

    #[test]
    fn parse_no_content_yields_unit() {
        client()
            .parse_response::<Delete, EntryById>(respond(204, ""))
            .unwrap();
    }

    #[test]
    fn parse_bad_json_is_a_decode_error() {
        let err = client()
            .parse_response::<Get, Entries>(respond(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn parse_wrong_shape_is_a_decode_error() {
        let err = client()
            .parse_response::<Get, Entries>(respond(200, r#"{"id":1}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn verb_methods_forward_through_the_transport() {
        let seen = Mutex::new(Vec::new());
        let client = TypedClient::with_transport(
            ClientConfig::new("http://localhost:3000"),
            |request: HttpRequest| {
                seen.lock().unwrap().push((request.method, request.url));
                reply(200, r#"{"id":5,"title":"Five"}"#)
            },
        )
        .unwrap();

        let draft = || Draft {
            title: "Five".to_string(),
        };
        assert_eq!(client.get(&EntryById(5), Options::new()).unwrap().id, 5);
        assert_eq!(client.post(&Entries, Options::new().body(draft())).unwrap().id, 5);
        assert_eq!(client.put(&EntryById(5), Options::new().body(draft())).unwrap().id, 5);
        assert_eq!(client.patch(&EntryById(5), Options::new().body(draft())).unwrap().id, 5);

        drop(client);
        let seen = seen.into_inner().unwrap();
        let methods: Vec<HttpMethod> = seen.iter().map(|(method, _)| *method).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch]
        );
        assert_eq!(seen[1].1, "http://localhost:3000/entries");
    }

    #[test]
    fn transport_failure_propagates_unchanged() {
        let client = TypedClient::with_transport(
            ClientConfig::new("http://localhost:3000"),
            |_request: HttpRequest| -> Result<HttpResponse, Error> {
                Err(Error::Transport(ureq::Error::StatusCode(502)))
            },
        )
        .unwrap();
        let err = client.delete(&EntryById(1), Options::new()).unwrap_err();
        assert!(matches!(err, Error::Transport(ureq::Error::StatusCode(502))));
        assert_eq!(err.status(), Some(502));
    }

    #[derive(Debug, Serialize)]
    struct Scope {
        owner: String,
        search: Search,
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refuses to serialize"))
        }
    }

    struct Scoped;
    struct Broken;

    crate::routes! {
        Scoped = "scoped" {
            Get { query: Scope, response: Vec<Entry> }
        }
        Broken = "broken" {
            Post { body: Unencodable, response: Entry }
        }
    }

    #[test]
    fn nested_query_is_a_query_error() {
        let options = Options::new().query(Scope {
            owner: "ana".to_string(),
            search: Search {
                tag: None,
                limit: Some(1),
            },
        });
        let err = client().build_request::<Get, _>(&Scoped, options).unwrap_err();
        assert!(matches!(err, Error::Query(_)), "got {err:?}");

        let options = Options::new().query(Scope {
            owner: "ana".to_string(),
            search: Search {
                tag: None,
                limit: None,
            },
        });
        let result = client().get(&Scoped, options);
        assert!(matches!(result, Err(Error::Query(_))));
    }

    #[test]
    fn unserializable_body_is_an_encode_error() {
        let err = client()
            .build_request::<Post, _>(&Broken, Options::new().body(Unencodable))
            .unwrap_err();
        assert!(matches!(err, Error::Encode(_)), "got {err:?}");
        assert!(err.to_string().contains("refuses to serialize"));
    }

    #[test]
    fn transport_accessor_returns_the_wrapped_transport() {
        let client = client();
        let response = client
            .transport()
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: "http://localhost:3000/anything".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "unused");
    }
}
