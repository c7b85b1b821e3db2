//! Compile-time typed HTTP calls over a wrapped client.
//!
//! # Overview
//! A consumer declares a route table: which verbs each route accepts and,
//! per verb, the JSON body, query parameters and response shapes. The
//! `TypedClient` verb methods only accept routes that declare that verb, and
//! they return the declared response type. At run time the client is a thin
//! forwarder: it renders the request, hands it to `ureq` (or any other
//! `Transport`), and decodes the JSON body.
//!
//! # Design
//! - Routes are types implementing `Route`; declarations are
//!   `Endpoint<V>` impls, usually written with the `routes!` macro.
//! - Undeclared body/query shapes are `Absent`, an uninhabited type, so
//!   passing a body to a route that takes none does not compile.
//! - `build_request` / `parse_response` keep the host-does-IO split
//!   available for callers that execute the round-trip themselves.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use typed_routes::{routes, Options, TypedClient};
//!
//! #[derive(Serialize)]
//! struct NewNote { title: String }
//! #[derive(Debug, Deserialize)]
//! struct Note { id: String, title: String }
//!
//! struct Notes;
//!
//! routes! {
//!     Notes = "notes" {
//!         Get { response: Vec<Note> }
//!         Post { body: NewNote, response: Note }
//!     }
//! }
//!
//! # fn main() -> Result<(), typed_routes::Error> {
//! let client = TypedClient::new("http://localhost:3000")?;
//! let created: Note = client.post(&Notes, Options::new().body(NewNote { title: "hi".into() }))?;
//! let all: Vec<Note> = client.get(&Notes, Options::new())?;
//! println!("{created:?} of {}", all.len());
//! # Ok(())
//! # }
//! ```
//!
//! Calling a verb the route does not declare is rejected by the compiler:
//!
//! ```compile_fail
//! use typed_routes::{routes, Options, TypedClient};
//!
//! struct Notes;
//! routes! {
//!     Notes = "notes" {
//!         Get { response: Vec<String> }
//!     }
//! }
//!
//! let client = TypedClient::new("http://localhost:3000").unwrap();
//! let _ = client.delete(&Notes, Options::new());
//! ```
//!
//! So is a body on a route that declares none:
//!
//! ```compile_fail
//! use typed_routes::{routes, Options, TypedClient};
//!
//! struct Notes;
//! routes! {
//!     Notes = "notes" {
//!         Get { response: Vec<String> }
//!     }
//! }
//!
//! let client = TypedClient::new("http://localhost:3000").unwrap();
//! let _ = client.get(&Notes, Options::new().body("unexpected"));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod route;
pub mod transport;
pub mod verb;

pub use client::TypedClient;
pub use config::ClientConfig;
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::Options;
pub use route::{Absent, Endpoint, Route};
pub use transport::{Transport, UreqTransport};
pub use verb::{Delete, Get, Patch, Post, Put, Verb};
