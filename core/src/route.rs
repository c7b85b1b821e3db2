//! Route table traits.
//!
//! # Design
//! A route is any type that can render its path. Implementing
//! `Endpoint<V>` for a route declares that the route accepts verb `V` and
//! fixes the body, query and response shapes for that pairing. The client's
//! verb methods are bounded on `Endpoint<V>`, so an undeclared verb is a
//! compile error and none of this exists at run time.
//!
//! Undeclared body or query shapes use `Absent`, which has no values: an
//! options bag for such an endpoint can only ever carry `None` there.

use std::borrow::Cow;

use serde::{de::DeserializeOwned, Serialize, Serializer};

use crate::verb::Verb;

/// An API endpoint path, relative to the client's prefix URL.
pub trait Route {
    fn path(&self) -> Cow<'_, str>;
}

impl<R: Route + ?Sized> Route for &R {
    fn path(&self) -> Cow<'_, str> {
        (**self).path()
    }
}

/// Declares that a route accepts verb `V` and with which shapes.
pub trait Endpoint<V: Verb>: Route {
    /// JSON request body. `Absent` when the endpoint takes none.
    type Body: Serialize;
    /// Query parameters, form-encoded. `Absent` when the endpoint takes none.
    type Query: Serialize;
    /// JSON response body.
    type Response: DeserializeOwned;
}

/// Placeholder for an undeclared body or query shape. Uninhabited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absent {}

impl Serialize for Absent {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        match *self {}
    }
}

/// Declares a route table.
///
/// Each entry names a route type, optionally followed by `= "path"` to
/// generate a static `Route` impl, then one block per accepted verb. Inside
/// a verb block `body` and `query` are optional and must appear in that
/// order before `response`.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use std::borrow::Cow;
/// use typed_routes::{routes, Route};
///
/// #[derive(Serialize)]
/// struct NewNote { title: String }
/// #[derive(Serialize)]
/// struct NoteFilter { tag: String }
/// #[derive(Deserialize)]
/// struct Note { id: String, title: String }
///
/// struct Notes;
/// struct NoteById(String);
///
/// impl Route for NoteById {
///     fn path(&self) -> Cow<'_, str> {
///         Cow::Owned(format!("notes/{}", self.0))
///     }
/// }
///
/// routes! {
///     Notes = "notes" {
///         Get { query: NoteFilter, response: Vec<Note> }
///         Post { body: NewNote, response: Note }
///     }
///     NoteById {
///         Get { response: Note }
///         Delete { response: () }
///     }
/// }
/// ```
#[macro_export]
macro_rules! routes {
    (@or ; $default:ty) => { $default };
    (@or $declared:ty ; $default:ty) => { $declared };

    (@verbs $route:ident;) => {};
    (@verbs $route:ident;
        $verb:ident {
            $(body: $body:ty,)?
            $(query: $query:ty,)?
            response: $response:ty $(,)?
        }
        $($rest:tt)*
    ) => {
        impl $crate::Endpoint<$crate::verb::$verb> for $route {
            type Body = $crate::routes!(@or $($body)? ; $crate::Absent);
            type Query = $crate::routes!(@or $($query)? ; $crate::Absent);
            type Response = $response;
        }
        $crate::routes!(@verbs $route; $($rest)*);
    };

    () => {};
    ($route:ident = $path:literal { $($verbs:tt)* } $($rest:tt)*) => {
        impl $crate::Route for $route {
            fn path(&self) -> ::std::borrow::Cow<'_, str> {
                ::std::borrow::Cow::Borrowed($path)
            }
        }
        $crate::routes!(@verbs $route; $($verbs)*);
        $crate::routes!($($rest)*);
    };
    ($route:ident { $($verbs:tt)* } $($rest:tt)*) => {
        $crate::routes!(@verbs $route; $($verbs)*);
        $crate::routes!($($rest)*);
    };
}
