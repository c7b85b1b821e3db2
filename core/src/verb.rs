//! Type-level HTTP verbs.
//!
//! Each verb is a zero-sized marker. Routes opt into a verb by implementing
//! `Endpoint<V>` for it, so the set of verbs a route accepts is fixed at
//! compile time.

use crate::http::HttpMethod;

mod sealed {
    pub trait Sealed {}
}

/// A verb marker. Sealed: the five markers below are the complete set.
pub trait Verb: sealed::Sealed {
    const METHOD: HttpMethod;
}

macro_rules! verb {
    ($(#[$meta:meta])* $name:ident => $method:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl Verb for $name {
            const METHOD: HttpMethod = HttpMethod::$method;
        }
    };
}

verb!(
    /// `GET`
    Get => Get
);
verb!(
    /// `POST`
    Post => Post
);
verb!(
    /// `PUT`
    Put => Put
);
verb!(
    /// `PATCH`
    Patch => Patch
);
verb!(
    /// `DELETE`
    Delete => Delete
);
