use std::env;

pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_METHOD: &str = "GET";

/// The path and method of the request being served.
///
/// A router resolves one of these at construction and falls back to it
/// whenever `dispatch` is called without an explicit path or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
}

impl RequestContext {
    pub fn new<M: AsRef<str>, P: AsRef<str>>(method: M, path: P) -> Self {
        Self {
            method: method.as_ref().to_string(),
            path: path.as_ref().to_string(),
        }
    }

    /// Context used outside a request-serving environment.
    pub fn detached() -> Self {
        Self::new(DEFAULT_METHOD, DEFAULT_PATH)
    }

    /// Builds a context from a raw request target, dropping the query string,
    /// the fragment, and any `scheme://authority` prefix.
    pub fn from_uri<M: AsRef<str>>(method: M, uri: &str) -> Self {
        Self::new(method, path_of(uri))
    }

    /// Reads the CGI `REQUEST_URI` and `REQUEST_METHOD` variables.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("REQUEST_URI").ok(),
            env::var("REQUEST_METHOD").ok(),
        )
    }

    /// Without a URI the context is detached; a missing method means `GET`.
    pub fn from_vars(uri: Option<String>, method: Option<String>) -> Self {
        let Some(uri) = uri else {
            return Self::detached();
        };
        let method = method.unwrap_or_else(|| DEFAULT_METHOD.to_string());
        Self::from_uri(method, &uri)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::detached()
    }
}

fn path_of(uri: &str) -> &str {
    let uri = uri.split(['?', '#']).next().unwrap_or("");
    let uri = match uri.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("", |slash| &rest[slash..]),
        None => uri,
    };
    if uri.is_empty() {
        DEFAULT_PATH
    } else {
        uri
    }
}
