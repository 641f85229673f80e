use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::handler::{Handler, Params};
use crate::middleware::SharedMiddleware;
use crate::router::pattern::CompiledPattern;

/// The HTTP verb a route is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Any,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
            Verb::Any => "ANY",
        }
    }

    /// Exact, case-sensitive comparison; `Any` accepts every method.
    pub fn accepts(&self, method: &str) -> bool {
        *self == Verb::Any || self.as_str() == method
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerb(pub String);

impl fmt::Display for UnknownVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown verb {:?}", self.0)
    }
}

impl std::error::Error for UnknownVerb {}

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            "OPTIONS" => Ok(Verb::Options),
            "ANY" => Ok(Verb::Any),
            _ => Err(UnknownVerb(s.to_string())),
        }
    }
}

pub(crate) struct Route<T> {
    pub(crate) pattern: CompiledPattern,
    pub(crate) handler: Handler<T>,
    pub(crate) middleware: Option<SharedMiddleware>,
    pub(crate) verb: Verb,
}

impl<T> Route<T> {
    pub(crate) fn new(
        verb: Verb,
        rule: &str,
        handler: Handler<T>,
        middleware: Option<SharedMiddleware>,
    ) -> Self {
        let pattern = CompiledPattern::compile(rule).unwrap_or_else(|err| {
            tracing::warn!(rule = %rule, error = %err, "Rule will never match");
            CompiledPattern::never(rule)
        });
        Self {
            pattern,
            handler,
            middleware,
            verb,
        }
    }

    pub(crate) fn rule(&self) -> &str {
        self.pattern.rule()
    }

    /// Captured params when this route is a candidate for `method` on `path`.
    pub(crate) fn candidate(&self, path: &str, method: &str) -> Option<Params> {
        if !self.verb.accepts(method) {
            return None;
        }
        self.pattern.captures(path)
    }

    pub(crate) fn is_candidate(&self, path: &str, method: &str) -> bool {
        self.verb.accepts(method) && self.pattern.is_match(path)
    }

    pub(crate) fn handle(&self, params: &Params) -> T {
        if let Some(middleware) = &self.middleware {
            middleware.call();
        }
        (self.handler)(params)
    }

    pub(crate) fn info(&self) -> RouteInfo {
        RouteInfo {
            rule: self.rule().to_string(),
            verb: self.verb,
            has_middleware: self.middleware.is_some(),
        }
    }
}

/// A registered route as seen from outside the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub rule: String,
    pub verb: Verb,
    pub has_middleware: bool,
}
