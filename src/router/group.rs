use crate::handler::{Handler, Params};
use crate::middleware::{Middleware, SharedMiddleware};
use crate::router::route::Verb;

/// Routes registered together, sharing one middleware and one verb.
///
/// The verb defaults to [`Verb::Any`].
pub struct Group<T> {
    pub(crate) routes: Vec<(String, Handler<T>)>,
    pub(crate) middleware: Option<SharedMiddleware>,
    pub(crate) verb: Verb,
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: None,
            verb: Verb::Any,
        }
    }

    pub fn add<F>(mut self, rule: &str, handler: F) -> Self
    where
        F: Fn(&Params) -> T + Send + Sync + 'static,
    {
        self.routes.push((rule.to_string(), Box::new(handler)));
        self
    }

    pub fn middleware<M: Middleware>(self, middleware: M) -> Self {
        self.shared_middleware(std::sync::Arc::new(middleware))
    }

    pub fn shared_middleware(mut self, middleware: SharedMiddleware) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn verb(mut self, verb: Verb) -> Self {
        self.verb = verb;
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: Into<String>> FromIterator<(R, Handler<T>)> for Group<T> {
    fn from_iter<I: IntoIterator<Item = (R, Handler<T>)>>(iter: I) -> Self {
        Self {
            routes: iter
                .into_iter()
                .map(|(rule, handler)| (rule.into(), handler))
                .collect(),
            ..Self::new()
        }
    }
}
