mod group;
pub mod pattern;
mod route;

pub use group::Group;
pub use pattern::CompiledPattern;
pub use route::{RouteInfo, UnknownVerb, Verb};

use crate::error::{RouterError, RouterResult};
use crate::handler::{NotFoundHandler, Params};
use crate::http::{RequestContext, DEFAULT_METHOD};
use crate::middleware::{Middleware, MiddlewareChain, SharedMiddleware};
use route::Route;
use std::fmt;
use std::sync::Arc;

macro_rules! verb_routes {
    ($($verb:expr => $name:ident, $name_with:ident;)*) => {
        $(
            #[doc = concat!("Registers a `", stringify!($verb), "` route.")]
            pub fn $name<F>(&mut self, rule: &str, handler: F) -> &mut Self
            where
                F: Fn(&Params) -> T + Send + Sync + 'static,
            {
                self.route(rule, handler, None, $verb)
            }

            #[doc = concat!("Registers a `", stringify!($verb), "` route with its own middleware.")]
            pub fn $name_with<F, M>(&mut self, rule: &str, handler: F, middleware: M) -> &mut Self
            where
                F: Fn(&Params) -> T + Send + Sync + 'static,
                M: Middleware,
            {
                self.route(rule, handler, Some(Arc::new(middleware)), $verb)
            }
        )*
    };
}

/// An ordered route table with global middleware and a not-found hook.
///
/// Routes are tried in registration order and the first one whose rule
/// matches the whole path, and whose verb equals the method (or is `ANY`),
/// wins. `T` is whatever the handlers return; it is handed back unchanged
/// from [`Router::dispatch`].
///
/// ```rust
/// use urouter::Router;
///
/// let mut router = Router::new();
/// router
///     .get("/user/<int>", |params| format!("user {}", &params[0]))
///     .post("/user", |_| "created".to_string());
///
/// assert_eq!(router.dispatch(Some("/user/42"), Some("GET")).unwrap(), "user 42");
/// assert!(router.dispatch(Some("/user/abc"), Some("GET")).is_err());
/// ```
pub struct Router<T = ()> {
    routes: Vec<Route<T>>,
    middlewares: MiddlewareChain,
    error_callback: Option<NotFoundHandler<T>>,
    context: RequestContext,
}

impl<T> Router<T> {
    /// Creates a router for use outside a request-serving environment;
    /// omitted dispatch arguments default to `/` and `GET`.
    pub fn new() -> Self {
        Self::with_context(RequestContext::detached())
    }

    pub fn with_context(context: RequestContext) -> Self {
        Self {
            routes: Vec::new(),
            middlewares: MiddlewareChain::new(),
            error_callback: None,
            context,
        }
    }

    /// Creates a router whose defaults come from the CGI environment.
    pub fn from_env() -> Self {
        Self::with_context(RequestContext::from_env())
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn route<F>(
        &mut self,
        rule: &str,
        handler: F,
        middleware: Option<SharedMiddleware>,
        verb: Verb,
    ) -> &mut Self
    where
        F: Fn(&Params) -> T + Send + Sync + 'static,
    {
        tracing::debug!(verb = %verb, rule = %rule, "Registering route");
        self.routes
            .push(Route::new(verb, rule, Box::new(handler), middleware));
        self
    }

    verb_routes! {
        Verb::Get => get, get_with;
        Verb::Post => post, post_with;
        Verb::Put => put, put_with;
        Verb::Patch => patch, patch_with;
        Verb::Delete => delete, delete_with;
        Verb::Options => options, options_with;
        Verb::Any => any, any_with;
    }

    /// Appends every route of `group`, in the group's order.
    pub fn group(&mut self, group: Group<T>) -> &mut Self {
        let Group {
            routes,
            middleware,
            verb,
        } = group;
        for (rule, handler) in routes {
            tracing::debug!(verb = %verb, rule = %rule, "Registering grouped route");
            self.routes
                .push(Route::new(verb, &rule, handler, middleware.clone()));
        }
        self
    }

    /// Appends a global middleware, run before every matched route.
    pub fn middleware<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.add(middleware);
        self
    }

    /// Replaces the default 404 outcome with `callback`.
    pub fn not_found<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.error_callback = Some(Box::new(callback));
        self
    }

    pub fn run_middlewares(&self) {
        self.middlewares.call();
    }

    /// Runs the not-found path for the router's own request context.
    pub fn handle_error(&self) -> RouterResult<T> {
        self.handle_not_found(&self.context.method, &self.context.path)
    }

    fn handle_not_found(&self, method: &str, path: &str) -> RouterResult<T> {
        match &self.error_callback {
            Some(callback) => Ok(callback()),
            None => Err(RouterError::not_found(method, path)),
        }
    }

    /// Resolves `path` and `method` to the first candidate route and runs the
    /// global middleware, the route's middleware and its handler, in that order.
    ///
    /// A missing (or empty) argument falls back to the router's request
    /// context. Without a candidate, no middleware runs and the result is the
    /// not-found callback's value or [`RouterError::NotFound`].
    pub fn dispatch(&self, path: Option<&str>, method: Option<&str>) -> RouterResult<T> {
        let path = path
            .filter(|path| !path.is_empty())
            .unwrap_or(self.context.path.as_str());
        let method = method
            .filter(|method| !method.is_empty())
            .unwrap_or(self.context.method.as_str());

        for route in &self.routes {
            if let Some(params) = route.candidate(path, method) {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    rule = %route.rule(),
                    verb = %route.verb,
                    "Route matched"
                );
                self.run_middlewares();
                return Ok(route.handle(&params));
            }
        }

        tracing::debug!(method = %method, path = %path, "No route matched");
        self.handle_not_found(method, path)
    }

    pub fn dispatch_request(&self, request: &RequestContext) -> RouterResult<T> {
        self.dispatch(Some(&request.path), Some(&request.method))
    }

    /// Whether some route would handle `path`; nothing is executed.
    /// `method` defaults to `GET`.
    pub fn test(&self, path: &str, method: Option<&str>) -> bool {
        let method = method.unwrap_or(DEFAULT_METHOD);
        self.routes
            .iter()
            .any(|route| route.is_candidate(path, method))
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(Route::info).collect()
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes())
            .field("middlewares", &self.middlewares.len())
            .field("not_found", &self.error_callback.is_some())
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn() + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let for_hooks = log.clone();
        let hook = move |name: &str| -> Box<dyn Fn() + Send + Sync> {
            let log = for_hooks.clone();
            let name = name.to_string();
            Box::new(move || log.lock().unwrap().push(name.clone()))
        };
        (log, hook)
    }

    #[test]
    fn chained_registration_keeps_order() {
        let mut router: Router<&'static str> = Router::new();
        router
            .get("/a", |_| "a")
            .post("/b", |_| "b")
            .any("/c", |_| "c")
            .delete("/d", |_| "d");

        let rules = router
            .routes()
            .into_iter()
            .map(|info| (info.rule, info.verb))
            .collect::<Vec<_>>();
        assert_eq!(
            rules,
            vec![
                ("/a".to_string(), Verb::Get),
                ("/b".to_string(), Verb::Post),
                ("/c".to_string(), Verb::Any),
                ("/d".to_string(), Verb::Delete),
            ]
        );
    }

    #[test]
    fn first_registered_match_wins() {
        let mut router = Router::new();
        router
            .get("/user/<int>", |_| "numeric")
            .get("/user/<str>", |_| "word")
            .get("/user/42", |_| "literal");

        assert_eq!(router.dispatch(Some("/user/42"), Some("GET")).unwrap(), "numeric");
        assert_eq!(router.dispatch(Some("/user/bob"), Some("GET")).unwrap(), "word");
    }

    #[test]
    fn handler_receives_captures_in_order() {
        let mut router = Router::new();
        router.put("/posts/<str>/<int>", |params| params.to_vec());

        assert_eq!(
            router.dispatch(Some("/posts/rust/7"), Some("PUT")).unwrap(),
            vec!["rust".to_string(), "7".to_string()]
        );
    }

    #[test]
    fn execution_order_is_global_then_route_then_handler() {
        let (log, hook) = recorder();
        let mut router = Router::new();
        router.middleware(hook("global-1"));
        router.middleware(hook("global-2"));
        let handler_log = log.clone();
        router.get_with(
            "/",
            move |_| handler_log.lock().unwrap().push("handler".into()),
            hook("route"),
        );

        router.dispatch(Some("/"), Some("GET")).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["global-1", "global-2", "route", "handler"]
        );
    }

    #[test]
    fn nothing_runs_without_a_match() {
        let (log, hook) = recorder();
        let mut router = Router::new();
        router.middleware(hook("global"));
        router.get_with("/only", |_| (), hook("route"));

        let err = router.dispatch(Some("/other"), Some("GET")).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.status_code(), 404);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn wrong_verb_is_not_found() {
        let mut router = Router::new();
        router.post("/login", |_| ());

        let err = router.dispatch(Some("/login"), Some("GET")).unwrap_err();
        match err {
            RouterError::NotFound { method, path } => {
                assert_eq!(method, "GET");
                assert_eq!(path, "/login");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn not_found_callback_supplies_the_outcome() {
        let mut router = Router::new();
        router.get("/", |_| "home").not_found(|| "custom 404");

        assert_eq!(router.dispatch(Some("/nope"), None).unwrap(), "custom 404");
        assert_eq!(router.handle_error().unwrap(), "custom 404");
    }

    #[test]
    fn handle_error_without_callback_reports_the_context() {
        let router: Router<u8> = Router::with_context(RequestContext::new("PUT", "/x"));

        let err = router.handle_error().unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No route for PUT /x");
        match err {
            RouterError::NotFound { method, path } => {
                assert_eq!((method.as_str(), path.as_str()), ("PUT", "/x"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn omitted_arguments_use_the_context() {
        let mut router = Router::with_context(RequestContext::from_uri("POST", "/form?x=1"));
        router.post("/form", |_| "posted").get("/", |_| "root");

        assert_eq!(router.dispatch(None, None).unwrap(), "posted");
        assert_eq!(router.dispatch(Some("/"), Some("GET")).unwrap(), "root");
        assert_eq!(router.dispatch(Some(""), Some("")).unwrap(), "posted");
    }

    #[test]
    fn detached_router_defaults_to_root_get() {
        let mut router = Router::new();
        router.get("/", |_| "root");

        assert_eq!(router.dispatch(None, None).unwrap(), "root");
        assert_eq!(router.context(), &RequestContext::detached());
    }

    #[test]
    fn group_defaults_to_any_and_shares_middleware() {
        let (log, hook) = recorder();
        let mut router = Router::new();
        router.group(
            Group::new()
                .add("/admin", |_| "dashboard")
                .add("/admin/<int>", |_| "item")
                .middleware(hook("auth")),
        );

        assert_eq!(router.dispatch(Some("/admin"), Some("DELETE")).unwrap(), "dashboard");
        assert_eq!(router.dispatch(Some("/admin/3"), Some("GET")).unwrap(), "item");
        assert_eq!(*log.lock().unwrap(), vec!["auth", "auth"]);
        assert!(router.routes().iter().all(|r| r.verb == Verb::Any && r.has_middleware));
    }

    #[test]
    fn group_verb_can_be_overridden() {
        let mut router = Router::new();
        router.group(Group::new().add("/feed", |_| ()).verb(Verb::Get));

        assert!(router.test("/feed", Some("GET")));
        assert!(!router.test("/feed", Some("POST")));
    }

    #[test]
    fn group_from_iterator() {
        let one: Handler<u8> = Box::new(|_: &Params| 1u8);
        let two: Handler<u8> = Box::new(|_: &Params| 2u8);
        let mut router = Router::new();
        router.group(vec![("/one", one), ("/two", two)].into_iter().collect::<Group<u8>>());

        assert_eq!(router.dispatch(Some("/two"), Some("PATCH")).unwrap(), 2);
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_has_no_side_effects() {
        let (log, hook) = recorder();
        let mut router = Router::new();
        router.middleware(hook("global"));
        router.get_with("/x/<int>", |_| (), hook("route"));

        for _ in 0..3 {
            assert!(router.test("/x/1", None));
            assert!(!router.test("/x/1", Some("POST")));
            assert!(!router.test("/y", None));
        }
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(router.len(), 1);
        assert_eq!(router.middleware_count(), 1);
    }

    #[test]
    fn handler_errors_pass_through() {
        let mut router: Router<Result<u32, String>> = Router::new();
        router.get("/n/<int>", |params| {
            params.parse::<u32>(0).ok_or_else(|| "overflow".to_string())
        });

        assert_eq!(router.dispatch(Some("/n/12"), None).unwrap(), Ok(12));
        assert_eq!(
            router.dispatch(Some("/n/99999999999"), None).unwrap(),
            Err("overflow".to_string())
        );
    }

    #[test]
    fn debug_lists_rules() {
        let mut router: Router = Router::new();
        router.get("/a", |_| ());
        let debug = format!("{:?}", router);
        assert!(debug.contains("\"/a\""));
    }
}
