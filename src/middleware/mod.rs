use std::sync::Arc;

/// A hook run for its side effects before a matched route's handler.
///
/// Middleware cannot stop a dispatch or change which route was chosen.
/// Any closure `Fn()` is a middleware; types with state can implement the
/// trait directly.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self);
}

impl<F> Middleware for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn call(&self) {
        (self)()
    }
}

/// Middleware shared between the chain, routes and groups.
pub type SharedMiddleware = Arc<dyn Middleware>;

#[derive(Clone, Default)]
pub struct MiddlewareChain {
    pub(crate) middlewares: Vec<SharedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Runs every middleware once, in registration order.
    pub fn call(&self) {
        for middleware in &self.middlewares {
            middleware.call();
        }
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        for name in ["first", "second", "third"] {
            let log = log.clone();
            chain.add(move || log.lock().unwrap().push(name));
        }

        chain.call();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    struct Counter(Arc<std::sync::atomic::AtomicUsize>);

    impl Middleware for Counter {
        fn call(&self) {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[test]
    fn struct_middleware_runs_each_call() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut chain = MiddlewareChain::new();
        chain.add(Counter(count.clone()));

        chain.call();
        chain.call();

        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(chain.len(), 1);
    }
}
