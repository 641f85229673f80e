//! # urouter
//!
//! A minimal HTTP request router meant to be embedded in a web server.
//!
//! ## Features
//!
//! - Rules with typed placeholders: `<int>`, `<integer>`, `<@>` capture digits,
//!   `<any>`, `<str>`, `<string>`, `<#>` capture word characters
//! - First match wins, in registration order
//! - Global and per-route middleware
//! - Custom not-found handling
//! - Dry-run route checks with [`Router::test`]
//!
//! ## Quick Start
//!
//! ```rust
//! use urouter::Router;
//!
//! let mut router = Router::new();
//! router
//!     .middleware(|| println!("request"))
//!     .get("/user/<int>", |params| format!("user #{}", &params[0]))
//!     .any("/ping", |_| "pong".to_string())
//!     .not_found(|| "nothing here".to_string());
//!
//! assert_eq!(router.dispatch(Some("/user/7"), Some("GET")).unwrap(), "user #7");
//! assert_eq!(router.dispatch(Some("/ping"), Some("POST")).unwrap(), "pong");
//! assert_eq!(router.dispatch(Some("/user/x"), Some("GET")).unwrap(), "nothing here");
//! assert!(router.test("/user/7", None));
//! ```
//!
//! ## Serving
//!
//! [`Application`] hosts a `Router<Response>` over plain TCP; see [`app`].

pub mod app;
pub mod error;
pub mod handler;
pub mod http;
pub mod middleware;
pub mod router;

pub use app::Application;
pub use error::{RouterError, RouterResult};
pub use handler::Params;
pub use http::{RequestContext, Response};
pub use middleware::{Middleware, MiddlewareChain, SharedMiddleware};
pub use router::{CompiledPattern, Group, RouteInfo, Router, Verb};
