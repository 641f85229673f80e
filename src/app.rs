//! A small HTTP/1.1 host for a [`Router`].
//!
//! The host reads the request line of each connection, dispatches the path
//! and method through the router and writes back the handler's [`Response`].
//! Unmatched requests get status 404 with the body `404`.
//!
//! ```rust,no_run
//! use urouter::{Application, Response, Router};
//!
//! let mut router = Router::new();
//! router.get("/hello/<str>", |params| Response::text(format!("Hello, {}!", &params[0])));
//!
//! Application::new(router).listen("127.0.0.1:3000").unwrap();
//! ```

use crate::error::RouterError;
use crate::http::{RequestContext, Response};
use crate::router::Router;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

type ErrorHandler = Arc<dyn Fn(&RouterError) -> Response + Send + Sync>;

const MAX_HEADER_LINES: usize = 100;
const MAX_LINE_LEN: u64 = 8 * 1024;

#[derive(Clone)]
pub struct Application {
    pub max_connections: usize,
    router: Arc<Router<Response>>,
    on_error: Option<ErrorHandler>,
}

impl Application {
    pub fn new(router: Router<Response>) -> Self {
        Self {
            max_connections: 256,
            router: Arc::new(router),
            on_error: None,
        }
    }

    pub fn max_connections(&mut self, max_connections: usize) -> &mut Self {
        self.max_connections = max_connections;
        self
    }

    /// Overrides how router errors (including not-found) are rendered.
    pub fn on_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&RouterError) -> Response + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn router(&self) -> &Router<Response> {
        &self.router
    }

    /// Starts the HTTP server
    ///
    /// # Arguments
    /// * `addr` - Address to listen on (e.g. "127.0.0.1:3000")
    pub fn listen(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let runtime = Runtime::new()?;
        runtime.block_on(async {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(addr = %addr, routes = self.router.len(), "Server listening");
            self.serve(listener).await
        })
    }

    /// Accepts connections from `listener` until it fails.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let connection_counter = Arc::new(AtomicUsize::new(0));
        loop {
            let (stream, peer) = listener.accept().await?;
            if connection_counter.load(Ordering::Relaxed) >= self.max_connections {
                tracing::warn!(peer = %peer, "Max connections reached, dropping connection");
                drop(stream);
                continue;
            }

            connection_counter.fetch_add(1, Ordering::Relaxed);
            let app = self.clone();
            let counter = Arc::clone(&connection_counter);
            tokio::spawn(async move {
                if let Err(e) = app.handle_connection(stream).await {
                    tracing::error!(peer = %peer, error = %e, "Connection error");
                }
                counter.fetch_sub(1, Ordering::Relaxed);
            });
        }
    }

    /// Serves a single request on `stream` and closes it.
    pub async fn handle_connection<S>(&self, mut stream: S) -> Result<(), RouterError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut buf_reader = BufReader::new(&mut stream);
        let mut response = match read_request(&mut buf_reader).await {
            Ok(None) => return Ok(()),
            Ok(Some(request)) => self.respond(&request),
            Err(err @ RouterError::BadRequest(_)) => self.render_error(&err),
            Err(err) => return Err(err),
        };
        response.header("Connection", "close");
        stream.write_all(&response.to_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Dispatches `request`, turning router errors and handler panics into
    /// responses.
    pub fn respond(&self, request: &RequestContext) -> Response {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.router.dispatch_request(request)
        }));
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                let panic_msg = if let Some(msg) = err.downcast_ref::<&str>() {
                    msg.to_string()
                } else if let Some(msg) = err.downcast_ref::<String>() {
                    msg.clone()
                } else {
                    "Unknown panic".to_string()
                };
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    panic = %panic_msg,
                    "Handler panicked"
                );
                Err(RouterError::PanicError(panic_msg))
            }
        };
        match result {
            Ok(response) => response,
            Err(err) => self.render_error(&err),
        }
    }

    fn render_error(&self, error: &RouterError) -> Response {
        if let Some(handler) = &self.on_error {
            handler(error)
        } else {
            Response::from_error(error)
        }
    }
}

/// Reads the request line and drains the headers, which are not routed on.
async fn read_request<R>(reader: &mut R) -> Result<Option<RequestContext>, RouterError>
where
    R: AsyncBufRead + Unpin,
{
    let mut request_line = String::new();
    if read_line_capped(reader, &mut request_line).await? == 0 {
        return Ok(None);
    }

    for _ in 0..MAX_HEADER_LINES {
        let mut line = String::new();
        let read = read_line_capped(reader, &mut line).await?;
        if read == 0 || line.trim().is_empty() {
            break;
        }
    }

    parse_request_line(&request_line).map(Some)
}

async fn read_line_capped<R>(reader: &mut R, line: &mut String) -> Result<usize, RouterError>
where
    R: AsyncBufRead + Unpin,
{
    let read = (&mut *reader).take(MAX_LINE_LEN).read_line(line).await?;
    if read as u64 >= MAX_LINE_LEN && !line.ends_with('\n') {
        return Err(RouterError::BadRequest("Line too long".to_string()));
    }
    Ok(read)
}

fn parse_request_line(line: &str) -> Result<RequestContext, RouterError> {
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RouterError::BadRequest("Invalid request line".to_string()))?;
    let target = parts
        .next()
        .ok_or_else(|| RouterError::BadRequest("Invalid request line".to_string()))?;
    Ok(RequestContext::from_uri(method, target))
}
