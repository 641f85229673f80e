use crate::error::RouterError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl Response {
    pub fn new(status: u16) -> Response {
        Response {
            status,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    pub fn body<T: AsRef<str>>(&mut self, body: T) -> &mut Self {
        self.body = body.as_ref().to_string();
        self
    }

    pub fn header<K: AsRef<str>, V: AsRef<str>>(&mut self, name: K, value: V) -> &mut Self {
        self.headers
            .insert(name.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    pub fn text<T: AsRef<str>>(body: T) -> Response {
        let mut response = Response::new(200);
        response
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body);
        response
    }

    pub fn json<T: Serialize>(value: &T) -> Result<Response, RouterError> {
        let body = serde_json::to_string(value)
            .map_err(|e| RouterError::InternalError(format!("JSON serialization error: {}", e)))?;
        let mut response = Response::new(200);
        response.header("Content-Type", "application/json").body(body);
        Ok(response)
    }

    /// The minimal response for an unmatched route: status 404, body `404`.
    pub fn not_found() -> Response {
        let mut response = Response::new(404);
        response
            .header("Content-Type", "text/plain; charset=utf-8")
            .body("404");
        response
    }

    pub fn from_error(err: &RouterError) -> Response {
        if err.is_not_found() {
            return Response::not_found();
        }
        let mut response = Response::new(err.status_code());
        response
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(err.to_string());
        response
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        }
    }

    /// Serialises the response as an HTTP/1.1 message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason());
        head += &format!("Date: {}\r\n", httpdate::fmt_http_date(SystemTime::now()));
        for (name, value) in &self.headers {
            head += &format!("{}: {}\r\n", name, value);
        }
        head += &format!("Content-Length: {}\r\n\r\n", self.body.len());
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}
