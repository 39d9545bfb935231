//! Inbound request as seen by handlers: constructed once at the transport
//! boundary, read-only afterwards.

use crate::error::AppError;
use axum::http::{HeaderMap, Method};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, query: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: query.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string, without the leading `?`. Empty when absent.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Raw transport headers; opaque to the framework itself.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Placeholder values captured from the matched path, by name.
#[derive(Clone, Debug, Default)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    pub(crate) fn from_map(values: HashMap<String, String>) -> Self {
        PathParams { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Like `get`, but a missing name is a handler bug and fails the request.
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.get(name)
            .ok_or_else(|| AppError::Handler(format!("missing path parameter '{}'", name)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
