//! Ordered route table: compiled path patterns, allowed methods, handlers.

pub mod pattern;

use crate::error::AppError;
use crate::request::{PathParams, Request};
use crate::response::Reply;
use axum::http::Method;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply, AppError>> + Send>>;

/// Type-erased async handler: called with the request and the placeholder
/// values captured from the matched path.
pub type Handler = Arc<dyn Fn(Request, PathParams) -> HandlerFuture + Send + Sync>;

/// One registered route. Immutable after registration.
pub struct RouteEntry {
    pub(crate) pattern: Regex,
    pub(crate) methods: Vec<Method>,
    pub(crate) handler: Handler,
    pub(crate) template: String,
}

impl RouteEntry {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

/// Routes in registration order; never reordered or removed, so registration
/// order is match-priority order.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable::default()
    }

    /// Compile `template` and append an entry. An empty method list defaults
    /// to GET. Compile failures are fatal at registration, not at dispatch.
    pub fn register<F, Fut>(
        &mut self,
        template: &str,
        methods: &[Method],
        handler: F,
    ) -> Result<(), AppError>
    where
        F: Fn(Request, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, AppError>> + Send + 'static,
    {
        let pattern = pattern::compile(template)?;
        let methods = if methods.is_empty() {
            vec![Method::GET]
        } else {
            methods.to_vec()
        };
        tracing::debug!(template = %template, methods = ?methods, "route registered");
        self.entries.push(RouteEntry {
            pattern,
            methods,
            handler: Arc::new(move |req, params| Box::pin(handler(req, params))),
            template: template.to_string(),
        });
        Ok(())
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
