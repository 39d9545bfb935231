//! Transport glue: an [`App`] collects the store handle and the route table,
//! then hands dispatch to axum as a catch-all service. All matching semantics
//! live in [`crate::dispatch`]; axum only carries bytes.

use crate::dispatch::Dispatcher;
use crate::error::AppError;
use crate::request::{PathParams, Request};
use crate::response::{Reply, Response};
use crate::router::RouteTable;
use crate::store::RecordStore;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// The framework surface application code talks to. Routes are registered
/// up front; `into_router`/`serve` consume the App, so the route table is
/// frozen before the first request arrives.
pub struct App {
    store: RecordStore,
    routes: RouteTable,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        App {
            store,
            routes: RouteTable::new(),
        }
    }

    /// Handle to the process-wide store, for binding models.
    pub fn store(&self) -> RecordStore {
        self.store.clone()
    }

    /// Register a handler for `template` and the given methods (empty means
    /// GET). Fails fast on an uncompilable template.
    pub fn route<F, Fut>(
        &mut self,
        template: &str,
        methods: &[Method],
        handler: F,
    ) -> Result<(), AppError>
    where
        F: Fn(Request, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, AppError>> + Send + 'static,
    {
        self.routes.register(template, methods, handler)
    }

    /// GET-only sugar for [`App::route`].
    pub fn get<F, Fut>(&mut self, template: &str, handler: F) -> Result<(), AppError>
    where
        F: Fn(Request, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, AppError>> + Send + 'static,
    {
        self.route(template, &[Method::GET], handler)
    }

    /// Freeze the route table and produce the axum router serving it.
    pub fn into_router(self) -> Router {
        let dispatcher = Arc::new(Dispatcher::new(self.routes));
        Router::new()
            .fallback(dispatch_any)
            .with_state(dispatcher)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind `addr` and serve until the process exits.
    pub async fn serve(self, addr: &str) -> Result<(), AppError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("listening on http://{}", listener.local_addr()?);
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

async fn dispatch_any(
    State(dispatcher): State<Arc<Dispatcher>>,
    req: axum::extract::Request,
) -> axum::response::Response {
    let (parts, _body) = req.into_parts();
    let request = Request::new(
        parts.method,
        parts.uri.path(),
        parts.uri.query().unwrap_or(""),
    )
    .with_headers(parts.headers);
    to_http(dispatcher.dispatch(request).await)
}

fn to_http(response: Response) -> axum::response::Response {
    let mut out = axum::http::Response::new(Body::from(response.body));
    *out.status_mut() = response.status;
    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                out.headers_mut().append(n, v);
            }
            _ => {
                tracing::error!(header = %name, "invalid response header");
                let mut failed = axum::http::Response::new(Body::from("Internal Server Error"));
                *failed.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                return failed;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_http_preserves_status_and_headers() {
        let resp = to_http(
            Response::html("<p>hi</p>").with_status(StatusCode::CREATED),
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn invalid_header_degrades_to_500() {
        let resp = to_http(Response::html("x").with_header("bad header", "v"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
