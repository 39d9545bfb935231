//! Request dispatch: first-match-wins over the route table, with an error
//! boundary around handler execution.

use crate::request::{PathParams, Request};
use crate::response::Response;
use crate::router::RouteTable;
use axum::http::StatusCode;
use std::collections::HashMap;

pub struct Dispatcher {
    routes: RouteTable,
}

impl Dispatcher {
    pub fn new(routes: RouteTable) -> Self {
        Dispatcher { routes }
    }

    /// Handle one request start-to-finish on the calling task.
    ///
    /// Entries are scanned in registration order; the first whose pattern
    /// matches the whole path and whose method set allows the request method
    /// wins. No best-match heuristics. A handler failure is logged and
    /// converted to a plain-text error response here; the serving loop never
    /// sees it.
    pub async fn dispatch(&self, request: Request) -> Response {
        for entry in self.routes.entries() {
            let Some(caps) = entry.pattern.captures(request.path()) else {
                continue;
            };
            if !entry.allows(request.method()) {
                continue;
            }
            let mut values = HashMap::new();
            for name in entry.pattern.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    values.insert(name.to_string(), m.as_str().to_string());
                }
            }
            let params = PathParams::from_map(values);
            tracing::debug!(
                template = %entry.template(),
                method = %request.method(),
                path = %request.path(),
                "dispatch"
            );
            return match (entry.handler)(request, params).await {
                Ok(reply) => reply.into_response(),
                Err(e) => {
                    tracing::error!(template = %entry.template(), error = %e, "handler failed");
                    let status = e.status_code();
                    Response::text(status, status.canonical_reason().unwrap_or("Internal Server Error"))
                }
            };
        }
        Response::text(StatusCode::NOT_FOUND, "Not Found")
    }
}
