//! Outbound response and the tagged handler reply.

use axum::http::StatusCode;

pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Full response: status, ordered headers, text body. Defaults to 200 with
/// an HTML content type.
#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: StatusCode::OK,
            headers: vec![("content-type".into(), DEFAULT_CONTENT_TYPE.into())],
            body: String::new(),
        }
    }
}

impl Response {
    pub fn html(body: impl Into<String>) -> Self {
        Response {
            body: body.into(),
            ..Response::default()
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Response {
            status,
            headers: vec![("content-type".into(), "text/plain; charset=utf-8".into())],
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// What a handler returns: either a plain body that the dispatcher wraps
/// with default status and headers, or a full response used verbatim.
#[derive(Clone, Debug)]
pub enum Reply {
    Text(String),
    Full(Response),
}

impl From<String> for Reply {
    fn from(body: String) -> Self {
        Reply::Text(body)
    }
}

impl From<&str> for Reply {
    fn from(body: &str) -> Self {
        Reply::Text(body.to_string())
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Full(response)
    }
}

impl Reply {
    /// Resolve the tag: plain text becomes a default 200/HTML response.
    pub fn into_response(self) -> Response {
        match self {
            Reply::Text(body) => Response::html(body),
            Reply::Full(response) => response,
        }
    }
}
