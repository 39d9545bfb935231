//! Typed errors and their HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// A model declaration is malformed. Raised while the schema is built,
/// before any statement runs, so a bad model fails at startup.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("field '{field}': declaration must be a type string or a sequence of clause tokens")]
    BadDeclaration { field: String },
    #[error("invalid identifier '{0}': must match [a-z_][a-z0-9_]*")]
    InvalidIdentifier(String),
    #[error("'{0}' is a reserved word and cannot name a table or field")]
    ReservedWord(String),
    #[error("duplicate field '{0}'")]
    DuplicateField(String),
    #[error("model '{0}' declares no fields")]
    NoFields(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("route '{template}': {reason}")]
    RouteCompile { template: String, reason: String },
    #[error("store: {0}")]
    Store(#[from] sqlx::Error),
    #[error("handler: {0}")]
    Handler(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Status used when a failure crosses the dispatcher's error boundary.
    /// Everything maps to 500 except failures the client caused.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
