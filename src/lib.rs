//! Microframe: declarative route templates plus a minimal active-record
//! mapper over a single-writer SQLite store.

pub mod dispatch;
pub mod error;
pub mod model;
pub mod request;
pub mod response;
pub mod router;
pub mod schema;
pub mod server;
pub mod settings;
pub mod sql;
pub mod store;

pub use dispatch::Dispatcher;
pub use error::{AppError, SchemaError};
pub use model::{Model, Record};
pub use request::{PathParams, Request};
pub use response::{Reply, Response};
pub use router::RouteTable;
pub use schema::{ModelSchema, SchemaBuilder};
pub use server::App;
pub use settings::Settings;
pub use store::{ExecResult, RecordStore};

pub use axum::http::{Method, StatusCode};
