//! Demo application: a user list served by microframe.
//!
//! Run from repo root: `cargo run -p demo-app`
//! `GET /` lists users, `GET /add/<name>/<email>` inserts one, and
//! `POST /users?name=..&email=..` creates one with a 201 response.

use microframe::{
    App, AppError, Method, Model, ModelSchema, Record, RecordStore, Reply, Response, Settings,
    StatusCode,
};
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("microframe=info,demo_app=info")),
        )
        .init();

    let settings = Settings::from_env();
    let store = RecordStore::connect(&settings.database_url).await?;

    let user_schema = Arc::new(
        ModelSchema::builder("user")
            .field_tokens("id", ["INTEGER", "PRIMARY KEY", "AUTOINCREMENT"])
            .field("name", "TEXT")
            .field("email", "TEXT")
            .build()?,
    );
    let users = Model::bind(user_schema, store.clone());
    users.create_table().await?;
    tracing::info!(table = %users.schema().table(), "model table ready");

    let mut app = App::new(store);

    let index_users = users.clone();
    app.get("/", move |_req, _params| {
        let users = index_users.clone();
        async move {
            let items: String = users
                .all()
                .await?
                .iter()
                .map(|u| {
                    format!(
                        "<li>{} ({})</li>",
                        text_field(u, "name"),
                        text_field(u, "email")
                    )
                })
                .collect();
            Ok(Reply::from(format!("<h1>User List</h1><ul>{}</ul>", items)))
        }
    })?;

    let add_users = users.clone();
    app.get("/add/<name>/<email>", move |_req, params| {
        let users = add_users.clone();
        async move {
            let mut user = Record::new();
            user.set("name", json!(params.require("name")?));
            user.set("email", json!(params.require("email")?));
            users.save(&mut user).await?;
            Ok(Reply::from("<p>User added!</p><a href=\"/\">Back</a>"))
        }
    })?;

    let create_users = users.clone();
    app.route("/users", &[Method::POST], move |req, _params| {
        let users = create_users.clone();
        async move {
            let mut user = Record::new();
            for pair in req.query().split('&').filter(|kv| !kv.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| AppError::BadRequest(format!("malformed pair '{}'", pair)))?;
                user.set(key, json!(value));
            }
            users.save(&mut user).await?;
            let id = user.get("id").cloned().unwrap_or(Value::Null);
            Ok(Reply::from(
                Response::html(format!("Created user {}", id)).with_status(StatusCode::CREATED),
            ))
        }
    })?;

    app.serve(&settings.bind_addr).await?;
    Ok(())
}

fn text_field(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(v) if !v.is_null() => v.to_string(),
        _ => String::new(),
    }
}
