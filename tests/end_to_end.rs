//! Full-boundary tests: requests enter through the axum router, flow through
//! the dispatcher and handlers, and touch the store.

use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use http_body_util::BodyExt;
use microframe::{
    App, AppError, Method, Model, ModelSchema, Record, RecordStore, Reply, Response,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

async fn demo_app() -> (axum::Router, Model) {
    let store = RecordStore::connect("sqlite::memory:").await.unwrap();
    let schema = Arc::new(
        ModelSchema::builder("user")
            .field_tokens("id", ["INTEGER", "PRIMARY KEY", "AUTOINCREMENT"])
            .field("name", "TEXT")
            .field("email", "TEXT")
            .build()
            .unwrap(),
    );
    let users = Model::bind(schema, store.clone());
    users.create_table().await.unwrap();

    let mut app = App::new(store);

    let index_users = users.clone();
    app.get("/", move |_req, _params| {
        let users = index_users.clone();
        async move {
            let count = users.all().await?.len();
            Ok(Reply::from(format!("{} users", count)))
        }
    })
    .unwrap();

    let add_users = users.clone();
    app.get("/add/<name>/<email>", move |_req, params| {
        let users = add_users.clone();
        async move {
            let mut user = Record::new();
            user.set("name", json!(params.require("name")?));
            user.set("email", json!(params.require("email")?));
            users.save(&mut user).await?;
            Ok(Reply::from("User added!"))
        }
    })
    .unwrap();

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
            Ok(Reply::from(
                Response::html(format!(
                    "Created user {}",
                    user.get("id").cloned().unwrap_or(serde_json::Value::Null)
                ))
                .with_status(StatusCode::CREATED),
            ))
        }
    })
    .unwrap();

    (app.into_router(), users)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn add_route_binds_segments_and_persists() {
    let (router, users) = demo_app().await;

    let response = router
        .clone()
        .oneshot(
            HttpRequest::builder()
                .uri("/add/Bob/bob@x.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "User added!");

    let saved = users.all().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].get("name"), Some(&json!("Bob")));
    assert_eq!(saved[0].get("email"), Some(&json!("bob@x.com")));

    let response = router
        .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "1 users");
}

#[tokio::test]
async fn post_route_reads_query_and_returns_created() {
    let (router, users) = demo_app().await;

    let response = router
        .oneshot(
            HttpRequest::builder()
                .method("POST")
                .uri("/users?name=Ada&email=ada@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(body_text(response).await, "Created user 1");

    let saved = users.all().await.unwrap();
    assert_eq!(saved[0].get("id"), Some(&json!(1)));
    assert_eq!(saved[0].get("name"), Some(&json!("Ada")));
}

#[tokio::test]
async fn unknown_paths_and_methods_get_404() {
    let (router, _users) = demo_app().await;

    let response = router
        .clone()
        .oneshot(
            HttpRequest::builder()
                .uri("/nowhere")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Not Found");

    // GET on the POST-only route scans past it and finds nothing
    let response = router
        .oneshot(
            HttpRequest::builder()
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
