#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use survey_backend::app::{build_router, AppState};
use survey_backend::auth::AccessControl;
use survey_backend::config::AccessTokens;
use survey_backend::store::memory::InMemoryStore;
use tower::ServiceExt;

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const USER_TOKEN: &str = "user-secret";

pub fn test_app() -> Router {
    let access = AccessControl::new(&AccessTokens {
        admin: vec![("admin".to_string(), ADMIN_TOKEN.to_string())],
        user: vec![("viewer".to_string(), USER_TOKEN.to_string())],
    });
    build_router(AppState::new(Arc::new(InMemoryStore::new()), access))
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub fn admin_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::empty())
        .expect("request")
}

pub fn vote_request(option_id: i64) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/vote/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "id": option_id }).to_string()))
        .expect("request")
}

pub async fn create_survey(app: &Router, name: &str, description: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/survey/",
            serde_json::json!({ "name": name, "description": description }),
        ))
        .await
        .expect("create survey");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"].as_i64().expect("survey id")
}

pub async fn create_option(app: &Router, survey_id: i64, description: &str, position: i32) -> i64 {
    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/option/",
            serde_json::json!({
                "survey": survey_id,
                "description": description,
                "position": position
            }),
        ))
        .await
        .expect("create option");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["id"].as_i64().expect("option id")
}

pub async fn get_option(app: &Router, option_id: i64) -> axum::response::Response {
    app.clone()
        .oneshot(admin_request("GET", &format!("/option/{option_id}")))
        .await
        .expect("get option")
}
