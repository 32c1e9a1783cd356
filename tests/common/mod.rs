#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use link_signer::{AppState, config::Config, router::create_router};
use serde_json::Value;
use tower::ServiceExt;

pub const LINK_SECRET: &str = "integration-link-secret";
pub const URL_SECRET: &str = "integration-url-secret";

pub fn config_with(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("LINK_TOKEN_SECRET".to_string(), LINK_SECRET.to_string()),
        ("URL_SIGNING_SECRET".to_string(), URL_SECRET.to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|name| vars.get(name).cloned()).expect("valid test config")
}

pub fn app() -> Router {
    app_with(&[])
}

pub fn app_with(extra: &[(&str, &str)]) -> Router {
    create_router(AppState::new(config_with(extra)))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");
    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, host: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(host) = host {
        builder = builder.header(header::HOST, host);
    }
    send(app, builder.body(Body::empty()).expect("build request")).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
