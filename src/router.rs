use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{AppState, routes};

// 令牌路由
fn secure_routes() -> Router<AppState> {
    Router::new()
        .route("/secure/generate", post(routes::secure::generate))
        .route("/secure/verify", post(routes::secure::verify))
}

// 签名 URL 路由
fn signed_url_routes() -> Router<AppState> {
    Router::new()
        .route("/signed-url/generate", get(routes::signed_url::generate_url))
        .route("/content/{*path}", get(routes::signed_url::content))
}

/// All routes under the configured base URI, with state attached.
///
/// Links are opened from email clients and the SPA on another origin, so
/// CORS allows any origin.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(secure_routes())
        .merge(signed_url_routes());

    let base = state.config.api_base_uri.clone();
    let routes = if base.is_empty() {
        routes
    } else {
        Router::new().nest(&base, routes)
    };

    routes.layer(CorsLayer::permissive()).with_state(state)
}
