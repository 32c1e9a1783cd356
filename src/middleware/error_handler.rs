use axum::{
    body::{Body, to_bytes},
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;

/// Largest error body buffered for logging; larger bodies are passed on unread.
const BUFFERED_BODY_LIMIT: usize = 64 * 1024;
/// Largest part of a buffered body copied into the log.
const LOGGED_BODY_LIMIT: usize = 1024;

/// Log the method, path, status and body of every 5xx response.
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let oversized = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|len| *len > BUFFERED_BODY_LIMIT);
    if let Some(len) = oversized {
        error!(
            "Server error on {} {} - Status: {}, Body: <{} bytes>",
            method,
            path,
            response.status(),
            len
        );
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, BUFFERED_BODY_LIMIT).await {
        Ok(b) => b,
        Err(e) => {
            error!(
                "Server error on {} {} - Status: {}, body unreadable: {}",
                method, path, parts.status, e
            );
            parts.headers.remove(header::CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let logged = &bytes[..bytes.len().min(LOGGED_BODY_LIMIT)];
    error!(
        "Server error on {} {} - Status: {}, Body: {}",
        method,
        path,
        parts.status,
        String::from_utf8_lossy(logged)
    );

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
