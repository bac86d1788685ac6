use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::error::ErrorServer;

pub const NGROK_SKIP_BROWSER_WARNING: HeaderName =
    HeaderName::from_static("ngrok-skip-browser-warning");

/// Stamp every response so ngrok tunnels skip their browser interstitial.
pub async fn ngrok_bypass(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert(NGROK_SKIP_BROWSER_WARNING, HeaderValue::from_static("true"));

    response
}

pub async fn method_not_allowed() -> ErrorServer {
    ErrorServer::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
