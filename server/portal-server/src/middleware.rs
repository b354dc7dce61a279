use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Create CORS layer for the application
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Log method, path, status, and elapsed time for every request.
pub async fn request_timing_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        path = %path,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
