//! ImagePortal Server - diagnostic imaging scheduling API
//!
//! This library provides the core functionality of the ImagePortal HTTP
//! server: slot discovery, booking holds, referral management, appointment
//! scheduling, and radiology report endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use error::*;
pub use server::{PortalServer, ServerConfig};

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: PortalServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
