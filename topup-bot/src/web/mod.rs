//! Web server module.
//!
//! This module provides the HTTP surface of the bot:
//! - Receives LINE webhooks, verifies signatures and dispatches events
//! - Reports liveness for the platform health probe
//! - Serves the landing, payment-return and API documentation pages

pub mod docs;
pub mod error;
pub mod handlers;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, WebhookError};
pub use handlers::{
    callback, health, index, payment_callback, payment_return, test_config, webhook_test,
    AppState, HealthResponse, SERVICE_NAME,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/callback", post(callback))
        .route("/webhook/test", get(webhook_test))
        .route("/test-config", get(test_config))
        .route("/payment/callback", post(payment_callback))
        .route("/payment/return", get(payment_return))
        .route("/docs", get(docs::swagger_ui))
        .route("/redoc", get(docs::redoc))
        .route("/openapi.json", get(docs::openapi_json))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
