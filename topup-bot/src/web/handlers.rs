//! HTTP endpoint handlers.
//!
//! The webhook handler verifies the signature over the raw body before
//! anything is parsed, then hands the events to the shared dispatcher.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::{ErrorResponse, WebhookError};
use super::pages;
use crate::bot::Dispatcher;
use crate::line::{verify_signature, WebhookPayload, SIGNATURE_HEADER};
use crate::Config;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "game-automation-linebot";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Current liveness report. Never calls out to LINE.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            line_bot_connected: self.config.line_credentials_present(),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub line_bot_connected: bool,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.health())
}

// =============================================================================
// LINE Webhook
// =============================================================================

/// LINE webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the `X-Line-Signature` HMAC over the raw body
/// 2. Decodes the event list
/// 3. Dispatches every event, isolating handler failures
/// 4. Returns 200 with an empty body unless every attempted event failed
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let Some(signature) = signature else {
        warn!(body_length = body.len(), "line_signature_header_missing");
        return Err(WebhookError::MissingSignature);
    };

    if body.is_empty() {
        warn!("line_webhook_empty_body");
        return Err(WebhookError::EmptyBody);
    }

    info!(body_length = body.len(), "line_webhook_received");

    if !verify_signature(&state.config.channel_secret, &body, signature) {
        warn!(body_length = body.len(), "line_signature_invalid");
        return Err(WebhookError::InvalidSignature);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "line_webhook_malformed");
        WebhookError::MalformedBody(e)
    })?;

    info!(
        destination = ?payload.destination,
        event_count = payload.events.len(),
        "line_webhook_verified"
    );

    let outcome = state.dispatcher.dispatch(payload.events).await;

    if outcome.all_failed() {
        error!(failed = outcome.failed, "line_webhook_all_events_failed");
        return Err(WebhookError::AllEventsFailed {
            failed: outcome.failed,
        });
    }

    Ok(StatusCode::OK)
}

/// Webhook smoke-test response.
#[derive(Debug, Serialize)]
pub struct WebhookTestResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub webhook_url: &'static str,
    pub supported_events: Vec<&'static str>,
}

/// Lists the event types the bot handles. No side effects.
pub async fn webhook_test(State(state): State<AppState>) -> Json<WebhookTestResponse> {
    Json(WebhookTestResponse {
        status: "ok",
        message: "Webhook endpoint is working",
        webhook_url: "/callback",
        supported_events: state.dispatcher.supported_events(),
    })
}

/// Credential presence report.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub channel_access_token_exists: bool,
    pub channel_secret_exists: bool,
    pub channel_access_token_length: usize,
    pub channel_secret_length: usize,
}

/// Reports whether credentials were loaded without revealing them.
pub async fn test_config(State(state): State<AppState>) -> Json<ConfigReport> {
    let config = &state.config;
    Json(ConfigReport {
        channel_access_token_exists: !config.channel_access_token.is_empty(),
        channel_secret_exists: !config.channel_secret.is_empty(),
        channel_access_token_length: config.channel_access_token.len(),
        channel_secret_length: config.channel_secret.len(),
    })
}

// =============================================================================
// Payment Gateway
// =============================================================================

/// Payment callback acknowledgement.
#[derive(Debug, Serialize)]
pub struct PaymentAck {
    pub status: &'static str,
}

/// Payment gateway callback.
///
/// Reconciliation belongs to the payment service; this endpoint records the
/// notification and acknowledges it.
pub async fn payment_callback(headers: HeaderMap, body: Bytes) -> Json<PaymentAck> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    info!(
        content_type = %content_type,
        body_length = body.len(),
        "payment_callback_received"
    );
    debug!(body = %String::from_utf8_lossy(&body), "payment_callback_body");

    Json(PaymentAck { status: "success" })
}

/// Page shown after the payer returns from the gateway.
pub async fn payment_return() -> Html<&'static str> {
    Html(pages::PAYMENT_RETURN_HTML)
}

// =============================================================================
// Pages
// =============================================================================

/// Landing page.
pub async fn index() -> Html<&'static str> {
    Html(pages::INDEX_HTML)
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}
