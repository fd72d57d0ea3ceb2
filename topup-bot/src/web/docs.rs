//! API documentation endpoints.
//!
//! `/openapi.json` describes the HTTP surface; `/docs` and `/redoc` render it
//! with Swagger UI and ReDoc.

use axum::{response::Html, Json};
use serde_json::{json, Value};

use super::pages;

/// OpenAPI 3 description of every public route.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "遊戲自動化儲值 Line Bot",
            "description": "Webhook ingress and health reporting for the game top-up LINE bot.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Landing page",
                    "responses": {"200": {"description": "HTML page", "content": {"text/html": {}}}}
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness and readiness",
                    "responses": {
                        "200": {
                            "description": "Service is running",
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Health"}}}
                        }
                    }
                }
            },
            "/callback": {
                "post": {
                    "summary": "LINE Messaging API webhook",
                    "parameters": [{
                        "name": "X-Line-Signature",
                        "in": "header",
                        "required": true,
                        "schema": {"type": "string"},
                        "description": "Base64 HMAC-SHA256 of the raw body keyed by the channel secret"
                    }],
                    "requestBody": {"required": true, "content": {"application/json": {}}},
                    "responses": {
                        "200": {"description": "Events accepted"},
                        "400": {"description": "Missing or invalid signature, or malformed body", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}},
                        "500": {"description": "No event could be processed", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Error"}}}}
                    }
                }
            },
            "/webhook/test": {
                "get": {
                    "summary": "Webhook smoke test listing supported event types",
                    "responses": {"200": {"description": "Supported events", "content": {"application/json": {}}}}
                }
            },
            "/test-config": {
                "get": {
                    "summary": "Credential presence report",
                    "responses": {"200": {"description": "Presence and length of each credential", "content": {"application/json": {}}}}
                }
            },
            "/payment/callback": {
                "post": {
                    "summary": "Payment gateway callback",
                    "responses": {"200": {"description": "Callback acknowledged", "content": {"application/json": {}}}}
                }
            },
            "/payment/return": {
                "get": {
                    "summary": "Payment completion page",
                    "responses": {"200": {"description": "HTML page", "content": {"text/html": {}}}}
                }
            }
        },
        "components": {
            "schemas": {
                "Health": {
                    "type": "object",
                    "required": ["status", "service", "version", "line_bot_connected"],
                    "properties": {
                        "status": {"type": "string", "example": "healthy"},
                        "service": {"type": "string"},
                        "version": {"type": "string"},
                        "line_bot_connected": {"type": "boolean"}
                    }
                },
                "Error": {
                    "type": "object",
                    "required": ["message"],
                    "properties": {"message": {"type": "string"}}
                }
            }
        }
    })
}

pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(pages::SWAGGER_UI_HTML)
}

pub async fn redoc() -> Html<&'static str> {
    Html(pages::REDOC_HTML)
}
