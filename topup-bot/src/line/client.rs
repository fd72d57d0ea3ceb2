//! LINE Messaging API client.
//!
//! Handlers talk to LINE through the [`Messenger`] trait so they can be
//! exercised without network access. [`LineClient`] is the production
//! implementation backed by a shared `reqwest` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::messages::{OutboundMessage, ReplyRequest};
use crate::Config;

/// Errors from outbound Messaging API calls.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// LINE could not be reached or asked us to back off.
    #[error("LINE API unavailable: {reason}")]
    Unavailable {
        status: Option<u16>,
        reason: String,
    },

    /// LINE refused the request; retrying will not help.
    #[error("LINE API rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid LINE API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MessagingError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MessagingError::Unavailable { .. })
    }
}

/// Outbound side of the messaging platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Reply to an event using its one-time reply token.
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError>;
}

/// Reply client for the LINE Messaging API.
#[derive(Clone)]
pub struct LineClient {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl LineClient {
    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.line_api_base_url.clone(),
            config.channel_access_token.clone(),
            config.api_timeout,
        )
    }

    /// `base_url` may carry a path prefix (e.g. a proxy mount); API paths are
    /// resolved beneath it.
    pub fn new(base_url: Url, access_token: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            access_token,
        })
    }

    fn reply_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join("v2/bot/message/reply")
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), MessagingError> {
        let url = self.reply_url()?;
        let request = ReplyRequest {
            reply_token,
            messages,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "line_reply_transport_error");
                MessagingError::Unavailable {
                    status: None,
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if status.is_success() {
            info!(message_count = messages.len(), "line_reply_sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "line_reply_failed");

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(MessagingError::Unavailable {
                status: Some(status.as_u16()),
                reason: body,
            })
        } else {
            Err(MessagingError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let unavailable = MessagingError::Unavailable {
            status: Some(503),
            reason: "maintenance".to_string(),
        };
        let rejected = MessagingError::Rejected {
            status: 400,
            body: "Invalid reply token".to_string(),
        };

        assert!(unavailable.is_retryable());
        assert!(!rejected.is_retryable());
    }

    #[test]
    fn test_client_creation() {
        let client = LineClient::new(
            Url::parse("https://api.line.me").unwrap(),
            "token".to_string(),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_reply_url_keeps_base_path() {
        let reply_url = |base: &str| {
            LineClient::new(
                Url::parse(base).unwrap(),
                "token".to_string(),
                Duration::from_secs(5),
            )
            .unwrap()
            .reply_url()
            .unwrap()
            .to_string()
        };

        assert_eq!(
            reply_url("https://api.line.me"),
            "https://api.line.me/v2/bot/message/reply"
        );
        assert_eq!(
            reply_url("https://proxy.example/line-proxy"),
            "https://proxy.example/line-proxy/v2/bot/message/reply"
        );
        assert_eq!(
            reply_url("https://proxy.example/line-proxy/"),
            "https://proxy.example/line-proxy/v2/bot/message/reply"
        );
    }
}
