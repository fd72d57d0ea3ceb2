//! LINE Messaging API integration.
//!
//! This module provides:
//! - Webhook signature verification
//! - Typed webhook events and their dispatch tags
//! - Outbound reply messages and the HTTP client that sends them

pub mod client;
pub mod events;
pub mod messages;
pub mod signature;

pub use client::{LineClient, MessagingError, Messenger};
pub use events::{Event, EventKind, EventTag, MessageContent, Source, WebhookPayload};
pub use messages::OutboundMessage;
pub use signature::{sign, verify_signature, SIGNATURE_HEADER};
