//! Game top-up LINE bot - webhook ingress and health facade.
//!
//! This library provides the pieces the `topup-bot` server wires together:
//! - `config`: immutable settings loaded once from the environment
//! - `line`: signature verification, event types and the reply client
//! - `bot`: the event-tag to handler registry and isolated dispatch
//! - `web`: the axum router and endpoint handlers
//!
//! ## Architecture
//!
//! ```text
//! LINE → POST /callback → verify signature → Dispatcher → EventHandler → LineClient
//! ```

pub mod bot;
pub mod config;
pub mod line;
pub mod logging;
pub mod web;

// Re-export commonly used types
pub use bot::{default_registry, DispatchOutcome, Dispatcher, HandlerRegistry};
pub use config::{Config, ConfigError};
pub use line::{LineClient, Messenger};
pub use web::{router, AppState};
