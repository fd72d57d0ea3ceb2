//! Bot event handling.
//!
//! Handlers are registered against an [`EventTag`] in a [`HandlerRegistry`]
//! built once at startup. The [`Dispatcher`] decodes each incoming event,
//! looks up its handler and runs it in isolation from its siblings.
//!
//! ```text
//! raw events → Event::from_value() → registry[tag] → EventHandler::handle()
//! ```

pub mod dispatch;
pub mod handlers;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::line::{Event, EventTag, MessagingError, Messenger};

pub use dispatch::{DispatchOutcome, Dispatcher};
pub use handlers::default_registry;

/// Failure of a single event handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("event has no reply token")]
    MissingReplyToken,

    #[error("handler for {expected} received a different event")]
    UnexpectedEvent { expected: EventTag },

    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

/// Behaviour attached to one event tag.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event, messenger: &dyn Messenger) -> Result<(), HandlerError>;
}

/// Explicit mapping from event tag to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<EventTag, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `tag`, replacing any previous registration.
    pub fn register<H>(mut self, tag: EventTag, handler: H) -> Self
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(tag, Arc::new(handler));
        self
    }

    pub fn get(&self, tag: EventTag) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(&tag)
    }

    /// Registered tags in a stable order.
    pub fn tags(&self) -> impl Iterator<Item = EventTag> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
