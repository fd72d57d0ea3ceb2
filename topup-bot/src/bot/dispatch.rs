//! Per-request event dispatch with failure isolation.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info};

use super::HandlerRegistry;
use crate::line::{Event, Messenger};

/// What happened to the events of one webhook request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Events whose handler completed successfully
    pub handled: usize,
    /// Events that failed to decode or whose handler returned an error
    pub failed: usize,
    /// Events with an unsupported type or no registered handler
    pub ignored: usize,
}

impl DispatchOutcome {
    /// True when something failed and nothing succeeded.
    pub fn all_failed(&self) -> bool {
        self.failed > 0 && self.handled == 0
    }
}

enum EventResult {
    Handled,
    Failed,
    Ignored,
}

/// Routes decoded events to their registered handlers.
///
/// The dispatcher is immutable after construction and shared by every
/// request.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    messenger: Arc<dyn Messenger>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            registry: Arc::new(registry),
            messenger,
        }
    }

    /// Names of the event types that have a handler.
    pub fn supported_events(&self) -> Vec<&'static str> {
        self.registry.tags().map(|tag| tag.name()).collect()
    }

    /// Dispatch every event concurrently.
    ///
    /// Each event runs in its own task, so an error or a panic in one handler
    /// never stops the others from running.
    pub async fn dispatch(&self, events: Vec<Value>) -> DispatchOutcome {
        let tasks = events.into_iter().enumerate().map(|(index, raw)| {
            let registry = Arc::clone(&self.registry);
            let messenger = Arc::clone(&self.messenger);
            tokio::spawn(dispatch_one(registry, messenger, index, raw))
        });
        let results = join_all(tasks).await;

        let mut outcome = DispatchOutcome::default();
        for (index, result) in results.into_iter().enumerate() {
            let result = result.unwrap_or_else(|e| {
                error!(index = index, panicked = e.is_panic(), error = %e, "event_task_failed");
                EventResult::Failed
            });
            match result {
                EventResult::Handled => outcome.handled += 1,
                EventResult::Failed => outcome.failed += 1,
                EventResult::Ignored => outcome.ignored += 1,
            }
        }

        info!(
            handled = outcome.handled,
            failed = outcome.failed,
            ignored = outcome.ignored,
            "events_dispatched"
        );

        outcome
    }
}

async fn dispatch_one(
    registry: Arc<HandlerRegistry>,
    messenger: Arc<dyn Messenger>,
    index: usize,
    raw: Value,
) -> EventResult {
    let event = match Event::from_value(raw) {
        Ok(event) => event,
        Err(e) => {
            error!(index = index, error = %e, "event_decode_failed");
            return EventResult::Failed;
        }
    };

    let Some(tag) = event.tag() else {
        debug!(index = index, kind = ?event.kind, "event_type_unsupported");
        return EventResult::Ignored;
    };

    let Some(handler) = registry.get(tag) else {
        info!(index = index, event_type = %tag, "event_unhandled");
        return EventResult::Ignored;
    };

    match handler.handle(&event, messenger.as_ref()).await {
        Ok(()) => {
            debug!(index = index, event_type = %tag, "event_handled");
            EventResult::Handled
        }
        Err(e) => {
            let retryable = match &e {
                super::HandlerError::Messaging(m) => m.is_retryable(),
                _ => false,
            };
            error!(
                index = index,
                event_type = %tag,
                webhook_event_id = ?event.webhook_event_id,
                retryable = retryable,
                error = %e,
                "event_handler_failed"
            );
            EventResult::Failed
        }
    }
}
