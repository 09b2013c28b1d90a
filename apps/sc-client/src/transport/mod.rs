//! # Transport Layer
//!
//! The seam between the facade and the wire.
//!
//! A `Transport` sends one request and resolves with the matching response.
//! Server-pushed events never come back through `send_request`: the
//! transport hands them to the `EventRouter` it was built with.
//!
//! ```text
//! ScClient ──send_request──▶ Transport ──▶ server
//!    ▲                          │
//!    └──── EventRouter ◀──event─┘
//! ```

mod ws;

use async_trait::async_trait;
use sc_core::{Action, EventNotification, Response, ScError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::mpsc;

pub use ws::WsTransport;

/// Runs on the response before the caller sees it, in delivery order.
///
/// Lets the facade register subscriptions before any event for them can
/// be dispatched.
pub type ResponseHook = Box<dyn FnOnce(&Response) + Send>;

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// One request, one response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` under `action` and wait for the response.
    ///
    /// `hook` runs on the response before any later inbound message is
    /// processed.
    async fn send_request_with_hook(
        &self,
        action: Action,
        payload: Value,
        hook: Option<ResponseHook>,
    ) -> Result<Response, ScError>;

    async fn send_request(&self, action: Action, payload: Value) -> Result<Response, ScError> {
        self.send_request_with_hook(action, payload, None).await
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Subscription id -> subscriber.
#[derive(Debug, Default)]
pub struct EventRouter {
    subscribers: Mutex<BTreeMap<u64, mpsc::UnboundedSender<EventNotification>>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` and return the stream of its notifications.
    ///
    /// A second registration under the same id replaces the first.
    pub fn register(&self, id: u64) -> mpsc::UnboundedReceiver<EventNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.insert(id, tx);
        }
        rx
    }

    pub fn unregister(&self, id: u64) -> bool {
        self.subscribers
            .lock()
            .map(|mut s| s.remove(&id).is_some())
            .unwrap_or(false)
    }

    pub fn is_registered(&self, id: u64) -> bool {
        self.subscribers
            .lock()
            .map(|s| s.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an `event: true` message to its subscriber.
    ///
    /// Fails with `Consistency` when no subscriber is registered under the
    /// message id and with `Protocol` when the payload is malformed.
    pub fn dispatch(&self, message: &Response) -> Result<(), ScError> {
        let notification = EventNotification::decode(message.id, &message.payload)?;
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| ScError::Consistency("subscription registry poisoned".to_string()))?;

        let Some(subscriber) = subscribers.get(&message.id) else {
            return Err(ScError::Consistency(format!(
                "event for unknown subscription {}",
                message.id
            )));
        };
        if subscriber.send(notification).is_err() {
            // Receiver dropped: nobody listens anymore.
            subscribers.remove(&message.id);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
