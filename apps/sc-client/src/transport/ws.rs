//! WebSocket transport over tokio-tungstenite.
//!
//! One background task owns the socket:
//! - a writer drains the outbound FIFO, so requests issued before the
//!   handshake completes are flushed once, in order
//! - the reader matches responses to pending requests by id and hands
//!   events to the `EventRouter`
//!
//! A response whose id matches no pending request stops the reader; every
//! pending request then fails with `ScError::ConnectionClosed`.

use super::{EventRouter, ResponseHook, Transport};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use sc_core::{Action, Request, Response, ScError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

// =============================================================================
// STATE
// =============================================================================

struct PendingRequest {
    action: Action,
    reply: oneshot::Sender<Response>,
    hook: Option<ResponseHook>,
}

#[derive(Default)]
struct Pending {
    requests: BTreeMap<u64, PendingRequest>,
    /// Set once the reader has stopped; no request is accepted afterwards.
    closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkState {
    Connecting,
    Open,
    Closed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// WebSocket connection to an sc-memory server.
pub struct WsTransport {
    url: String,
    outbound: mpsc::UnboundedSender<Message>,
    pending: Arc<Mutex<Pending>>,
    next_id: AtomicU64,
    state: watch::Receiver<LinkState>,
}

impl WsTransport {
    /// Start connecting to `url` in the background.
    ///
    /// Must be called inside a tokio runtime. Requests may be sent right
    /// away; they are queued until the connection is open.
    pub fn spawn(url: impl Into<String>, router: Arc<EventRouter>) -> Self {
        let url = url.into();
        let (outbound, queue) = mpsc::unbounded_channel();
        let pending = Arc::new(Mutex::new(Pending::default()));
        let (state_tx, state) = watch::channel(LinkState::Connecting);

        tokio::spawn(run_connection(
            url.clone(),
            queue,
            Arc::clone(&pending),
            router,
            state_tx,
        ));

        Self {
            url,
            outbound,
            pending,
            next_id: AtomicU64::new(1),
            state,
        }
    }

    /// Spawn and wait up to `timeout` for the handshake.
    pub async fn connect(
        url: impl Into<String>,
        router: Arc<EventRouter>,
        timeout: Duration,
    ) -> Result<Self, ScError> {
        let transport = Self::spawn(url, router);
        transport.wait_open(timeout).await?;
        Ok(transport)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        *self.state.borrow() == LinkState::Open
    }

    /// Wait until the connection is open, or report why it never opened.
    pub async fn wait_open(&self, timeout: Duration) -> Result<(), ScError> {
        let mut state = self.state.clone();
        let opened = async move {
            loop {
                let current = state.borrow_and_update().clone();
                match current {
                    LinkState::Open => return Ok(()),
                    LinkState::Closed(reason) => return Err(ScError::Transport(reason)),
                    LinkState::Connecting => {}
                }
                if state.changed().await.is_err() {
                    return Err(ScError::ConnectionClosed);
                }
            }
        };

        tokio::time::timeout(timeout, opened).await.map_err(|_| {
            ScError::Transport(format!(
                "timed out after {}ms connecting to {}",
                timeout.as_millis(),
                self.url
            ))
        })?
    }

    /// Number of requests still waiting for a response.
    pub async fn pending_requests(&self) -> usize {
        self.pending.lock().await.requests.len()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_request_with_hook(
        &self,
        action: Action,
        payload: Value,
        hook: Option<ResponseHook>,
    ) -> Result<Response, ScError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = serde_json::to_string(&Request::new(id, action, payload))?;
        let (reply, response) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            if pending.closed {
                return Err(ScError::ConnectionClosed);
            }
            if pending.requests.contains_key(&id) {
                return Err(ScError::Consistency(format!(
                    "request id {id} is already pending"
                )));
            }
            pending.requests.insert(
                id,
                PendingRequest {
                    action,
                    reply,
                    hook,
                },
            );
        }

        debug!(id, %action, "sending request");
        if self.outbound.send(Message::text(text)).is_err() {
            self.pending.lock().await.requests.remove(&id);
            return Err(ScError::ConnectionClosed);
        }

        response.await.map_err(|_| ScError::ConnectionClosed)
    }
}

// =============================================================================
// CONNECTION TASK
// =============================================================================

async fn run_connection(
    url: String,
    mut queue: mpsc::UnboundedReceiver<Message>,
    pending: Arc<Mutex<Pending>>,
    router: Arc<EventRouter>,
    state: watch::Sender<LinkState>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            warn!(%url, error = %e, "connection failed");
            close_pending(&pending).await;
            state.send_replace(LinkState::Closed(format!("cannot connect to {url}: {e}")));
            return;
        }
    };
    info!(%url, "connected");
    state.send_replace(LinkState::Open);

    let (mut sink, mut source) = stream.split();

    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            if let Err(e) = sink.send(message).await {
                warn!(error = %e, "write failed");
                break;
            }
        }
        // Transport dropped: say goodbye.
        if let Err(e) = sink.close().await {
            debug!(error = %e, "close failed");
        }
    });

    while let Some(message) = source.next().await {
        let flow = match message {
            Ok(Message::Text(text)) => handle_text(text.as_str(), &pending, &router).await,
            Ok(Message::Close(_)) => {
                debug!(%url, "server closed the connection");
                Flow::Stop
            }
            Ok(_) => Flow::Continue,
            Err(e) => {
                warn!(%url, error = %e, "read failed");
                Flow::Stop
            }
        };
        if flow == Flow::Stop {
            break;
        }
    }

    writer.abort();
    close_pending(&pending).await;
    state.send_replace(LinkState::Closed(format!("connection to {url} closed")));
    info!(%url, "disconnected");
}

async fn handle_text(text: &str, pending: &Mutex<Pending>, router: &EventRouter) -> Flow {
    let message: Response = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "dropping unreadable message");
            return Flow::Continue;
        }
    };

    if message.event {
        if let Err(e) = router.dispatch(&message) {
            warn!(subscription = message.id, error = %e, "dropping event");
        }
        return Flow::Continue;
    }

    let Some(request) = pending.lock().await.requests.remove(&message.id) else {
        error!(id = message.id, "response matches no pending request");
        return Flow::Stop;
    };

    debug!(
        id = message.id,
        action = %request.action,
        status = message.status,
        "response received"
    );
    if let Some(hook) = request.hook {
        hook(&message);
    }
    if request.reply.send(message).is_err() {
        debug!(action = %request.action, "caller stopped waiting");
    }
    Flow::Continue
}

/// Refuse new requests and fail every pending one.
async fn close_pending(pending: &Mutex<Pending>) {
    let mut pending = pending.lock().await;
    pending.closed = true;
    let dropped = std::mem::take(&mut pending.requests);
    if !dropped.is_empty() {
        warn!(count = dropped.len(), "failing pending requests");
    }
}
