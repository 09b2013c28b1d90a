//! Integration tests for the WebSocket transport.
//!
//! An in-process axum server plays the sc-memory side: it records what it
//! receives and answers from a fixed script.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use sc_client::{ClientConfig, EventRouter, ScClient, Transport, WsTransport};
use sc_core::{
    Action, KeynodeRequest, ScAddr, ScError, ScEventSubscriptionParams, ScEventType,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// TEST SERVER
// =============================================================================

#[derive(Clone, Default)]
struct ServerState {
    /// `(id, action)` of every request, in arrival order.
    seen: Arc<Mutex<Vec<(u64, String)>>>,
}

impl ServerState {
    fn seen(&self) -> Vec<(u64, String)> {
        self.seen.lock().unwrap().clone()
    }
}

fn ok(id: u64, payload: Value) -> Value {
    json!({"id": id, "status": true, "event": false, "payload": payload})
}

fn event(id: u64, payload: Value) -> Value {
    json!({"id": id, "status": true, "event": true, "payload": payload})
}

/// Messages sent back for one request.
fn replies(id: u64, action: &str, payload: &Value) -> Vec<Value> {
    match action {
        // An event nobody subscribed to arrives first.
        "connection_info" => vec![
            event(555, json!([1, 2, 3])),
            ok(id, json!({"connection_id": 9, "user_addr": 77})),
        ],
        "check_elements" => {
            let count = payload.as_array().map_or(0, Vec::len);
            vec![ok(id, json!(vec![1; count]))]
        }
        // The event follows the response immediately.
        "events" => match payload.get("create") {
            Some(create) => {
                let addr = create[0]["addr"].clone();
                vec![ok(id, json!([100])), event(100, json!([addr, 5, 6]))]
            }
            None => vec![ok(id, Value::Null)],
        },
        // Answer under an id nobody asked for.
        "keynodes" => vec![ok(id + 1000, json!([0]))],
        _ => vec![json!({"id": id, "status": false, "event": false, "payload": null, "errors": "unsupported"})],
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: ServerState) {
    while let Some(Ok(message)) = socket.recv().await {
        let WsMessage::Text(text) = message else {
            continue;
        };
        let request: Value = serde_json::from_str(text.as_str()).unwrap();
        let id = request["id"].as_u64().unwrap();
        let action = request["type"].as_str().unwrap().to_string();
        state.seen.lock().unwrap().push((id, action.clone()));

        for reply in replies(id, &action, &request["payload"]) {
            if socket
                .send(WsMessage::Text(reply.to_string().into()))
                .await
                .is_err()
            {
                return;
            }
        }
    }
}

/// Start the server and return its URL.
async fn start_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("ws://{addr}/ws"), state)
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test]
async fn test_requests_before_open_are_flushed_in_order() {
    let (url, state) = start_server().await;
    let transport = WsTransport::spawn(url, Arc::new(EventRouter::new()));
    assert!(!transport.is_open());

    let (a, b, c) = tokio::join!(
        transport.send_request(Action::CheckElements, json!([1])),
        transport.send_request(Action::CheckElements, json!([1, 2])),
        transport.send_request(Action::CheckElements, json!([1, 2, 3])),
    );

    assert_eq!(a.unwrap().payload, json!([1]));
    assert_eq!(b.unwrap().payload, json!([1, 1]));
    assert_eq!(c.unwrap().payload, json!([1, 1, 1]));
    let ids: Vec<u64> = state.seen().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(transport.pending_requests().await, 0);
}

#[tokio::test]
async fn test_unknown_subscription_event_is_dropped() {
    let (url, _) = start_server().await;
    let config = ClientConfig {
        url,
        ..ClientConfig::default()
    };
    let client = ScClient::connect(&config).await.unwrap();

    // The stray event is dropped and the connection stays usable.
    let info = client.connection_info().await.unwrap();
    assert_eq!(info.connection_id, 9);
    assert_eq!(info.user_addr, ScAddr::new(77));
    assert_eq!(client.check_elements(&[ScAddr::new(1)]).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_event_right_after_subscription_is_delivered() {
    let (url, state) = start_server().await;
    let router = Arc::new(EventRouter::new());
    let transport = WsTransport::connect(url, Arc::clone(&router), TIMEOUT)
        .await
        .unwrap();
    let client = ScClient::new(Arc::new(transport), router, 10);

    let params = ScEventSubscriptionParams::new(ScAddr::new(42), ScEventType::AfterGenerateEdge);
    let mut subscription = client
        .create_event_subscriptions(&[params])
        .await
        .unwrap()
        .pop()
        .unwrap();

    let n = tokio::time::timeout(TIMEOUT, subscription.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n.subscription_id, 100);
    assert_eq!(n.addr, ScAddr::new(42));
    assert_eq!(n.connector, ScAddr::new(5));

    client.destroy_event_subscriptions(&[100]).await.unwrap();
    assert!(!client.is_subscribed(100));
    assert_eq!(state.seen().len(), 2);
}

#[tokio::test]
async fn test_unmatched_response_closes_the_connection() {
    let (url, _) = start_server().await;
    let config = ClientConfig {
        url,
        ..ClientConfig::default()
    };
    let client = ScClient::connect(&config).await.unwrap();

    let result = client
        .resolve_keynodes(&[KeynodeRequest::find("anything")])
        .await;
    assert!(matches!(result, Err(ScError::ConnectionClosed)));

    let after = client.check_elements(&[ScAddr::new(1)]).await;
    assert!(matches!(after, Err(ScError::ConnectionClosed)));
}

#[tokio::test]
async fn test_unsupported_action_fails_with_server_error() {
    let (url, _) = start_server().await;
    let transport = WsTransport::connect(url, Arc::new(EventRouter::new()), TIMEOUT)
        .await
        .unwrap();

    let response = transport
        .send_request(Action::DeleteElements, json!([1]))
        .await
        .unwrap();
    assert!(!response.status);
    assert!(matches!(response.check_errors(), Err(ScError::Server(m)) if m == ["unsupported"]));
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WsTransport::connect(
        format!("ws://{addr}/ws"),
        Arc::new(EventRouter::new()),
        TIMEOUT,
    )
    .await;
    assert!(matches!(result, Err(ScError::Transport(_))));
}
