//! In-process fake arena for integration tests.
//!
//! Serves the three endpoints the viewer talks to on an ephemeral port:
//! `GET /ws` streams whatever frames the test pushes, `POST /add_bot`
//! records spawn requests, `GET /health` answers according to a switch.
//! Connection and disconnection counters let tests check the viewer's
//! connection lifecycle from the server side.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use arena_types::{AddBotRequest, Snapshot};
use arena_viewer::{Delivery, DeliveryStream, Endpoint, PageOrigin};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, broadcast};

/// How long a test waits for something to happen before failing.
pub const PATIENCE: Duration = Duration::from_secs(5);

/// Bot name the fake arena refuses, like a missing bot module.
pub const UNKNOWN_BOT: &str = "no_such_bot";

/// Frame that makes the server drop every connection instead of sending.
const HANG_UP: &str = "\u{0}hang-up";

/// Server-side state shared with the test.
pub struct ArenaState {
    frames: broadcast::Sender<String>,
    /// WebSocket connections accepted so far.
    pub connections: AtomicUsize,
    /// WebSocket connections that have ended.
    pub disconnects: AtomicUsize,
    /// Bot names accepted by `POST /add_bot`.
    pub spawned: Mutex<Vec<String>>,
    /// Whether `GET /health` answers 200.
    pub healthy: AtomicBool,
}

/// A running fake arena.
pub struct FakeArena {
    /// Bound address.
    pub addr: SocketAddr,
    /// Shared state.
    pub state: Arc<ArenaState>,
}

impl FakeArena {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let (frames, _) = broadcast::channel(64);
        let state = Arc::new(ArenaState {
            frames,
            connections: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            spawned: Mutex::new(Vec::new()),
            healthy: AtomicBool::new(true),
        });

        let router = Router::new()
            .route("/ws", get(ws_handler))
            .route("/add_bot", post(add_bot))
            .route("/health", get(health))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self { addr, state }
    }

    /// `http://` base address of this arena.
    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Endpoint pointing at this arena.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(Some(&self.base()), PageOrigin::default())
    }

    /// Push a raw text frame to every connected client.
    pub fn push_raw(&self, text: &str) {
        let _ = self.state.frames.send(text.to_owned());
    }

    /// Push a snapshot to every connected client.
    pub fn push(&self, snapshot: &Snapshot) {
        self.push_raw(&serde_json::to_string(snapshot).unwrap());
    }

    /// Drop every open WebSocket connection without a close handshake.
    pub fn hang_up(&self) {
        self.push_raw(HANG_UP);
    }

    /// Accepted connections so far.
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Ended connections so far.
    pub fn disconnects(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ArenaState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: Arc<ArenaState>) {
    let mut rx = state.frames.subscribe();
    state.connections.fetch_add(1, Ordering::SeqCst);

    loop {
        tokio::select! {
            frame = rx.recv() => {
                let Ok(text) = frame else { break };
                if text == HANG_UP {
                    break;
                }
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.disconnects.fetch_add(1, Ordering::SeqCst);
}

async fn add_bot(
    State(state): State<Arc<ArenaState>>,
    Json(request): Json<AddBotRequest>,
) -> impl IntoResponse {
    if request.bot == UNKNOWN_BOT {
        return (StatusCode::NOT_FOUND, "Bot not found").into_response();
    }
    state.spawned.lock().await.push(request.bot);
    Json(serde_json::json!({"status": "ok"})).into_response()
}

async fn health(State(state): State<Arc<ArenaState>>) -> impl IntoResponse {
    if state.healthy.load(Ordering::SeqCst) {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "down")
    }
}

/// Poll `check` until it holds or [`PATIENCE`] runs out.
pub async fn eventually(what: &str, check: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + PATIENCE;
    while !check() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Next delivery from the stream, failing the test on timeout.
pub async fn next_delivery(stream: &mut DeliveryStream) -> Delivery {
    tokio::time::timeout(PATIENCE, stream.recv())
        .await
        .expect("timed out waiting for a delivery")
        .expect("delivery stream closed")
}
