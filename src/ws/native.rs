//! Native streaming connection — `tokio-tungstenite`.
//!
//! - Background tokio task owns the socket
//! - Plain-text subscription frames, each tagged locally with a generation
//! - Inbound frames parsed into [`Kind`]; malformed ones dropped and logged
//! - Bounded exponential backoff reconnection with jitter
//! - Last subscription replayed on reconnect
//! - Stream-based event delivery to consumer

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::shared::Symbol;
use crate::ws::{parse_frame, ConnectionState, SubscriptionSink, WsConfig, WsEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Jitter added on top of the exponential delay.
const MAX_JITTER_MS: u32 = 500;

/// Floor applied when the server closes with a policy violation (1008).
const RATE_LIMIT_DELAY_MS: u64 = 60_000;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Subscribe { symbol: Symbol, generation: u64 },
    Close,
}

// ─── Disconnect reasons for reconnection decision ────────────────────────────

enum DisconnectReason {
    UserRequested,
    NormalClose { code: u16, reason: String },
    RateLimited { code: u16, reason: String },
    Error { code: Option<u16>, reason: String },
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    config: WsConfig,
    event_tx: mpsc::Sender<WsEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    /// Last subscription requested by the consumer, replayed on reconnect.
    active: Option<(Symbol, u64)>,
    /// Generation of the last subscription frame written to the socket.
    written_generation: u64,
    reconnect_attempts: u32,
    connection_state: Arc<AtomicU8>,
}

impl TaskState {
    fn emit(&self, event: WsEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            tracing::debug!("Dropping WS event: {}", e);
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.connection_state.store(state as u8, Ordering::SeqCst);
    }

    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }

    fn handle_text(&self, text: &str) {
        match parse_frame(text) {
            Ok(Some(kind)) => self.emit(WsEvent::Message {
                generation: self.written_generation,
                kind,
            }),
            Ok(None) => {
                tracing::debug!("Ignoring WS frame with unknown event: {}", text);
            }
            Err(e) => {
                tracing::warn!("Dropping malformed WS frame: {} — raw: {}", e, text);
                self.emit(WsEvent::Error(e.to_string()));
            }
        }
    }

    /// Terminal transition: `Closed`, plus `MaxReconnectReached` when reconnects were in play.
    fn finish(&self) {
        self.set_state(ConnectionState::Closed);
        if self.config.reconnect {
            self.emit(WsEvent::MaxReconnectReached);
        }
    }
}

// ─── Public StreamConnection ─────────────────────────────────────────────────

/// One streaming connection to the market-data endpoint.
///
/// Uses a background tokio task for connection management.
/// The public API communicates with it via mpsc channels.
/// Dropping the connection aborts the task and releases the socket.
pub struct StreamConnection {
    config: WsConfig,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<WsEvent>>,
    task_handle: Option<JoinHandle<()>>,
    connection_state: Arc<AtomicU8>,
    next_generation: AtomicU64,
}

impl StreamConnection {
    /// Create a new connection. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        // Closed until `open()` swaps in a live channel.
        let (_, event_rx) = mpsc::channel(1);
        Self {
            config,
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            task_handle: None,
            connection_state: Arc::new(AtomicU8::new(ConnectionState::Closed as u8)),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    /// Start connecting to the configured endpoint.
    ///
    /// Moves the state to `Connecting` and spawns the background task; `Open`
    /// is reported later through [`WsEvent::Connected`]. Calling `open` on a
    /// live connection is a no-op.
    pub async fn open(&mut self) -> Result<(), WsError> {
        if self.cmd_tx.is_some() {
            return Ok(());
        }
        if !(self.config.url.starts_with("ws://") || self.config.url.starts_with("wss://")) {
            return Err(WsError::ConnectionFailed(format!(
                "Unsupported URL scheme: {}",
                self.config.url
            )));
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(self.config.event_buffer.max(1));
        *self.event_rx.get_mut() = event_rx;
        self.cmd_tx = Some(cmd_tx);
        self.connection_state
            .store(ConnectionState::Connecting as u8, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            event_tx,
            cmd_rx,
            active: None,
            written_generation: 0,
            reconnect_attempts: 0,
            connection_state: Arc::clone(&self.connection_state),
        };

        tracing::info!("Opening stream connection to {}", self.config.url);
        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Close the connection.
    ///
    /// Sends a normal close frame, waits for the task to finish, and leaves
    /// the state at `Closed`. Safe to call on a never-opened connection.
    pub async fn close(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Close).await;
        }

        if let Some(mut handle) = self.task_handle.take() {
            if tokio::time::timeout(Duration::from_secs(5), &mut handle)
                .await
                .is_err()
            {
                tracing::warn!("Stream task did not stop in time, aborting");
                handle.abort();
            }
        }

        self.connection_state
            .store(ConnectionState::Closed as u8, Ordering::SeqCst);
    }

    /// Queue a subscription frame for `symbol`.
    ///
    /// No acknowledgement is awaited. Returns the generation assigned to the
    /// frame; inbound messages received after it is written carry it.
    pub fn send(&self, symbol: &Symbol) -> Result<u64, WsError> {
        let tx = self.cmd_tx.as_ref().ok_or(WsError::NotConnected)?;
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        tx.try_send(Command::Subscribe {
            symbol: symbol.clone(),
            generation,
        })
        .map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                WsError::SendFailed("Command channel full".into())
            }
            mpsc::error::TrySendError::Closed(_) => WsError::NotConnected,
        })?;
        Ok(generation)
    }

    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState::from(self.connection_state.load(Ordering::SeqCst))
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state().is_open()
    }

    /// Wait for the next event. `None` once the connection task has ended
    /// and all its events are consumed, or before `open()`.
    pub async fn next_event(&self) -> Option<WsEvent> {
        self.event_rx.lock().await.recv().await
    }

    /// Get a stream of events from the connection.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `close()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = WsEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl SubscriptionSink for StreamConnection {
    fn connection_state(&self) -> ConnectionState {
        StreamConnection::connection_state(self)
    }

    fn send(&self, symbol: &Symbol) -> Result<u64, WsError> {
        StreamConnection::send(self, symbol)
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        // ── 1. Attempt connection (interruptible by close) ───────────────
        let connected = match connect_or_close(&mut state).await {
            Some(result) => result,
            None => {
                state.set_state(ConnectionState::Closed);
                return;
            }
        };

        let (mut sink, stream) = match connected {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("Stream connection failed: {}", e);
                state.emit(WsEvent::Error(format!("Connection failed: {}", e)));
                if !state.should_reconnect() {
                    state.finish();
                    return;
                }
                if !backoff_wait(&mut state, None).await {
                    return;
                }
                continue;
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        tracing::info!("Stream connected to {}", state.config.url);
        state.reconnect_attempts = 0;
        state.set_state(ConnectionState::Open);
        state.emit(WsEvent::Connected);

        // ── 3. Replay the last subscription ──────────────────────────────
        if let Some((symbol, generation)) = state.active.clone() {
            tracing::info!("Resubscribing to {}", symbol);
            write_subscription(&mut state, &mut sink, symbol, generation).await;
        }

        // ── 4. Inner select! loop ────────────────────────────────────────
        let reason = run_connected(&mut state, sink, stream).await;

        // ── 5. Post-disconnect decision ──────────────────────────────────
        let rate_limit_floor = match reason {
            DisconnectReason::UserRequested => {
                state.set_state(ConnectionState::Closed);
                return;
            }
            DisconnectReason::NormalClose { code, reason } => {
                state.set_state(ConnectionState::Closed);
                state.emit(WsEvent::Disconnected {
                    code: Some(code),
                    reason,
                });
                return;
            }
            DisconnectReason::RateLimited { code, reason } => {
                disconnected(&state, Some(code), reason);
                Some(RATE_LIMIT_DELAY_MS)
            }
            DisconnectReason::Error { code, reason } => {
                disconnected(&state, code, reason);
                None
            }
        };

        if !state.should_reconnect() {
            state.finish();
            return;
        }
        // Closed during the wait: a user close, not an exhausted budget.
        if !backoff_wait(&mut state, rate_limit_floor).await {
            return;
        }
    }
}

/// Record an unexpected drop: state first, then the event.
fn disconnected(state: &TaskState, code: Option<u16>, reason: String) {
    tracing::warn!("Stream disconnected: code={:?} reason={}", code, reason);
    if state.should_reconnect() {
        state.set_state(ConnectionState::Reconnecting);
    } else {
        state.set_state(ConnectionState::Closed);
    }
    state.emit(WsEvent::Disconnected { code, reason });
}

/// The inner connected loop — runs until the connection breaks.
async fn run_connected(
    state: &mut TaskState,
    mut sink: WsSink,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        state.handle_text(text.as_str());
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        return match code {
                            1000 => DisconnectReason::NormalClose { code, reason },
                            1008 => DisconnectReason::RateLimited { code, reason },
                            _ => DisconnectReason::Error { code: Some(code), reason },
                        };
                    }
                    Some(Ok(_)) => {} // Binary, Pong, Frame — ignore
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        tracing::error!("WebSocket error: {}", reason);
                        return DisconnectReason::Error { code: None, reason };
                    }
                    None => {
                        return DisconnectReason::Error {
                            code: None,
                            reason: "Stream ended".into(),
                        };
                    }
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Subscribe { symbol, generation }) => {
                        write_subscription(state, &mut sink, symbol, generation).await;
                    }
                    Some(Command::Close) | None => {
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        return DisconnectReason::UserRequested;
                    }
                }
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Connect, applying the configured handshake timeout.
async fn attempt_connect(config: &WsConfig) -> Result<(WsSink, SplitStream<WsStream>), String> {
    let (ws_stream, _) = match config.connect_timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), connect_async(config.url.as_str()))
            .await
            .map_err(|_| "Connection timeout".to_string())?
            .map_err(|e| e.to_string())?,
        None => connect_async(config.url.as_str())
            .await
            .map_err(|e| e.to_string())?,
    };

    Ok(ws_stream.split())
}

/// Race the handshake against consumer commands.
///
/// Subscriptions arriving meanwhile become the one replayed on open.
/// Returns `None` if the consumer closed or dropped the connection.
async fn connect_or_close(
    state: &mut TaskState,
) -> Option<Result<(WsSink, SplitStream<WsStream>), String>> {
    let connect = attempt_connect(&state.config);
    tokio::pin!(connect);

    loop {
        tokio::select! {
            result = &mut connect => return Some(result),
            cmd = state.cmd_rx.recv() => match cmd {
                Some(Command::Subscribe { symbol, generation }) => {
                    state.active = Some((symbol, generation));
                }
                Some(Command::Close) | None => return None,
            }
        }
    }
}

/// Write one subscription frame and record it as the active one.
async fn write_subscription(
    state: &mut TaskState,
    sink: &mut WsSink,
    symbol: Symbol,
    generation: u64,
) {
    match sink.send(Message::Text(symbol.to_string().into())).await {
        Ok(()) => {
            tracing::debug!("Sent subscription {} (generation {})", symbol, generation);
            state.written_generation = generation;
        }
        Err(e) => tracing::warn!("Send failed for {}: {}", symbol, e),
    }
    state.active = Some((symbol, generation));
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.as_str().to_string()),
        None => (1006, "No close frame".into()),
    }
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

/// Delay before reconnect attempt `attempt` (1-based), without jitter.
fn backoff_delay_ms(config: &WsConfig, attempt: u32) -> u64 {
    let exp = attempt.saturating_sub(1).min(16);
    let base = u64::from(config.base_reconnect_delay_ms).saturating_mul(1u64 << exp);
    base.min(u64::from(config.max_reconnect_delay_ms))
}

/// Sleep before the next attempt in `Reconnecting`, still serving commands.
///
/// Returns `false` if the consumer closed the connection while waiting.
async fn backoff_wait(state: &mut TaskState, floor_ms: Option<u64>) -> bool {
    state.reconnect_attempts += 1;
    state.set_state(ConnectionState::Reconnecting);

    let jitter = u64::from(rand::random::<u32>() % MAX_JITTER_MS);
    let delay_ms = (backoff_delay_ms(&state.config, state.reconnect_attempts) + jitter)
        .max(floor_ms.unwrap_or(0));

    tracing::info!(
        "Reconnect attempt {}/{} in {}ms",
        state.reconnect_attempts,
        state.config.max_reconnect_attempts,
        delay_ms
    );
    state.emit(WsEvent::Reconnecting {
        attempt: state.reconnect_attempts,
        delay_ms,
    });

    let sleep = tokio::time::sleep(Duration::from_millis(delay_ms));
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return true,
            cmd = state.cmd_rx.recv() => match cmd {
                Some(Command::Subscribe { symbol, generation }) => {
                    state.active = Some((symbol, generation));
                }
                Some(Command::Close) | None => {
                    state.set_state(ConnectionState::Closed);
                    return false;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
